//! Weather observations: measurement records, the station feed client, and
//! the periodic ingestion worker that keeps the measurement store current.

pub mod domain;
pub mod ingest;
pub mod observations;
pub mod repository;

pub use domain::{StationCode, WeatherMeasurement, WeatherStation};
pub use ingest::{IngestError, ObservationIngestor};
pub use observations::{
    parse_observations, ObservationError, ObservationsClient, ObservationsDocument,
    StationObservation, DEFAULT_OBSERVATIONS_URL,
};
pub use repository::{MeasurementStore, MeasurementStoreError};
