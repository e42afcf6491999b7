use super::domain::{StationCode, WeatherMeasurement};

/// Storage abstraction for weather measurements. The request path only ever
/// reads the latest row per station; the ingestion worker appends batches.
pub trait MeasurementStore: Send + Sync {
    fn latest(
        &self,
        station: &StationCode,
    ) -> Result<Option<WeatherMeasurement>, MeasurementStoreError>;
    fn record(&self, measurements: Vec<WeatherMeasurement>) -> Result<(), MeasurementStoreError>;
}

/// Error enumeration for measurement store failures.
#[derive(Debug, thiserror::Error)]
pub enum MeasurementStoreError {
    #[error("measurement store unavailable: {0}")]
    Unavailable(String),
}
