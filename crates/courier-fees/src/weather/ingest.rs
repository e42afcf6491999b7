use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use super::domain::StationCode;
use super::observations::{ObservationError, ObservationsClient, ObservationsDocument};
use super::repository::{MeasurementStore, MeasurementStoreError};

/// Periodically pulls the observation feed and records one measurement per
/// known station. Stations absent from the reference data are ignored.
pub struct ObservationIngestor<S> {
    client: ObservationsClient,
    store: Arc<S>,
    known_stations: HashSet<StationCode>,
}

/// Errors raised by a single ingestion cycle.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error(transparent)]
    Feed(#[from] ObservationError),
    #[error(transparent)]
    Store(#[from] MeasurementStoreError),
    #[error("observation document carries an invalid timestamp {timestamp}")]
    InvalidTimestamp { timestamp: i64 },
    #[error("observation document contains no readings for known stations")]
    NoKnownStations,
}

impl<S> ObservationIngestor<S>
where
    S: MeasurementStore,
{
    pub fn new(
        client: ObservationsClient,
        store: Arc<S>,
        known_stations: impl IntoIterator<Item = StationCode>,
    ) -> Self {
        Self {
            client,
            store,
            known_stations: known_stations.into_iter().collect(),
        }
    }

    /// Fetch the feed once and record every reading for a known station.
    /// Returns the number of measurements stored.
    pub async fn ingest_once(&self) -> Result<usize, IngestError> {
        let document = self.client.fetch().await?;
        self.ingest_document(&document)
    }

    pub fn ingest_document(&self, document: &ObservationsDocument) -> Result<usize, IngestError> {
        let observed_at = document
            .observed_at()
            .ok_or(IngestError::InvalidTimestamp {
                timestamp: document.timestamp,
            })?;

        let measurements: Vec<_> = document
            .stations
            .iter()
            .filter_map(|station| station.measurement(observed_at))
            .filter(|measurement| self.known_stations.contains(&measurement.station))
            .collect();

        if measurements.is_empty() {
            return Err(IngestError::NoKnownStations);
        }

        let stored = measurements.len();
        self.store.record(measurements)?;
        Ok(stored)
    }

    /// Poll forever. Failures are logged and the worker waits for the next
    /// cycle; the request-serving path keeps answering from whatever the
    /// store already holds.
    pub async fn run(self, every: Duration) {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            match self.ingest_once().await {
                Ok(stored) => info!(stored, "recorded weather observations"),
                Err(err) => warn!(error = %err, "weather observation ingest failed"),
            }
        }
    }
}
