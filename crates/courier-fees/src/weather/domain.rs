use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// WMO code identifying a weather station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StationCode(pub u32);

impl fmt::Display for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A weather-reporting location referenced by one or more cities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherStation {
    pub code: StationCode,
    pub name: String,
}

/// One timestamped reading for a station. Readings are append-only; only the
/// greatest-timestamp row per station is consulted when pricing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherMeasurement {
    pub station: StationCode,
    pub observed_at: DateTime<Utc>,
    pub air_temperature: Option<f32>,
    pub wind_speed: Option<f32>,
    pub phenomenon: Option<String>,
}
