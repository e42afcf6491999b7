use chrono::{DateTime, Utc};
use quick_xml::de::from_str;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;

use super::domain::{StationCode, WeatherMeasurement};

/// Estonian Environment Agency observations feed, refreshed a few minutes
/// past every full hour.
pub const DEFAULT_OBSERVATIONS_URL: &str =
    "https://www.ilmateenistus.ee/ilma_andmed/xml/observations.php";

/// Root of the observations document: one timestamp attribute (Unix seconds)
/// shared by every station element.
#[derive(Debug, Deserialize)]
pub struct ObservationsDocument {
    #[serde(rename = "@timestamp")]
    pub timestamp: i64,
    #[serde(rename = "station", default)]
    pub stations: Vec<StationObservation>,
}

impl ObservationsDocument {
    pub fn observed_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }
}

/// One `<station>` element. The feed emits empty elements for readings a
/// station does not report, so every numeric field tolerates blank text.
#[derive(Debug, Deserialize)]
pub struct StationObservation {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub wmocode: Option<u32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub airtemperature: Option<f32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub windspeed: Option<f32>,
    #[serde(default)]
    pub phenomenon: Option<String>,
}

impl StationObservation {
    /// Convert to a measurement row, stamped with the document timestamp.
    /// Stations without a WMO code cannot be keyed and yield `None`.
    pub fn measurement(&self, observed_at: DateTime<Utc>) -> Option<WeatherMeasurement> {
        let station = StationCode(self.wmocode?);
        let phenomenon = self
            .phenomenon
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string);

        Some(WeatherMeasurement {
            station,
            observed_at,
            air_temperature: self.airtemperature,
            wind_speed: self.windspeed,
            phenomenon,
        })
    }
}

fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => text.parse::<T>().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Errors raised while fetching or decoding the observations feed.
#[derive(Debug, thiserror::Error)]
pub enum ObservationError {
    #[error("observation feed request failed: {source}")]
    Request {
        #[from]
        source: reqwest::Error,
    },
    #[error("observation feed responded with status {status}")]
    Status { status: u16 },
    #[error("observation feed returned malformed XML: {source}")]
    Parse {
        #[from]
        source: quick_xml::DeError,
    },
}

pub fn parse_observations(xml: &str) -> Result<ObservationsDocument, ObservationError> {
    Ok(from_str(xml)?)
}

/// HTTP client for the observations feed.
#[derive(Debug, Clone)]
pub struct ObservationsClient {
    http: reqwest::Client,
    url: String,
}

impl ObservationsClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
        }
    }

    pub async fn fetch(&self) -> Result<ObservationsDocument, ObservationError> {
        let response = self.http.get(&self.url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ObservationError::Status {
                status: status.as_u16(),
            });
        }

        parse_observations(&body)
    }
}
