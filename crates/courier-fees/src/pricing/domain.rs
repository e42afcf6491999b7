use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::weather::WeatherStation;

/// Identifier of a city in the reference data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CityId(pub u64);

impl fmt::Display for CityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a vehicle in the reference data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VehicleId(pub u64);

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Vehicle type tag (`car`, `scooter`, `bike`, ...). Fees and prohibitions
/// key on the type, not on the individual vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VehicleType(pub String);

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// City reference record, pointing at the weather station whose readings
/// price deliveries in that city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub id: CityId,
    pub name: String,
    pub station: WeatherStation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: VehicleId,
    pub vehicle_type: VehicleType,
}

/// Grouping of classification codes by measured quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CodeClass {
    #[serde(rename = "AT")]
    AirTemperature,
    #[serde(rename = "WS")]
    WindSpeed,
    #[serde(rename = "WP")]
    Phenomenon,
}

impl CodeClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            CodeClass::AirTemperature => "AT",
            CodeClass::WindSpeed => "WS",
            CodeClass::Phenomenon => "WP",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "AT" => Some(CodeClass::AirTemperature),
            "WS" => Some(CodeClass::WindSpeed),
            "WP" => Some(CodeClass::Phenomenon),
            _ => None,
        }
    }
}

impl fmt::Display for CodeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discrete tag assigned to a measurement by a condition rule, e.g.
/// `WS_ABOVE_TWENTY`. The code string joins rules to fees and prohibitions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassificationCode(pub String);

impl fmt::Display for ClassificationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Threshold/text rule mapping measurement values to a classification code.
///
/// Bound semantics: with both bounds the range is inclusive; a lone lower
/// bound matches strictly above it; a lone upper bound matches strictly
/// below it; a numeric rule with neither bound never matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionRule {
    pub id: u64,
    pub code: ClassificationCode,
    pub class: CodeClass,
    pub min_measurement: Option<f32>,
    pub max_measurement: Option<f32>,
    pub phenomena: Vec<String>,
}

/// A validated rule awaiting persistence; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewConditionRule {
    pub code: ClassificationCode,
    pub class: CodeClass,
    pub min_measurement: Option<f32>,
    pub max_measurement: Option<f32>,
    pub phenomena: Vec<String>,
}

/// Inbound payload for administrative rule creation. The class may be
/// omitted when the code carries a recognizable `AT_`/`WS_`/`WP_` prefix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionRuleDraft {
    pub code: String,
    #[serde(default)]
    pub code_class: Option<CodeClass>,
    #[serde(default)]
    pub min_measurement: Option<f32>,
    #[serde(default)]
    pub max_measurement: Option<f32>,
    #[serde(default)]
    pub phenomena: Vec<String>,
}

/// Fixed fee for a (city, vehicle type) pair, independent of weather.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionalBaseFee {
    pub city: CityId,
    pub vehicle_type: VehicleType,
    pub amount: Decimal,
}

/// Additive surcharge for a (vehicle type, code) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraFeeRule {
    pub vehicle_type: VehicleType,
    pub code: ClassificationCode,
    pub amount: Decimal,
}

/// A (vehicle type, code) pairing that bars usage entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProhibitionRule {
    pub vehicle_type: VehicleType,
    pub code: ClassificationCode,
}

/// Priced delivery request: base fee plus weather surcharges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryFeeQuote {
    pub city_id: CityId,
    pub vehicle_id: VehicleId,
    pub base_fee: Decimal,
    pub extra_fee: Decimal,
    pub total_fee: Decimal,
}
