//! Default reference data for the Estonian pilot: three cities, three
//! vehicle types, and the initial severe-weather rule set.

use rust_decimal::Decimal;

use courier_fees::pricing::{
    City, CityId, ClassificationCode, CodeClass, ConditionRule, ExtraFeeRule, ProhibitionRule,
    RegionalBaseFee, Vehicle, VehicleId, VehicleType,
};
use courier_fees::weather::{StationCode, WeatherStation};

use crate::infra::ReferenceData;

fn station(code: u32, name: &str) -> WeatherStation {
    WeatherStation {
        code: StationCode(code),
        name: name.to_string(),
    }
}

fn city(id: u64, name: &str, station: WeatherStation) -> City {
    City {
        id: CityId(id),
        name: name.to_string(),
        station,
    }
}

fn vehicle(id: u64, tag: &str) -> Vehicle {
    Vehicle {
        id: VehicleId(id),
        vehicle_type: VehicleType(tag.to_string()),
    }
}

fn base_fee(city: u64, tag: &str, cents: i64) -> RegionalBaseFee {
    RegionalBaseFee {
        city: CityId(city),
        vehicle_type: VehicleType(tag.to_string()),
        amount: Decimal::new(cents, 2),
    }
}

fn extra_fee(tag: &str, code: &str, cents: i64) -> ExtraFeeRule {
    ExtraFeeRule {
        vehicle_type: VehicleType(tag.to_string()),
        code: ClassificationCode(code.to_string()),
        amount: Decimal::new(cents, 2),
    }
}

fn prohibition(tag: &str, code: &str) -> ProhibitionRule {
    ProhibitionRule {
        vehicle_type: VehicleType(tag.to_string()),
        code: ClassificationCode(code.to_string()),
    }
}

fn numeric_rule(
    id: u64,
    code: &str,
    class: CodeClass,
    min: Option<f32>,
    max: Option<f32>,
) -> ConditionRule {
    ConditionRule {
        id,
        code: ClassificationCode(code.to_string()),
        class,
        min_measurement: min,
        max_measurement: max,
        phenomena: Vec::new(),
    }
}

fn phenomenon_rule(id: u64, code: &str, keywords: &[&str]) -> ConditionRule {
    ConditionRule {
        id,
        code: ClassificationCode(code.to_string()),
        class: CodeClass::Phenomenon,
        min_measurement: None,
        max_measurement: None,
        phenomena: keywords.iter().map(|keyword| keyword.to_string()).collect(),
    }
}

pub(crate) fn reference_data() -> ReferenceData {
    ReferenceData {
        cities: vec![
            city(1, "Tallinn", station(26038, "Tallinn-Harku")),
            city(2, "Tartu", station(26242, "Tartu-Tõravere")),
            city(3, "Pärnu", station(41803, "Pärnu")),
        ],
        vehicles: vec![
            vehicle(1, "car"),
            vehicle(2, "scooter"),
            vehicle(3, "bike"),
        ],
        base_fees: vec![
            base_fee(1, "car", 400),
            base_fee(1, "scooter", 350),
            base_fee(1, "bike", 300),
            base_fee(2, "car", 350),
            base_fee(2, "scooter", 300),
            base_fee(2, "bike", 250),
            base_fee(3, "car", 300),
            base_fee(3, "scooter", 250),
            base_fee(3, "bike", 200),
        ],
        extra_fees: vec![
            extra_fee("scooter", "AT_UNDER_MINUS_TEN", 100),
            extra_fee("scooter", "AT_MINUS_TEN_TO_ZERO", 50),
            extra_fee("scooter", "WP_SNOW_SLEET", 100),
            extra_fee("scooter", "WP_RAIN", 50),
            extra_fee("bike", "AT_UNDER_MINUS_TEN", 100),
            extra_fee("bike", "AT_MINUS_TEN_TO_ZERO", 50),
            extra_fee("bike", "WS_TEN_TO_TWENTY", 50),
            extra_fee("bike", "WP_SNOW_SLEET", 100),
            extra_fee("bike", "WP_RAIN", 50),
        ],
        prohibitions: vec![
            prohibition("bike", "WS_ABOVE_TWENTY"),
            prohibition("bike", "WP_GLAZE_HAIL_THUNDER"),
            prohibition("scooter", "WP_GLAZE_HAIL_THUNDER"),
        ],
        rules: vec![
            numeric_rule(
                1,
                "AT_UNDER_MINUS_TEN",
                CodeClass::AirTemperature,
                None,
                Some(-10.0),
            ),
            numeric_rule(
                2,
                "AT_MINUS_TEN_TO_ZERO",
                CodeClass::AirTemperature,
                Some(-10.0),
                Some(0.0),
            ),
            numeric_rule(
                3,
                "WS_TEN_TO_TWENTY",
                CodeClass::WindSpeed,
                Some(10.0),
                Some(20.0),
            ),
            numeric_rule(4, "WS_ABOVE_TWENTY", CodeClass::WindSpeed, Some(20.0), None),
            phenomenon_rule(5, "WP_SNOW_SLEET", &["snow", "sleet"]),
            phenomenon_rule(6, "WP_RAIN", &["rain"]),
            phenomenon_rule(7, "WP_GLAZE_HAIL_THUNDER", &["glaze", "hail", "thunder"]),
        ],
    }
}
