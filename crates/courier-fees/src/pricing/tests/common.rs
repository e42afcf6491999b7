use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;

use crate::pricing::domain::{
    City, CityId, ClassificationCode, CodeClass, ConditionRule, ExtraFeeRule, NewConditionRule,
    ProhibitionRule, RegionalBaseFee, Vehicle, VehicleId, VehicleType,
};
use crate::pricing::repository::{ReferenceStore, ReferenceStoreError};
use crate::pricing::service::DeliveryFeeService;
use crate::weather::{
    MeasurementStore, MeasurementStoreError, StationCode, WeatherMeasurement, WeatherStation,
};

pub(super) const HARKU: StationCode = StationCode(26038);
pub(super) const TORAVERE: StationCode = StationCode(26242);

pub(super) fn car() -> VehicleType {
    VehicleType("car".to_string())
}

pub(super) fn scooter() -> VehicleType {
    VehicleType("scooter".to_string())
}

pub(super) fn bike() -> VehicleType {
    VehicleType("bike".to_string())
}

pub(super) const CAR: VehicleId = VehicleId(1);
pub(super) const SCOOTER: VehicleId = VehicleId(2);
pub(super) const BIKE: VehicleId = VehicleId(3);

pub(super) const TALLINN: CityId = CityId(1);
pub(super) const TARTU: CityId = CityId(2);

pub(super) fn code(tag: &str) -> ClassificationCode {
    ClassificationCode(tag.to_string())
}

pub(super) fn numeric_rule(
    id: u64,
    tag: &str,
    class: CodeClass,
    min: Option<f32>,
    max: Option<f32>,
) -> ConditionRule {
    ConditionRule {
        id,
        code: code(tag),
        class,
        min_measurement: min,
        max_measurement: max,
        phenomena: Vec::new(),
    }
}

pub(super) fn phenomenon_rule<const N: usize>(
    id: u64,
    tag: &str,
    keywords: [&str; N],
) -> ConditionRule {
    ConditionRule {
        id,
        code: code(tag),
        class: CodeClass::Phenomenon,
        min_measurement: None,
        max_measurement: None,
        phenomena: keywords.iter().map(|keyword| keyword.to_string()).collect(),
    }
}

/// The canonical rule table of the Estonian pilot.
pub(super) fn default_rules() -> Vec<ConditionRule> {
    vec![
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
        phenomenon_rule(5, "WP_SNOW_SLEET", ["snow", "sleet"]),
        phenomenon_rule(6, "WP_RAIN", ["rain"]),
        phenomenon_rule(7, "WP_GLAZE_HAIL_THUNDER", ["glaze", "hail", "thunder"]),
    ]
}

pub(super) fn measurement(
    temperature: Option<f32>,
    wind: Option<f32>,
    phenomenon: Option<&str>,
) -> WeatherMeasurement {
    WeatherMeasurement {
        station: HARKU,
        observed_at: Utc
            .with_ymd_and_hms(2024, 1, 15, 12, 15, 0)
            .single()
            .expect("valid timestamp"),
        air_temperature: temperature,
        wind_speed: wind,
        phenomenon: phenomenon.map(str::to_string),
    }
}

/// Mild weather that must not trigger any code.
pub(super) fn normal_weather() -> WeatherMeasurement {
    measurement(Some(10.0), Some(0.0), Some(""))
}

#[derive(Default)]
pub(super) struct ReferenceData {
    pub(super) cities: Vec<City>,
    pub(super) vehicles: Vec<Vehicle>,
    pub(super) base_fees: Vec<RegionalBaseFee>,
    pub(super) extra_fees: Vec<ExtraFeeRule>,
    pub(super) prohibitions: Vec<ProhibitionRule>,
    pub(super) rules: Vec<ConditionRule>,
}

#[derive(Default)]
pub(super) struct MemoryReferenceStore {
    pub(super) data: Mutex<ReferenceData>,
}

impl ReferenceStore for MemoryReferenceStore {
    fn vehicle(&self, id: &VehicleId) -> Result<Option<Vehicle>, ReferenceStoreError> {
        let data = self.data.lock().expect("reference mutex poisoned");
        Ok(data.vehicles.iter().find(|v| v.id == *id).cloned())
    }

    fn city(&self, id: &CityId) -> Result<Option<City>, ReferenceStoreError> {
        let data = self.data.lock().expect("reference mutex poisoned");
        Ok(data.cities.iter().find(|c| c.id == *id).cloned())
    }

    fn base_fee(
        &self,
        city: &CityId,
        vehicle_type: &VehicleType,
    ) -> Result<Option<Decimal>, ReferenceStoreError> {
        let data = self.data.lock().expect("reference mutex poisoned");
        Ok(data
            .base_fees
            .iter()
            .find(|fee| fee.city == *city && fee.vehicle_type == *vehicle_type)
            .map(|fee| fee.amount))
    }

    fn extra_fee(
        &self,
        vehicle_type: &VehicleType,
        code: &ClassificationCode,
    ) -> Result<Option<Decimal>, ReferenceStoreError> {
        let data = self.data.lock().expect("reference mutex poisoned");
        Ok(data
            .extra_fees
            .iter()
            .find(|fee| fee.vehicle_type == *vehicle_type && fee.code == *code)
            .map(|fee| fee.amount))
    }

    fn prohibited(
        &self,
        vehicle_type: &VehicleType,
        code: &ClassificationCode,
    ) -> Result<bool, ReferenceStoreError> {
        let data = self.data.lock().expect("reference mutex poisoned");
        Ok(data
            .prohibitions
            .iter()
            .any(|rule| rule.vehicle_type == *vehicle_type && rule.code == *code))
    }

    fn condition_rules(&self, class: CodeClass) -> Result<Vec<ConditionRule>, ReferenceStoreError> {
        let data = self.data.lock().expect("reference mutex poisoned");
        Ok(data
            .rules
            .iter()
            .filter(|rule| rule.class == class)
            .cloned()
            .collect())
    }

    fn insert_condition_rule(
        &self,
        rule: NewConditionRule,
    ) -> Result<ConditionRule, ReferenceStoreError> {
        let mut data = self.data.lock().expect("reference mutex poisoned");
        let id = data.rules.iter().map(|rule| rule.id).max().unwrap_or(0) + 1;
        let rule = ConditionRule {
            id,
            code: rule.code,
            class: rule.class,
            min_measurement: rule.min_measurement,
            max_measurement: rule.max_measurement,
            phenomena: rule.phenomena,
        };
        data.rules.push(rule.clone());
        Ok(rule)
    }
}

#[derive(Default)]
pub(super) struct MemoryMeasurementStore {
    rows: Mutex<Vec<WeatherMeasurement>>,
}

impl MeasurementStore for MemoryMeasurementStore {
    fn latest(
        &self,
        station: &StationCode,
    ) -> Result<Option<WeatherMeasurement>, MeasurementStoreError> {
        let rows = self.rows.lock().expect("measurement mutex poisoned");
        Ok(rows
            .iter()
            .filter(|row| row.station == *station)
            .max_by_key(|row| row.observed_at)
            .cloned())
    }

    fn record(&self, measurements: Vec<WeatherMeasurement>) -> Result<(), MeasurementStoreError> {
        let mut rows = self.rows.lock().expect("measurement mutex poisoned");
        rows.extend(measurements);
        Ok(())
    }
}

fn base_fee(city: CityId, vehicle_type: VehicleType, cents: i64) -> RegionalBaseFee {
    RegionalBaseFee {
        city,
        vehicle_type,
        amount: Decimal::new(cents, 2),
    }
}

fn extra_fee(vehicle_type: VehicleType, tag: &str, cents: i64) -> ExtraFeeRule {
    ExtraFeeRule {
        vehicle_type,
        code: code(tag),
        amount: Decimal::new(cents, 2),
    }
}

fn prohibition(vehicle_type: VehicleType, tag: &str) -> ProhibitionRule {
    ProhibitionRule {
        vehicle_type,
        code: code(tag),
    }
}

/// Reference snapshot matching the Estonian pilot configuration.
pub(super) fn seeded_reference() -> Arc<MemoryReferenceStore> {
    let store = MemoryReferenceStore::default();
    {
        let mut data = store.data.lock().expect("reference mutex poisoned");
        data.cities = vec![
            City {
                id: TALLINN,
                name: "Tallinn".to_string(),
                station: WeatherStation {
                    code: HARKU,
                    name: "Tallinn-Harku".to_string(),
                },
            },
            City {
                id: TARTU,
                name: "Tartu".to_string(),
                station: WeatherStation {
                    code: TORAVERE,
                    name: "Tartu-Tõravere".to_string(),
                },
            },
        ];
        data.vehicles = vec![
            Vehicle {
                id: CAR,
                vehicle_type: car(),
            },
            Vehicle {
                id: SCOOTER,
                vehicle_type: scooter(),
            },
            Vehicle {
                id: BIKE,
                vehicle_type: bike(),
            },
        ];
        data.base_fees = vec![
            base_fee(TALLINN, car(), 400),
            base_fee(TALLINN, scooter(), 350),
            base_fee(TALLINN, bike(), 300),
            base_fee(TARTU, car(), 350),
            base_fee(TARTU, scooter(), 300),
            base_fee(TARTU, bike(), 250),
        ];
        data.extra_fees = vec![
            extra_fee(scooter(), "AT_UNDER_MINUS_TEN", 100),
            extra_fee(scooter(), "AT_MINUS_TEN_TO_ZERO", 50),
            extra_fee(scooter(), "WP_SNOW_SLEET", 100),
            extra_fee(scooter(), "WP_RAIN", 50),
            extra_fee(bike(), "AT_UNDER_MINUS_TEN", 100),
            extra_fee(bike(), "AT_MINUS_TEN_TO_ZERO", 50),
            extra_fee(bike(), "WS_TEN_TO_TWENTY", 50),
            extra_fee(bike(), "WP_SNOW_SLEET", 100),
            extra_fee(bike(), "WP_RAIN", 50),
        ];
        data.prohibitions = vec![
            prohibition(bike(), "WS_ABOVE_TWENTY"),
            prohibition(bike(), "WP_GLAZE_HAIL_THUNDER"),
            prohibition(scooter(), "WP_GLAZE_HAIL_THUNDER"),
        ];
        data.rules = default_rules();
    }
    Arc::new(store)
}

pub(super) fn build_service() -> (
    Arc<DeliveryFeeService<MemoryMeasurementStore, MemoryReferenceStore>>,
    Arc<MemoryMeasurementStore>,
    Arc<MemoryReferenceStore>,
) {
    let measurements = Arc::new(MemoryMeasurementStore::default());
    let reference = seeded_reference();
    let service = Arc::new(DeliveryFeeService::new(
        measurements.clone(),
        reference.clone(),
    ));
    (service, measurements, reference)
}

/// Wrapper counting fee and prohibition lookups so tests can observe the
/// gate short-circuiting ahead of fee resolution.
pub(super) struct CountingReferenceStore {
    pub(super) inner: Arc<MemoryReferenceStore>,
    pub(super) fee_lookups: AtomicUsize,
    pub(super) prohibition_checks: AtomicUsize,
}

impl CountingReferenceStore {
    pub(super) fn new(inner: Arc<MemoryReferenceStore>) -> Self {
        Self {
            inner,
            fee_lookups: AtomicUsize::new(0),
            prohibition_checks: AtomicUsize::new(0),
        }
    }
}

impl ReferenceStore for CountingReferenceStore {
    fn vehicle(&self, id: &VehicleId) -> Result<Option<Vehicle>, ReferenceStoreError> {
        self.inner.vehicle(id)
    }

    fn city(&self, id: &CityId) -> Result<Option<City>, ReferenceStoreError> {
        self.inner.city(id)
    }

    fn base_fee(
        &self,
        city: &CityId,
        vehicle_type: &VehicleType,
    ) -> Result<Option<Decimal>, ReferenceStoreError> {
        self.fee_lookups.fetch_add(1, Ordering::Relaxed);
        self.inner.base_fee(city, vehicle_type)
    }

    fn extra_fee(
        &self,
        vehicle_type: &VehicleType,
        code: &ClassificationCode,
    ) -> Result<Option<Decimal>, ReferenceStoreError> {
        self.fee_lookups.fetch_add(1, Ordering::Relaxed);
        self.inner.extra_fee(vehicle_type, code)
    }

    fn prohibited(
        &self,
        vehicle_type: &VehicleType,
        code: &ClassificationCode,
    ) -> Result<bool, ReferenceStoreError> {
        self.prohibition_checks.fetch_add(1, Ordering::Relaxed);
        self.inner.prohibited(vehicle_type, code)
    }

    fn condition_rules(&self, class: CodeClass) -> Result<Vec<ConditionRule>, ReferenceStoreError> {
        self.inner.condition_rules(class)
    }

    fn insert_condition_rule(
        &self,
        rule: NewConditionRule,
    ) -> Result<ConditionRule, ReferenceStoreError> {
        self.inner.insert_condition_rule(rule)
    }
}

/// Store double that fails every call, for exercising masked error paths.
pub(super) struct UnavailableReferenceStore;

impl ReferenceStore for UnavailableReferenceStore {
    fn vehicle(&self, _id: &VehicleId) -> Result<Option<Vehicle>, ReferenceStoreError> {
        Err(ReferenceStoreError::Unavailable(
            "database offline".to_string(),
        ))
    }

    fn city(&self, _id: &CityId) -> Result<Option<City>, ReferenceStoreError> {
        Err(ReferenceStoreError::Unavailable(
            "database offline".to_string(),
        ))
    }

    fn base_fee(
        &self,
        _city: &CityId,
        _vehicle_type: &VehicleType,
    ) -> Result<Option<Decimal>, ReferenceStoreError> {
        Err(ReferenceStoreError::Unavailable(
            "database offline".to_string(),
        ))
    }

    fn extra_fee(
        &self,
        _vehicle_type: &VehicleType,
        _code: &ClassificationCode,
    ) -> Result<Option<Decimal>, ReferenceStoreError> {
        Err(ReferenceStoreError::Unavailable(
            "database offline".to_string(),
        ))
    }

    fn prohibited(
        &self,
        _vehicle_type: &VehicleType,
        _code: &ClassificationCode,
    ) -> Result<bool, ReferenceStoreError> {
        Err(ReferenceStoreError::Unavailable(
            "database offline".to_string(),
        ))
    }

    fn condition_rules(
        &self,
        _class: CodeClass,
    ) -> Result<Vec<ConditionRule>, ReferenceStoreError> {
        Err(ReferenceStoreError::Unavailable(
            "database offline".to_string(),
        ))
    }

    fn insert_condition_rule(
        &self,
        _rule: NewConditionRule,
    ) -> Result<ConditionRule, ReferenceStoreError> {
        Err(ReferenceStoreError::Unavailable(
            "database offline".to_string(),
        ))
    }
}
