use metrics_exporter_prometheus::PrometheusHandle;
use rust_decimal::Decimal;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use courier_fees::pricing::{
    City, CityId, ClassificationCode, CodeClass, ConditionRule, ExtraFeeRule, NewConditionRule,
    ProhibitionRule, ReferenceStore, ReferenceStoreError, RegionalBaseFee, Vehicle, VehicleId,
    VehicleType,
};
use courier_fees::weather::{
    MeasurementStore, MeasurementStoreError, StationCode, WeatherMeasurement,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Administrator-managed reference tables held as an in-memory snapshot.
#[derive(Debug, Default)]
pub(crate) struct ReferenceData {
    pub(crate) cities: Vec<City>,
    pub(crate) vehicles: Vec<Vehicle>,
    pub(crate) base_fees: Vec<RegionalBaseFee>,
    pub(crate) extra_fees: Vec<ExtraFeeRule>,
    pub(crate) prohibitions: Vec<ProhibitionRule>,
    pub(crate) rules: Vec<ConditionRule>,
}

#[derive(Default)]
pub(crate) struct InMemoryReferenceStore {
    data: Mutex<ReferenceData>,
}

impl InMemoryReferenceStore {
    pub(crate) fn new(data: ReferenceData) -> Self {
        Self {
            data: Mutex::new(data),
        }
    }

    /// Station codes referenced by the city table; the ingestion worker
    /// ignores feed stations outside this set.
    pub(crate) fn station_codes(&self) -> Vec<StationCode> {
        let data = self.data.lock().expect("reference mutex poisoned");
        let mut codes: Vec<_> = data.cities.iter().map(|city| city.station.code).collect();
        codes.dedup();
        codes
    }
}

impl ReferenceStore for InMemoryReferenceStore {
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

/// Append-only measurement rows; `latest` picks the greatest timestamp per
/// station, so a cycle writing while requests read stays consistent behind
/// the mutex.
#[derive(Default)]
pub(crate) struct InMemoryMeasurementStore {
    rows: Mutex<Vec<WeatherMeasurement>>,
}

impl MeasurementStore for InMemoryMeasurementStore {
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
