use rust_decimal::Decimal;

use super::domain::{
    City, CityId, ClassificationCode, CodeClass, ConditionRule, NewConditionRule, Vehicle,
    VehicleId, VehicleType,
};

/// Keyed access to administrator-managed reference data: cities, vehicles,
/// fee tables, prohibitions, and condition rules. Implementations expose a
/// read-only snapshot per request; only rule creation writes.
pub trait ReferenceStore: Send + Sync {
    fn vehicle(&self, id: &VehicleId) -> Result<Option<Vehicle>, ReferenceStoreError>;
    fn city(&self, id: &CityId) -> Result<Option<City>, ReferenceStoreError>;
    fn base_fee(
        &self,
        city: &CityId,
        vehicle_type: &VehicleType,
    ) -> Result<Option<Decimal>, ReferenceStoreError>;
    fn extra_fee(
        &self,
        vehicle_type: &VehicleType,
        code: &ClassificationCode,
    ) -> Result<Option<Decimal>, ReferenceStoreError>;
    fn prohibited(
        &self,
        vehicle_type: &VehicleType,
        code: &ClassificationCode,
    ) -> Result<bool, ReferenceStoreError>;
    fn condition_rules(&self, class: CodeClass) -> Result<Vec<ConditionRule>, ReferenceStoreError>;
    /// Persist a validated rule; the store assigns the rule id.
    fn insert_condition_rule(
        &self,
        rule: NewConditionRule,
    ) -> Result<ConditionRule, ReferenceStoreError>;
}

/// Error enumeration for reference store failures.
#[derive(Debug, thiserror::Error)]
pub enum ReferenceStoreError {
    #[error("reference store unavailable: {0}")]
    Unavailable(String),
}
