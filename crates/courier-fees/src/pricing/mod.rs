//! Delivery fee pricing: weather classification, vehicle prohibitions, and
//! base/extra fee resolution over administrator-managed rule tables.

pub(crate) mod classifier;
pub mod domain;
pub(crate) mod prohibition;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    City, CityId, ClassificationCode, CodeClass, ConditionRule, ConditionRuleDraft,
    DeliveryFeeQuote, ExtraFeeRule, NewConditionRule, ProhibitionRule, RegionalBaseFee, Vehicle,
    VehicleId, VehicleType,
};
pub use repository::{ReferenceStore, ReferenceStoreError};
pub use router::delivery_fee_router;
pub use service::{ConditionRuleError, DeliveryFeeError, DeliveryFeeService};
