use std::sync::Arc;

use rust_decimal::Decimal;

use super::classifier;
use super::domain::{
    CityId, ClassificationCode, CodeClass, ConditionRule, ConditionRuleDraft, DeliveryFeeQuote,
    NewConditionRule, VehicleId, VehicleType,
};
use super::prohibition;
use super::repository::{ReferenceStore, ReferenceStoreError};
use crate::weather::{MeasurementStore, MeasurementStoreError, StationCode};

/// Service composing the weather classifier, prohibition gate, and fee
/// resolution into a single read-and-compute pipeline.
pub struct DeliveryFeeService<M, R> {
    measurements: Arc<M>,
    reference: Arc<R>,
}

impl<M, R> DeliveryFeeService<M, R>
where
    M: MeasurementStore + 'static,
    R: ReferenceStore + 'static,
{
    pub fn new(measurements: Arc<M>, reference: Arc<R>) -> Self {
        Self {
            measurements,
            reference,
        }
    }

    /// Price a delivery for (city, vehicle) against the latest measurement
    /// recorded for the city's station.
    ///
    /// The pipeline is linear and short-circuits on the first failure:
    /// vehicle lookup, city lookup, latest measurement, classification,
    /// prohibition gate, base fee, extra fees. Nothing is mutated, so a
    /// repeated call with unchanged data returns an identical quote.
    pub fn quote(
        &self,
        city_id: CityId,
        vehicle_id: VehicleId,
    ) -> Result<DeliveryFeeQuote, DeliveryFeeError> {
        let vehicle = self
            .reference
            .vehicle(&vehicle_id)?
            .ok_or(DeliveryFeeError::InvalidVehicle(vehicle_id))?;
        let city = self
            .reference
            .city(&city_id)?
            .ok_or(DeliveryFeeError::InvalidCity(city_id))?;

        let measurement = self
            .measurements
            .latest(&city.station.code)?
            .ok_or(DeliveryFeeError::NoWeatherData(city.station.code))?;

        let codes = classifier::classify(self.reference.as_ref(), &measurement)?;

        if let Some(code) =
            prohibition::first_prohibited(self.reference.as_ref(), &vehicle.vehicle_type, &codes)?
        {
            return Err(DeliveryFeeError::ForbiddenWeather { code });
        }

        let base_fee = self
            .reference
            .base_fee(&city_id, &vehicle.vehicle_type)?
            .ok_or_else(|| DeliveryFeeError::NoBaseFee {
                city: city_id,
                vehicle_type: vehicle.vehicle_type.clone(),
            })?;
        let extra_fee = self.extra_fees(&vehicle.vehicle_type, &codes)?;

        Ok(DeliveryFeeQuote {
            city_id,
            vehicle_id,
            base_fee,
            extra_fee,
            total_fee: base_fee + extra_fee,
        })
    }

    /// Sum the configured surcharges over the triggered codes. Codes without
    /// a configured surcharge for this vehicle type contribute zero.
    fn extra_fees(
        &self,
        vehicle_type: &VehicleType,
        codes: &[ClassificationCode],
    ) -> Result<Decimal, ReferenceStoreError> {
        let mut total = Decimal::new(0, 2);
        for code in codes {
            if let Some(amount) = self.reference.extra_fee(vehicle_type, code)? {
                total += amount;
            }
        }
        Ok(total)
    }

    /// Validate and persist an administrator-supplied condition rule.
    ///
    /// Unmatchable configurations are rejected here rather than tolerated at
    /// classification time: numeric-class rules need at least one bound,
    /// phenomenon rules at least one non-blank keyword.
    pub fn create_rule(
        &self,
        draft: ConditionRuleDraft,
    ) -> Result<ConditionRule, ConditionRuleError> {
        let code = draft.code.trim().to_string();
        if code.is_empty() {
            return Err(ConditionRuleError::MissingCode);
        }

        let class = match draft.code_class {
            Some(class) => class,
            None => class_from_code(&code).ok_or_else(|| ConditionRuleError::UnknownClass {
                code: code.clone(),
            })?,
        };

        let phenomena: Vec<String> = draft
            .phenomena
            .iter()
            .map(|keyword| keyword.trim().to_string())
            .filter(|keyword| !keyword.is_empty())
            .collect();

        match class {
            CodeClass::Phenomenon => {
                if phenomena.is_empty() {
                    return Err(ConditionRuleError::MissingPhenomena);
                }
            }
            CodeClass::AirTemperature | CodeClass::WindSpeed => {
                if draft.min_measurement.is_none() && draft.max_measurement.is_none() {
                    return Err(ConditionRuleError::MissingBounds { class });
                }
                if let (Some(min), Some(max)) = (draft.min_measurement, draft.max_measurement) {
                    if min > max {
                        return Err(ConditionRuleError::InvertedBounds { min, max });
                    }
                }
            }
        }

        let rule = self.reference.insert_condition_rule(NewConditionRule {
            code: ClassificationCode(code),
            class,
            min_measurement: draft.min_measurement,
            max_measurement: draft.max_measurement,
            phenomena,
        })?;
        Ok(rule)
    }
}

/// Derive the code class from the code's leading segment, e.g.
/// `WS_ABOVE_TWENTY` -> wind speed.
fn class_from_code(code: &str) -> Option<CodeClass> {
    let prefix = code.split('_').next()?;
    CodeClass::from_tag(prefix)
}

/// Failure modes of the fee pipeline, surfaced as tagged values so the
/// router can map each kind to a status without catching anything.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryFeeError {
    #[error("vehicle {0} does not exist")]
    InvalidVehicle(VehicleId),
    #[error("city {0} does not exist")]
    InvalidCity(CityId),
    #[error("no weather data recorded for station {0}")]
    NoWeatherData(StationCode),
    #[error("usage of the selected vehicle type is forbidden")]
    ForbiddenWeather { code: ClassificationCode },
    #[error("this type of vehicle is not allowed in this city")]
    NoBaseFee {
        city: CityId,
        vehicle_type: VehicleType,
    },
    #[error(transparent)]
    Reference(#[from] ReferenceStoreError),
    #[error(transparent)]
    Measurements(#[from] MeasurementStoreError),
}

/// Validation and persistence errors for administrative rule creation.
#[derive(Debug, thiserror::Error)]
pub enum ConditionRuleError {
    #[error("a classification code is required")]
    MissingCode,
    #[error("code '{code}' carries no recognizable class prefix and no class was given")]
    UnknownClass { code: String },
    #[error("a {class} rule needs at least one numeric bound")]
    MissingBounds { class: CodeClass },
    #[error("a phenomenon rule needs at least one non-blank keyword")]
    MissingPhenomena,
    #[error("lower bound {min} exceeds upper bound {max}")]
    InvertedBounds { min: f32, max: f32 },
    #[error(transparent)]
    Reference(#[from] ReferenceStoreError),
}
