use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use tracing::{error, warn};

use super::domain::{CityId, ConditionRuleDraft, VehicleId};
use super::repository::ReferenceStore;
use super::service::{ConditionRuleError, DeliveryFeeError, DeliveryFeeService};
use crate::weather::MeasurementStore;

/// Router builder exposing the fee query and the administrative rule
/// creation endpoint.
pub fn delivery_fee_router<M, R>(service: Arc<DeliveryFeeService<M, R>>) -> Router
where
    M: MeasurementStore + 'static,
    R: ReferenceStore + 'static,
{
    Router::new()
        .route(
            "/api/delivery/fee/city/:city_id/vehicle/:vehicle_id",
            get(quote_handler::<M, R>),
        )
        .route("/api/delivery/rules", post(create_rule_handler::<M, R>))
        .with_state(service)
}

pub(crate) async fn quote_handler<M, R>(
    State(service): State<Arc<DeliveryFeeService<M, R>>>,
    Path((city_id, vehicle_id)): Path<(u64, u64)>,
) -> Response
where
    M: MeasurementStore + 'static,
    R: ReferenceStore + 'static,
{
    match service.quote(CityId(city_id), VehicleId(vehicle_id)) {
        Ok(quote) => (StatusCode::OK, axum::Json(quote)).into_response(),
        Err(DeliveryFeeError::ForbiddenWeather { code }) => {
            warn!(city_id, vehicle_id, code = %code, "vehicle type prohibited by weather");
            let payload = json!({ "error": "usage of the selected vehicle type is forbidden" });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
        Err(
            err @ (DeliveryFeeError::InvalidVehicle(_)
            | DeliveryFeeError::InvalidCity(_)
            | DeliveryFeeError::NoBaseFee { .. }),
        ) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
        Err(err @ DeliveryFeeError::NoWeatherData(_)) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
        }
        Err(err) => {
            error!(city_id, vehicle_id, error = %err, "delivery fee lookup failed");
            masked_internal_error()
        }
    }
}

pub(crate) async fn create_rule_handler<M, R>(
    State(service): State<Arc<DeliveryFeeService<M, R>>>,
    axum::Json(draft): axum::Json<ConditionRuleDraft>,
) -> Response
where
    M: MeasurementStore + 'static,
    R: ReferenceStore + 'static,
{
    match service.create_rule(draft) {
        Ok(rule) => (StatusCode::CREATED, axum::Json(rule)).into_response(),
        Err(ConditionRuleError::Reference(err)) => {
            error!(error = %err, "condition rule creation failed");
            masked_internal_error()
        }
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
    }
}

/// Store failures reach the caller with a masked message; the detail stays
/// in the operator logs.
fn masked_internal_error() -> Response {
    let payload = json!({ "error": "internal error" });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
