//! Mechanics API
//!
//! Mechanic-only endpoints: availability flag and own record details.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::api::common::{ApiResult, SuccessResponse};
use crate::api::middleware::Authenticated;
use crate::api::profiles::ActorResponse;
use crate::error::PlatformError;
use crate::repository::ActorRepository;
use crate::service::checks;

/// Availability response
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub is_available: bool,
}

/// Availability update request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAvailabilityRequest {
    pub is_available: bool,
}

/// Mechanics service state
#[derive(Clone)]
pub struct MechanicsState {
    pub actor_repo: Arc<ActorRepository>,
}

/// Get the calling mechanic's availability
#[utoipa::path(
    get,
    path = "/status",
    tag = "mechanics",
    responses(
        (status = 200, description = "Availability flag", body = AvailabilityResponse),
        (status = 403, description = "Caller is not a mechanic")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_status(
    State(state): State<MechanicsState>,
    Authenticated(auth): Authenticated,
) -> ApiResult<AvailabilityResponse> {
    checks::require_mechanic(&auth)?;

    let is_available = state
        .actor_repo
        .get_availability(auth.actor_id)
        .await?
        .ok_or_else(|| PlatformError::not_found("Mechanic", auth.actor_id.to_string()))?;
    Ok(Json(AvailabilityResponse { is_available }))
}

/// Set the calling mechanic's availability
#[utoipa::path(
    put,
    path = "/status",
    tag = "mechanics",
    request_body = UpdateAvailabilityRequest,
    responses(
        (status = 200, description = "Availability updated", body = SuccessResponse),
        (status = 403, description = "Caller is not a mechanic")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_status(
    State(state): State<MechanicsState>,
    Authenticated(auth): Authenticated,
    Json(req): Json<UpdateAvailabilityRequest>,
) -> ApiResult<SuccessResponse> {
    checks::require_mechanic(&auth)?;

    state
        .actor_repo
        .set_availability(auth.actor_id, req.is_available)
        .await?;
    Ok(Json(SuccessResponse::with_message("Availability updated")))
}

/// Get the calling mechanic's full record
#[utoipa::path(
    get,
    path = "/details",
    tag = "mechanics",
    responses(
        (status = 200, description = "Mechanic record", body = ActorResponse),
        (status = 403, description = "Caller is not a mechanic")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_details(
    State(state): State<MechanicsState>,
    Authenticated(auth): Authenticated,
) -> ApiResult<ActorResponse> {
    checks::require_mechanic(&auth)?;

    let mechanic = state
        .actor_repo
        .find_by_id(auth.role, auth.actor_id)
        .await?
        .ok_or_else(|| PlatformError::not_found("Mechanic", auth.actor_id.to_string()))?;
    Ok(Json(mechanic.into()))
}

/// Create the mechanics router
pub fn mechanics_router(state: MechanicsState) -> Router {
    Router::new()
        .route("/status", get(get_status).put(update_status))
        .route("/details", get(get_details))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_availability_request_deserialization() {
        let req: UpdateAvailabilityRequest =
            serde_json::from_str(r#"{"isAvailable":true}"#).unwrap();
        assert!(req.is_available);
    }

    #[test]
    fn test_availability_response_serialization() {
        let json = serde_json::to_string(&AvailabilityResponse { is_available: false }).unwrap();
        assert_eq!(json, r#"{"isAvailable":false}"#);
    }
}
