//! Profiles API
//!
//! Actor self-service: current identity lookup, profile updates, and
//! profile deletion. Mutations are allowed only on the caller's own record.

use axum::extract::{Path, State};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::api::common::{ApiResult, SuccessResponse};
use crate::api::middleware::Authenticated;
use crate::domain::{Actor, ActorRole, ProfileUpdate};
use crate::error::PlatformError;
use crate::repository::ActorRepository;
use crate::service::checks;

/// Actor response DTO; the password hash never leaves the repository layer
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActorResponse {
    pub id: i64,
    pub role: ActorRole,
    pub name: String,
    pub username: String,
    pub mobile: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
    pub created_at: String,
}

impl From<Actor> for ActorResponse {
    fn from(actor: Actor) -> Self {
        let is_available = actor.is_mechanic().then_some(actor.is_available);
        Self {
            id: actor.id,
            role: actor.role,
            name: actor.name,
            username: actor.username,
            mobile: actor.mobile,
            email: actor.email,
            latitude: actor.latitude,
            longitude: actor.longitude,
            is_available,
            created_at: actor.created_at.to_rfc3339(),
        }
    }
}

/// Profile update request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: String,
    pub mobile: String,
    pub email: String,

    /// Required for mechanics
    #[serde(default)]
    pub latitude: Option<f64>,

    /// Required for mechanics
    #[serde(default)]
    pub longitude: Option<f64>,
}

/// Profiles service state
#[derive(Clone)]
pub struct ProfilesState {
    pub actor_repo: Arc<ActorRepository>,
}

/// Get the calling actor's own record
#[utoipa::path(
    get,
    path = "/me",
    tag = "profiles",
    responses(
        (status = 200, description = "Current actor", body = ActorResponse),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_my_info(
    State(state): State<ProfilesState>,
    Authenticated(auth): Authenticated,
) -> ApiResult<ActorResponse> {
    let actor = state
        .actor_repo
        .find_by_id(auth.role, auth.actor_id)
        .await?
        .ok_or_else(|| PlatformError::not_found("Actor", auth.actor_id.to_string()))?;
    Ok(Json(actor.into()))
}

/// Update a profile
///
/// Only the actor whose role and id match the session token may update the
/// record. Mechanics must resupply their coordinates.
#[utoipa::path(
    put,
    path = "/{role}/{id}",
    tag = "profiles",
    params(
        ("role" = String, Path, description = "Actor role"),
        ("id" = i64, Path, description = "Actor ID")
    ),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = SuccessResponse),
        (status = 403, description = "Not the caller's profile")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_profile(
    State(state): State<ProfilesState>,
    Authenticated(auth): Authenticated,
    Path((role, id)): Path<(String, i64)>,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<SuccessResponse> {
    let role = ActorRole::parse(&role)?;
    checks::require_self(&auth, role, id)?;

    let update = ProfileUpdate {
        name: req.name,
        mobile: req.mobile,
        email: req.email,
        latitude: req.latitude,
        longitude: req.longitude,
    };
    state.actor_repo.update_profile(role, id, &update).await?;
    Ok(Json(SuccessResponse::with_message("Profile updated")))
}

/// Delete a profile
#[utoipa::path(
    delete,
    path = "/{role}/{id}",
    tag = "profiles",
    params(
        ("role" = String, Path, description = "Actor role"),
        ("id" = i64, Path, description = "Actor ID")
    ),
    responses(
        (status = 200, description = "Profile deleted", body = SuccessResponse),
        (status = 403, description = "Not the caller's profile")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_profile(
    State(state): State<ProfilesState>,
    Authenticated(auth): Authenticated,
    Path((role, id)): Path<(String, i64)>,
) -> ApiResult<SuccessResponse> {
    let role = ActorRole::parse(&role)?;
    checks::require_self(&auth, role, id)?;

    state.actor_repo.delete(role, id).await?;
    Ok(Json(SuccessResponse::with_message("Profile deleted")))
}

/// Create the profiles router
pub fn profiles_router(state: ProfilesState) -> Router {
    Router::new()
        .route("/me", get(get_my_info))
        .route("/:role/:id", put(update_profile).delete(delete_profile))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn actor(role: ActorRole) -> Actor {
        Actor {
            id: 5,
            role,
            name: "Test".to_string(),
            username: "test".to_string(),
            mobile: "0700000000".to_string(),
            email: "test@example.com".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            latitude: (role == ActorRole::Mechanic).then_some(1.5),
            longitude: (role == ActorRole::Mechanic).then_some(2.5),
            is_available: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_customer_response_omits_mechanic_fields() {
        let response: ActorResponse = actor(ActorRole::Customer).into();
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("latitude"));
        assert!(!json.contains("isAvailable"));
        assert!(!json.contains("password"));
    }

    #[test]
    fn test_mechanic_response_includes_mechanic_fields() {
        let response: ActorResponse = actor(ActorRole::Mechanic).into();
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"latitude\":1.5"));
        assert!(json.contains("\"isAvailable\":true"));
    }

    #[test]
    fn test_update_request_deserialization() {
        let json = r#"{"name":"New Name","mobile":"0711","email":"new@x.com"}"#;
        let req: UpdateProfileRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.name, "New Name");
        assert!(req.latitude.is_none());
    }
}
