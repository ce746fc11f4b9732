//! Service Requests API
//!
//! Creation is open to unauthenticated callers; approval, rejection, and the
//! role-scoped list views are gated by the session token.

use axum::extract::{Path, State};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::api::common::{ApiResult, CreatedResponse, SuccessResponse};
use crate::api::middleware::Authenticated;
use crate::domain::{NewServiceRequest, ServiceRequest};
use crate::error::PlatformError;
use crate::repository::ServiceRequestRepository;
use crate::service::checks;

/// Create service request payload
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceRequestRequest {
    pub customer_name: String,
    pub phone_number: String,
    pub service_type: String,

    /// Free-text location
    pub location: String,

    /// Optional back-reference to a registered customer
    #[serde(default)]
    pub user_id: Option<i64>,
}

/// Service request response DTO
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequestResponse {
    pub id: i64,
    pub customer_name: String,
    pub phone_number: String,
    pub service_type: String,
    pub location: String,
    pub user_id: Option<i64>,
    pub mechanic_id: Option<i64>,
    pub status: String,
    pub created_at: String,
}

impl From<ServiceRequest> for ServiceRequestResponse {
    fn from(request: ServiceRequest) -> Self {
        Self {
            id: request.id,
            customer_name: request.customer_name,
            phone_number: request.phone_number,
            service_type: request.service_type,
            location: request.location,
            user_id: request.user_id,
            mechanic_id: request.mechanic_id,
            status: request.status.as_str().to_string(),
            created_at: request.created_at.to_rfc3339(),
        }
    }
}

/// Service requests service state
#[derive(Clone)]
pub struct ServiceRequestsState {
    pub request_repo: Arc<ServiceRequestRepository>,
}

fn require_field(value: &str, field: &str) -> Result<(), PlatformError> {
    if value.trim().is_empty() {
        return Err(PlatformError::validation(format!("{} is required", field)));
    }
    Ok(())
}

/// Create a service request
///
/// Open endpoint; requests may be filed without an account.
#[utoipa::path(
    post,
    path = "",
    tag = "service-requests",
    request_body = CreateServiceRequestRequest,
    responses(
        (status = 200, description = "Request submitted", body = CreatedResponse),
        (status = 400, description = "Missing fields")
    )
)]
pub async fn create_service_request(
    State(state): State<ServiceRequestsState>,
    Json(req): Json<CreateServiceRequestRequest>,
) -> ApiResult<CreatedResponse> {
    require_field(&req.customer_name, "customerName")?;
    require_field(&req.phone_number, "phoneNumber")?;
    require_field(&req.service_type, "serviceType")?;
    require_field(&req.location, "location")?;

    let request = NewServiceRequest {
        customer_name: req.customer_name,
        phone_number: req.phone_number,
        service_type: req.service_type,
        location: req.location,
        user_id: req.user_id,
    };

    let id = state.request_repo.insert(&request).await?;
    Ok(Json(CreatedResponse::new(id)))
}

/// Approve a request
///
/// Assigns the calling mechanic and marks the request approved.
#[utoipa::path(
    put,
    path = "/{id}/approve",
    tag = "service-requests",
    params(
        ("id" = i64, Path, description = "Service request ID")
    ),
    responses(
        (status = 200, description = "Request approved", body = SuccessResponse),
        (status = 403, description = "Caller is not a mechanic"),
        (status = 404, description = "Request not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn approve_request(
    State(state): State<ServiceRequestsState>,
    Authenticated(auth): Authenticated,
    Path(id): Path<i64>,
) -> ApiResult<SuccessResponse> {
    checks::require_mechanic(&auth)?;

    state.request_repo.approve(id, auth.actor_id).await?;
    Ok(Json(SuccessResponse::with_message("Request approved")))
}

/// Reject a request
#[utoipa::path(
    put,
    path = "/{id}/reject",
    tag = "service-requests",
    params(
        ("id" = i64, Path, description = "Service request ID")
    ),
    responses(
        (status = 200, description = "Request rejected", body = SuccessResponse),
        (status = 403, description = "Caller is not a mechanic")
    ),
    security(("bearer_auth" = []))
)]
pub async fn reject_request(
    State(state): State<ServiceRequestsState>,
    Authenticated(auth): Authenticated,
    Path(id): Path<i64>,
) -> ApiResult<SuccessResponse> {
    checks::require_mechanic(&auth)?;

    state.request_repo.reject(id).await?;
    Ok(Json(SuccessResponse::with_message("Request rejected")))
}

/// List the calling customer's requests, newest first
#[utoipa::path(
    get,
    path = "/mine",
    tag = "service-requests",
    responses(
        (status = 200, description = "Requests for the caller", body = Vec<ServiceRequestResponse>),
        (status = 403, description = "Caller is not a customer")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_my_requests(
    State(state): State<ServiceRequestsState>,
    Authenticated(auth): Authenticated,
) -> ApiResult<Vec<ServiceRequestResponse>> {
    checks::require_customer(&auth)?;

    let requests = state.request_repo.list_for_customer(auth.actor_id).await?;
    Ok(Json(requests.into_iter().map(Into::into).collect()))
}

/// The calling mechanic's inbox
///
/// Every pending request plus every request this mechanic already claimed,
/// newest first.
#[utoipa::path(
    get,
    path = "/inbox",
    tag = "service-requests",
    responses(
        (status = 200, description = "Inbox for the caller", body = Vec<ServiceRequestResponse>),
        (status = 403, description = "Caller is not a mechanic")
    ),
    security(("bearer_auth" = []))
)]
pub async fn mechanic_inbox(
    State(state): State<ServiceRequestsState>,
    Authenticated(auth): Authenticated,
) -> ApiResult<Vec<ServiceRequestResponse>> {
    checks::require_mechanic(&auth)?;

    let requests = state.request_repo.list_for_mechanic(auth.actor_id).await?;
    Ok(Json(requests.into_iter().map(Into::into).collect()))
}

/// Create the service requests router
pub fn service_requests_router(state: ServiceRequestsState) -> Router {
    Router::new()
        .route("/", post(create_service_request))
        .route("/mine", get(list_my_requests))
        .route("/inbox", get(mechanic_inbox))
        .route("/:id/approve", put(approve_request))
        .route("/:id/reject", put(reject_request))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RequestStatus;
    use chrono::Utc;

    #[test]
    fn test_create_request_deserialization() {
        let json = r#"{
            "customerName": "Alice",
            "phoneNumber": "0700000001",
            "serviceType": "Towing",
            "location": "Main St and 5th"
        }"#;
        let req: CreateServiceRequestRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.service_type, "Towing");
        assert!(req.user_id.is_none());
    }

    #[test]
    fn test_response_serialization() {
        let response: ServiceRequestResponse = ServiceRequest {
            id: 9,
            customer_name: "Alice".to_string(),
            phone_number: "0700000001".to_string(),
            service_type: "Towing".to_string(),
            location: "Main St".to_string(),
            user_id: Some(1),
            mechanic_id: None,
            status: RequestStatus::Pending,
            created_at: Utc::now(),
        }
        .into();

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"PENDING\""));
        assert!(json.contains("customerName"));
        assert!(json.contains("\"mechanicId\":null"));
    }
}
