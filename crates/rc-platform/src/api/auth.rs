//! Auth API Endpoints
//!
//! Registration, login, and the password recovery flow.
//! - POST /auth/register - Create a customer or mechanic identity
//! - POST /auth/login - Password-based login returning a session token
//! - POST /auth/forgot-password - Issue a password reset token
//! - POST /auth/reset-password - Redeem a reset token

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::api::common::{ApiResult, CreatedResponse, SuccessResponse};
use crate::domain::{ActorRole, NewActor};
use crate::error::PlatformError;
use crate::repository::ActorRepository;
use crate::service::{AuthService, PasswordResetService, PasswordService};

/// Registration request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Display name
    pub name: String,

    /// Login name, unique across customers and mechanics
    pub username: String,

    /// Mobile number
    pub mobile: String,

    /// Email address, unique across customers and mechanics
    pub email: String,

    /// Plaintext secret, hashed before it is stored
    pub password: String,

    /// Actor role (CUSTOMER or MECHANIC)
    pub role: String,

    /// Required for mechanics
    #[serde(default)]
    pub latitude: Option<f64>,

    /// Required for mechanics
    #[serde(default)]
    pub longitude: Option<f64>,
}

/// Login request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    /// Which actor table to authenticate against
    pub role: String,
}

/// Login response
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Session token
    pub access_token: String,

    /// Token type (always "Bearer")
    pub token_type: String,

    /// Expiration time in seconds
    pub expires_in: i64,
}

/// Forgot password request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Forgot password response. The token is handed to the transport for
/// out-of-band delivery; this service does not send email.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordResponse {
    pub reset_token: String,
}

/// Reset password request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}

/// Auth service state
#[derive(Clone)]
pub struct AuthState {
    pub actor_repo: Arc<ActorRepository>,
    pub auth_service: Arc<AuthService>,
    pub password_service: Arc<PasswordService>,
    pub reset_service: Arc<PasswordResetService>,
}

fn require_field(value: &str, field: &str) -> Result<(), PlatformError> {
    if value.trim().is_empty() {
        return Err(PlatformError::validation(format!("{} is required", field)));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), PlatformError> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    };
    if !valid {
        return Err(PlatformError::validation("Invalid email"));
    }
    Ok(())
}

/// Register a new actor
///
/// Creates a customer or mechanic identity. Usernames and emails are unique
/// across both roles.
#[utoipa::path(
    post,
    path = "/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Registered", body = CreatedResponse),
        (status = 400, description = "Missing or malformed fields"),
        (status = 409, description = "Username or email already exists")
    )
)]
pub async fn register(
    State(state): State<AuthState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<CreatedResponse> {
    let role = ActorRole::parse(&req.role)?;
    require_field(&req.name, "name")?;
    require_field(&req.username, "username")?;
    require_field(&req.mobile, "mobile")?;
    require_field(&req.email, "email")?;
    validate_email(&req.email)?;
    state.password_service.policy().validate(&req.password)?;

    let password_hash = state.password_service.hash_password(&req.password)?;
    let actor = NewActor {
        role,
        name: req.name,
        username: req.username,
        mobile: req.mobile,
        email: req.email,
        password_hash,
        latitude: req.latitude,
        longitude: req.longitude,
    };

    let id = state.actor_repo.insert(&actor).await?;
    Ok(Json(CreatedResponse::new(id)))
}

/// Login with username and password
///
/// Authenticates against the table selected by `role` and returns a session
/// token on success.
#[utoipa::path(
    post,
    path = "/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AuthState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let role = ActorRole::parse(&req.role)?;

    let actor = state
        .actor_repo
        .find_by_username(role, &req.username)
        .await?
        .ok_or(PlatformError::InvalidCredentials)?;

    if !state
        .password_service
        .verify_password(&req.password, &actor.password_hash)?
    {
        return Err(PlatformError::InvalidCredentials);
    }

    let access_token = state.auth_service.issue_token(actor.id, actor.role)?;
    Ok(Json(LoginResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: state.auth_service.session_token_expiry_secs(),
    }))
}

/// Request a password reset token
///
/// Looks the email up across both roles and returns a short-lived,
/// single-use token. Delivery to the actor is the transport's concern.
#[utoipa::path(
    post,
    path = "/forgot-password",
    tag = "auth",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Token issued", body = ForgotPasswordResponse),
        (status = 404, description = "Email not found")
    )
)]
pub async fn forgot_password(
    State(state): State<AuthState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> ApiResult<ForgotPasswordResponse> {
    require_field(&req.email, "email")?;
    let reset_token = state.reset_service.request_reset(&req.email).await?;
    Ok(Json(ForgotPasswordResponse { reset_token }))
}

/// Redeem a password reset token
///
/// Replaces the owning actor's password and consumes the token. A token that
/// never existed, expired, or was already redeemed is reported identically.
#[utoipa::path(
    post,
    path = "/reset-password",
    tag = "auth",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password updated", body = SuccessResponse),
        (status = 400, description = "Invalid or expired token")
    )
)]
pub async fn reset_password(
    State(state): State<AuthState>,
    Json(req): Json<ResetPasswordRequest>,
) -> ApiResult<SuccessResponse> {
    require_field(&req.token, "token")?;
    state
        .reset_service
        .redeem_reset(&req.token, &req.new_password)
        .await?;
    Ok(Json(SuccessResponse::with_message("Password updated")))
}

/// Create the auth router
pub fn auth_router(state: AuthState) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_deserialization() {
        let json = r#"{
            "name": "Alice",
            "username": "alice",
            "mobile": "0700000001",
            "email": "alice@x.com",
            "password": "hunter2hunter2",
            "role": "CUSTOMER"
        }"#;
        let req: RegisterRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.username, "alice");
        assert!(req.latitude.is_none());
    }

    #[test]
    fn test_register_request_with_coordinates() {
        let json = r#"{
            "name": "Bob",
            "username": "bob",
            "mobile": "0700000002",
            "email": "bob@x.com",
            "password": "wrenches4ever",
            "role": "MECHANIC",
            "latitude": 1.0,
            "longitude": 2.0
        }"#;
        let req: RegisterRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.latitude, Some(1.0));
        assert_eq!(req.longitude, Some(2.0));
    }

    #[test]
    fn test_login_response_serialization() {
        let response = LoginResponse {
            access_token: "token123".to_string(),
            token_type: "Bearer".to_string(),
            expires_in: 604800,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("accessToken"));
        assert!(json.contains("tokenType"));
        assert!(json.contains("expiresIn"));
    }

    #[test]
    fn test_reset_request_deserialization() {
        let json = r#"{"token":"abc","newPassword":"newSecret"}"#;
        let req: ResetPasswordRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.new_password, "newSecret");
    }

    #[test]
    fn test_email_validation() {
        assert!(validate_email("alice@x.com").is_ok());
        assert!(validate_email("alice@x").is_err());
        assert!(validate_email("@x.com").is_err());
        assert!(validate_email("alice").is_err());
        assert!(validate_email("alice@.com").is_err());
    }

    #[test]
    fn test_required_fields() {
        assert!(require_field("alice", "name").is_ok());
        assert!(require_field("  ", "name").is_err());
    }
}
