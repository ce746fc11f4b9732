//! API Middleware
//!
//! Authentication extractors for Axum. `Authenticated` turns the bearer
//! token into an [`AuthContext`]; role and ownership checks stay with the
//! handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;

use crate::api::common::ApiError;
use crate::error::PlatformError;
use crate::service::auth::AccessTokenClaims;
use crate::service::{extract_bearer_token, AuthContext, AuthService};

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
}

/// Extractor for authenticated requests.
/// Validates the session token and yields the caller's identity.
pub struct Authenticated(pub AuthContext);

#[axum::async_trait]
impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                let error = ApiError {
                    error: "UNAUTHORIZED".to_string(),
                    message: "Missing Authorization header".to_string(),
                    details: None,
                };
                (StatusCode::UNAUTHORIZED, Json(error)).into_response()
            })?;

        let token = extract_bearer_token(auth_header).ok_or_else(|| {
            let error = ApiError {
                error: "UNAUTHORIZED".to_string(),
                message: "Invalid Authorization header format".to_string(),
                details: None,
            };
            (StatusCode::UNAUTHORIZED, Json(error)).into_response()
        })?;

        let app_state = parts.extensions.get::<AppState>().ok_or_else(|| {
            let error = ApiError {
                error: "INTERNAL_ERROR".to_string(),
                message: "AppState not found".to_string(),
                details: None,
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
        })?;

        let claims = app_state
            .auth_service
            .validate_token(token)
            .map_err(|e| e.into_response())?;

        let context = context_from_claims(&claims).map_err(|e| e.into_response())?;
        Ok(Authenticated(context))
    }
}

/// Extractor for optionally authenticated requests
pub struct OptionalAuth(pub Option<AuthContext>);

#[axum::async_trait]
impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = match parts.headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
            Some(h) => h,
            None => return Ok(OptionalAuth(None)),
        };

        let token = match extract_bearer_token(auth_header) {
            Some(t) => t,
            None => return Ok(OptionalAuth(None)),
        };

        let app_state = match parts.extensions.get::<AppState>() {
            Some(s) => s,
            None => return Ok(OptionalAuth(None)),
        };

        let claims = match app_state.auth_service.validate_token(token) {
            Ok(c) => c,
            Err(_) => return Ok(OptionalAuth(None)),
        };

        match context_from_claims(&claims) {
            Ok(ctx) => Ok(OptionalAuth(Some(ctx))),
            Err(_) => Ok(OptionalAuth(None)),
        }
    }
}

fn context_from_claims(claims: &AccessTokenClaims) -> crate::error::Result<AuthContext> {
    let actor_id = claims.sub.parse::<i64>().map_err(|_| PlatformError::InvalidToken {
        message: "Malformed subject claim".to_string(),
    })?;
    Ok(AuthContext {
        actor_id,
        role: claims.role,
    })
}
