//! Authentication Service
//!
//! Issues and validates the signed session tokens presented on protected
//! calls. Tokens are stateless: there is no revocation list, so a leaked
//! token remains valid until it expires.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::domain::ActorRole;
use crate::error::{PlatformError, Result};

/// Seven days, the session lifetime
pub const DEFAULT_SESSION_EXPIRY_SECS: i64 = 7 * 24 * 3600;

/// Signing configuration, constructed once at startup and injected into the
/// service; there is no ambient fallback secret.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub secret_key: String,
    pub issuer: String,
    pub session_token_expiry_secs: i64,
}

impl AuthConfig {
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            issuer: "roadcall".to_string(),
            session_token_expiry_secs: DEFAULT_SESSION_EXPIRY_SECS,
        }
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    pub fn with_expiry_secs(mut self, secs: i64) -> Self {
        self.session_token_expiry_secs = secs;
        self
    }
}

/// Claims embedded in a session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Actor id
    pub sub: String,
    pub role: ActorRole,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

pub struct AuthService {
    config: AuthConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl AuthService {
    pub fn new(config: AuthConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret_key.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret_key.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    pub fn session_token_expiry_secs(&self) -> i64 {
        self.config.session_token_expiry_secs
    }

    /// Sign a session token asserting `actor_id` and `role`.
    pub fn issue_token(&self, actor_id: i64, role: ActorRole) -> Result<String> {
        let now = chrono::Utc::now().timestamp();
        let claims = AccessTokenClaims {
            sub: actor_id.to_string(),
            role,
            iss: self.config.issuer.clone(),
            iat: now,
            exp: now + self.config.session_token_expiry_secs,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| PlatformError::internal(format!("Failed to sign token: {}", e)))
    }

    /// Validate signature, issuer, and expiry.
    pub fn validate_token(&self, token: &str) -> Result<AccessTokenClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);

        decode::<AccessTokenClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => PlatformError::TokenExpired,
                _ => PlatformError::InvalidToken {
                    message: e.to_string(),
                },
            })
    }
}

/// Pull the token out of an `Authorization: Bearer ...` header value.
pub fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AuthService {
        AuthService::new(AuthConfig::new("test-signing-secret"))
    }

    #[test]
    fn test_token_round_trip() {
        let service = service();
        let token = service.issue_token(42, ActorRole::Mechanic).unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.role, ActorRole::Mechanic);
        assert_eq!(claims.exp - claims.iat, DEFAULT_SESSION_EXPIRY_SECS);
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = AuthService::new(
            AuthConfig::new("test-signing-secret").with_expiry_secs(-3600),
        );
        let token = service.issue_token(1, ActorRole::Customer).unwrap();

        match service.validate_token(&token) {
            Err(PlatformError::TokenExpired) => {}
            other => panic!("expected TokenExpired, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = service().issue_token(1, ActorRole::Customer).unwrap();
        let other = AuthService::new(AuthConfig::new("a-different-secret"));
        assert!(matches!(
            other.validate_token(&token),
            Err(PlatformError::InvalidToken { .. })
        ));
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let token = service().issue_token(1, ActorRole::Customer).unwrap();
        let other = AuthService::new(
            AuthConfig::new("test-signing-secret").with_issuer("someone-else"),
        );
        assert!(other.validate_token(&token).is_err());
    }

    #[test]
    fn test_malformed_token_rejected() {
        assert!(matches!(
            service().validate_token("not.a.jwt"),
            Err(PlatformError::InvalidToken { .. })
        ));
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc123"), Some("abc123"));
        assert_eq!(extract_bearer_token("Bearer "), None);
        assert_eq!(extract_bearer_token("Basic abc123"), None);
        assert_eq!(extract_bearer_token("abc123"), None);
    }
}
