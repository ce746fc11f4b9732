//! Platform API Integration Tests
//!
//! Tests for platform domain models, session tokens, authorization, and
//! error handling.

use rc_platform::domain::{
    ActorRole, NewActor, NewResetToken, RequestStatus, RESET_TOKEN_BYTES,
};
use rc_platform::service::auth::DEFAULT_SESSION_EXPIRY_SECS;
use rc_platform::service::{checks, AuthConfig, AuthContext, AuthService, PasswordService};

// Unit tests for domain models
mod domain_tests {
    use super::*;

    fn registration(role: ActorRole, username: &str, email: &str) -> NewActor {
        NewActor {
            role,
            name: username.to_string(),
            username: username.to_string(),
            mobile: "0700000000".to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$stub".to_string(),
            latitude: (role == ActorRole::Mechanic).then_some(1.0),
            longitude: (role == ActorRole::Mechanic).then_some(2.0),
        }
    }

    #[test]
    fn test_customer_registration_shape() {
        let alice = registration(ActorRole::Customer, "alice", "alice@x.com");
        assert!(alice.validate().is_ok());
        assert!(alice.latitude.is_none());
    }

    #[test]
    fn test_mechanic_registration_requires_coordinates() {
        let mut bob = registration(ActorRole::Mechanic, "bob", "bob@x.com");
        assert!(bob.validate().is_ok());

        bob.longitude = None;
        assert!(bob.validate().is_err());
    }

    #[test]
    fn test_request_status_lifecycle() {
        assert!(!RequestStatus::Pending.is_terminal());
        assert!(RequestStatus::Approved.is_terminal());
        assert!(RequestStatus::Rejected.is_terminal());
        assert_eq!(RequestStatus::parse("PENDING"), Some(RequestStatus::Pending));
    }

    #[test]
    fn test_reset_token_entropy() {
        let a = NewResetToken::issue(ActorRole::Customer, 1);
        let b = NewResetToken::issue(ActorRole::Customer, 1);

        assert_eq!(a.token.len(), RESET_TOKEN_BYTES * 2);
        assert_ne!(a.token, b.token);
        assert!(a.token.chars().all(|c| c.is_ascii_hexdigit()));
    }
}

// Session token tests
mod token_tests {
    use super::*;
    use rc_platform::PlatformError;

    fn service() -> AuthService {
        AuthService::new(AuthConfig::new("integration-test-secret"))
    }

    #[test]
    fn test_round_trip_preserves_identity() {
        let service = service();
        for (id, role) in [(1, ActorRole::Customer), (99, ActorRole::Mechanic)] {
            let token = service.issue_token(id, role).unwrap();
            let claims = service.validate_token(&token).unwrap();
            assert_eq!(claims.sub, id.to_string());
            assert_eq!(claims.role, role);
        }
    }

    #[test]
    fn test_seven_day_lifetime() {
        let token = service().issue_token(1, ActorRole::Customer).unwrap();
        let claims = service().validate_token(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, DEFAULT_SESSION_EXPIRY_SECS);
        assert_eq!(DEFAULT_SESSION_EXPIRY_SECS, 7 * 24 * 3600);
    }

    #[test]
    fn test_expired_token_fails_verification() {
        let expired = AuthService::new(
            AuthConfig::new("integration-test-secret").with_expiry_secs(-3600),
        );
        let token = expired.issue_token(1, ActorRole::Customer).unwrap();
        assert!(matches!(
            service().validate_token(&token),
            Err(PlatformError::TokenExpired)
        ));
    }

    #[test]
    fn test_tampered_token_fails_verification() {
        let token = service().issue_token(1, ActorRole::Customer).unwrap();
        let mut tampered = token.clone();
        tampered.pop();
        assert!(service().validate_token(&tampered).is_err());
    }
}

// Authorization context tests
mod authorization_tests {
    use super::*;

    fn ctx(role: ActorRole, actor_id: i64) -> AuthContext {
        AuthContext { actor_id, role }
    }

    #[test]
    fn test_mechanic_gate() {
        assert!(checks::require_mechanic(&ctx(ActorRole::Mechanic, 1)).is_ok());
        assert!(checks::require_mechanic(&ctx(ActorRole::Customer, 1)).is_err());
    }

    #[test]
    fn test_customer_gate() {
        assert!(checks::require_customer(&ctx(ActorRole::Customer, 1)).is_ok());
        assert!(checks::require_customer(&ctx(ActorRole::Mechanic, 1)).is_err());
    }

    #[test]
    fn test_ownership_gate() {
        let caller = ctx(ActorRole::Customer, 7);
        assert!(checks::require_self(&caller, ActorRole::Customer, 7).is_ok());

        // Same id under the other role is a different actor
        assert!(checks::require_self(&caller, ActorRole::Mechanic, 7).is_err());
        assert!(checks::require_self(&caller, ActorRole::Customer, 8).is_err());
    }
}

// Password handling tests
mod password_tests {
    use super::*;

    #[test]
    fn test_reset_flow_secret_rotation() {
        // Hash replacement is what redemption performs; the old secret must
        // stop verifying once the new hash is in place.
        let service = PasswordService::default();
        let old_hash = service.hash_password("oldSecret").unwrap();
        let new_hash = service.hash_password("newSecret").unwrap();

        assert!(service.verify_password("oldSecret", &old_hash).unwrap());
        assert!(!service.verify_password("oldSecret", &new_hash).unwrap());
        assert!(service.verify_password("newSecret", &new_hash).unwrap());
    }

    #[test]
    fn test_policy_applies_to_new_secrets() {
        let service = PasswordService::default();
        assert!(service.policy().validate("short").is_err());
        assert!(service.policy().validate("newSecret").is_ok());
    }
}

// Error handling tests
mod error_tests {
    use rc_platform::error::PlatformError;

    #[test]
    fn test_not_found_error() {
        let err = PlatformError::not_found("ServiceRequest", "41");
        let msg = err.to_string();
        assert!(msg.contains("ServiceRequest"));
        assert!(msg.contains("41"));
    }

    #[test]
    fn test_duplicate_error() {
        let err = PlatformError::duplicate("username or email already exists");
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_reset_token_failures_are_indistinguishable() {
        // Expired and never-issued tokens share one variant and one message.
        let expired = PlatformError::InvalidResetToken;
        let missing = PlatformError::InvalidResetToken;
        assert_eq!(expired.to_string(), missing.to_string());
    }

    #[test]
    fn test_only_store_failures_are_retryable() {
        let errors = vec![
            PlatformError::InvalidCredentials,
            PlatformError::TokenExpired,
            PlatformError::InvalidResetToken,
            PlatformError::validation("bad"),
            PlatformError::forbidden("no"),
        ];
        for err in errors {
            assert!(!err.is_retryable());
        }
        assert!(PlatformError::Database(sqlx::Error::PoolTimedOut).is_retryable());
    }
}
