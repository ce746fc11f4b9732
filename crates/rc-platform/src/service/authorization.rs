//! Authorization Context and Checks
//!
//! Pure role and ownership checks applied after token validation,
//! independent of transport.

use crate::domain::ActorRole;
use crate::error::{PlatformError, Result};

/// Verified identity derived from a session token
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub actor_id: i64,
    pub role: ActorRole,
}

impl AuthContext {
    pub fn is_mechanic(&self) -> bool {
        self.role == ActorRole::Mechanic
    }

    pub fn is_customer(&self) -> bool {
        self.role == ActorRole::Customer
    }

    pub fn is_self(&self, role: ActorRole, actor_id: i64) -> bool {
        self.role == role && self.actor_id == actor_id
    }
}

pub mod checks {
    use super::*;

    pub fn require_mechanic(ctx: &AuthContext) -> Result<()> {
        if !ctx.is_mechanic() {
            return Err(PlatformError::forbidden("Mechanic role required"));
        }
        Ok(())
    }

    pub fn require_customer(ctx: &AuthContext) -> Result<()> {
        if !ctx.is_customer() {
            return Err(PlatformError::forbidden("Customer role required"));
        }
        Ok(())
    }

    /// Profile mutations are allowed only on the caller's own record.
    pub fn require_self(ctx: &AuthContext, role: ActorRole, actor_id: i64) -> Result<()> {
        if !ctx.is_self(role, actor_id) {
            return Err(PlatformError::forbidden("No access to this profile"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mechanic(id: i64) -> AuthContext {
        AuthContext {
            actor_id: id,
            role: ActorRole::Mechanic,
        }
    }

    fn customer(id: i64) -> AuthContext {
        AuthContext {
            actor_id: id,
            role: ActorRole::Customer,
        }
    }

    #[test]
    fn test_require_mechanic() {
        assert!(checks::require_mechanic(&mechanic(1)).is_ok());
        assert!(matches!(
            checks::require_mechanic(&customer(1)),
            Err(PlatformError::Forbidden { .. })
        ));
    }

    #[test]
    fn test_require_customer() {
        assert!(checks::require_customer(&customer(1)).is_ok());
        assert!(checks::require_customer(&mechanic(1)).is_err());
    }

    #[test]
    fn test_require_self() {
        let ctx = customer(7);
        assert!(checks::require_self(&ctx, ActorRole::Customer, 7).is_ok());
        assert!(checks::require_self(&ctx, ActorRole::Customer, 8).is_err());
        assert!(checks::require_self(&ctx, ActorRole::Mechanic, 7).is_err());
    }
}
