//! Password Reset Tokens
//!
//! Single-use, short-lived secrets enabling password replacement without a
//! valid session. A token is consumed by deleting its row; expiry makes
//! unredeemed tokens inert.

use chrono::{DateTime, Duration, Utc};
use rand::RngCore;

use crate::domain::ActorRole;

/// Bytes of entropy behind each token, rendered as twice as many hex chars
pub const RESET_TOKEN_BYTES: usize = 24;

/// Tokens are redeemable for 30 minutes after issuance
pub const RESET_TOKEN_TTL_MINUTES: i64 = 30;

/// A persisted reset token
#[derive(Debug, Clone)]
pub struct PasswordResetToken {
    pub id: i64,
    pub actor_role: ActorRole,
    pub actor_id: i64,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl PasswordResetToken {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// A reset token not yet persisted
#[derive(Debug, Clone)]
pub struct NewResetToken {
    pub actor_role: ActorRole,
    pub actor_id: i64,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl NewResetToken {
    /// Issue a fresh token for the given actor.
    pub fn issue(actor_role: ActorRole, actor_id: i64) -> Self {
        let mut bytes = [0u8; RESET_TOKEN_BYTES];
        rand::rngs::OsRng.fill_bytes(&mut bytes);

        Self {
            actor_role,
            actor_id,
            token: hex::encode(bytes),
            expires_at: Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINUTES),
        }
    }
}
