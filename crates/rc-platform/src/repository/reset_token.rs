//! Reset Token Repository
//!
//! Persistence for password reset tokens. Redemption claims a token with a
//! conditional delete and an affected-row check, so two racing redemption
//! attempts cannot both succeed.

use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use tracing::info;

use crate::domain::{ActorRole, NewResetToken, PasswordResetToken};
use crate::error::{PlatformError, Result};

pub struct ResetTokenRepository {
    pool: MySqlPool,
}

impl ResetTokenRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS password_reset_tokens (
                id BIGINT AUTO_INCREMENT PRIMARY KEY,
                actor_role VARCHAR(20) NOT NULL,
                actor_id BIGINT NOT NULL,
                token VARCHAR(64) NOT NULL,
                expires_at BIGINT NOT NULL,
                UNIQUE KEY uq_reset_token (token),
                INDEX idx_reset_expiry (expires_at)
            ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_ci
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn insert(&self, token: &NewResetToken) -> Result<i64> {
        let result = sqlx::query(
            "INSERT INTO password_reset_tokens (actor_role, actor_id, token, expires_at) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(token.actor_role.as_str())
        .bind(token.actor_id)
        .bind(&token.token)
        .bind(token.expires_at.timestamp_millis())
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_id() as i64)
    }

    /// Find a non-expired record matching `token` exactly.
    pub async fn find_valid(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<PasswordResetToken>> {
        let row = sqlx::query(
            "SELECT id, actor_role, actor_id, token, expires_at \
             FROM password_reset_tokens WHERE token = ? AND expires_at > ?",
        )
        .bind(token)
        .bind(now.timestamp_millis())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| {
            let role_str: String = r.get("actor_role");
            let actor_role = ActorRole::parse(&role_str)
                .map_err(|_| PlatformError::internal(format!("Unknown actor role: {}", role_str)))?;
            let expires_at_ts: i64 = r.get("expires_at");
            let expires_at = DateTime::from_timestamp_millis(expires_at_ts)
                .ok_or_else(|| PlatformError::internal("Invalid timestamp"))?;

            Ok(PasswordResetToken {
                id: r.get("id"),
                actor_role,
                actor_id: r.get("actor_id"),
                token: r.get("token"),
                expires_at,
            })
        })
        .transpose()
    }

    /// Consume the token. The delete is conditional on the row still being
    /// present and unexpired; exactly one concurrent caller sees `true`.
    pub async fn claim(&self, id: i64, now: DateTime<Utc>) -> Result<bool> {
        let result =
            sqlx::query("DELETE FROM password_reset_tokens WHERE id = ? AND expires_at > ?")
                .bind(id)
                .bind(now.timestamp_millis())
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Drop expired rows. Redemption never depends on this; it only bounds
    /// table growth.
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query("DELETE FROM password_reset_tokens WHERE expires_at <= ?")
            .bind(now.timestamp_millis())
            .execute(&self.pool)
            .await?;

        let purged = result.rows_affected();
        if purged > 0 {
            info!("Purged {} expired reset tokens", purged);
        }
        Ok(purged)
    }
}
