//! Password Reset Service
//!
//! Issues single-use recovery tokens and redeems them. Redemption claims the
//! token with a conditional delete before the password is touched, so racing
//! attempts on the same token cannot both succeed.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::domain::{NewResetToken, PasswordResetToken};
use crate::error::{PlatformError, Result};
use crate::repository::{ActorRepository, ResetTokenRepository};
use crate::service::PasswordService;

pub struct PasswordResetService {
    actor_repo: Arc<ActorRepository>,
    token_repo: Arc<ResetTokenRepository>,
    password_service: Arc<PasswordService>,
}

impl PasswordResetService {
    pub fn new(
        actor_repo: Arc<ActorRepository>,
        token_repo: Arc<ResetTokenRepository>,
        password_service: Arc<PasswordService>,
    ) -> Self {
        Self {
            actor_repo,
            token_repo,
            password_service,
        }
    }

    /// Issue a recovery token for the actor owning `email`, checked across
    /// both roles. The raw token is returned for out-of-band delivery and is
    /// never logged here.
    pub async fn request_reset(&self, email: &str) -> Result<String> {
        let actor = self
            .actor_repo
            .find_by_email(email)
            .await?
            .ok_or_else(|| PlatformError::not_found("Actor", email))?;

        let new_token = NewResetToken::issue(actor.role, actor.id);
        let raw = new_token.token.clone();
        self.token_repo.insert(&new_token).await?;

        info!(
            role = actor.role.as_str(),
            actor_id = actor.id,
            "Password reset token issued"
        );
        Ok(raw)
    }

    /// Redeem `token`, replacing the owning actor's password with
    /// `new_secret`. Nonexistent and expired tokens are reported identically.
    pub async fn redeem_reset(&self, token: &str, new_secret: &str) -> Result<()> {
        self.password_service.policy().validate(new_secret)?;

        let now = Utc::now();
        let record: PasswordResetToken = self
            .token_repo
            .find_valid(token, now)
            .await?
            .ok_or(PlatformError::InvalidResetToken)?;

        // The conditional delete is the single-use guard; a losing racer
        // stops here with the password untouched.
        if !self.token_repo.claim(record.id, now).await? {
            return Err(PlatformError::InvalidResetToken);
        }

        let hash = self.password_service.hash_password(new_secret)?;
        self.actor_repo
            .update_password(record.actor_role, record.actor_id, &hash)
            .await?;

        info!(
            role = record.actor_role.as_str(),
            actor_id = record.actor_id,
            "Password reset redeemed"
        );
        Ok(())
    }
}
