//! Repository Layer
//!
//! MySQL repositories for all domain entities. Statements are individually
//! atomic; the database is the sole arbiter for identity uniqueness and
//! single-use token redemption.

pub mod actor;
pub mod reset_token;
pub mod service_request;

pub use actor::ActorRepository;
pub use reset_token::ResetTokenRepository;
pub use service_request::ServiceRequestRepository;

use crate::error::PlatformError;

/// Unique-constraint violations on the identity columns surface as duplicate
/// identity; the pre-insert check cannot cover two racing inserts.
pub(crate) fn duplicate_identity(err: sqlx::Error) -> PlatformError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            PlatformError::duplicate("username or email already exists")
        }
        _ => PlatformError::from(err),
    }
}
