//! Service Layer
//!
//! Business logic services: authentication, authorization, password hashing,
//! and password reset.

pub mod auth;
pub mod authorization;
pub mod password;
pub mod reset;

pub use auth::{extract_bearer_token, AccessTokenClaims, AuthConfig, AuthService};
pub use authorization::{checks, AuthContext};
pub use password::{Argon2Config, PasswordPolicy, PasswordService};
pub use reset::PasswordResetService;
