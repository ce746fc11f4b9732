//! Domain Models
//!
//! Core entities for the marketplace: actor identities (customers and
//! mechanics), password reset tokens, and service requests.

pub mod actor;
pub mod reset_token;
pub mod service_request;

pub use actor::*;
pub use reset_token::*;
pub use service_request::*;
