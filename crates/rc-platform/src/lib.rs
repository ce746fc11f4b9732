//! RoadCall Platform
//!
//! Core platform providing:
//! - Customer and mechanic identity management over one shared namespace
//! - Session token issuance and verification
//! - Single-use password reset token handling
//! - Service request lifecycle management with role-scoped views

pub mod api;
pub mod domain;
pub mod error;
pub mod repository;
pub mod service;

pub use domain::*;
pub use error::PlatformError;
