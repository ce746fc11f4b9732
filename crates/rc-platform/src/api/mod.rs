//! API Layer
//!
//! REST API endpoints for the platform.

pub mod common;
pub mod middleware;

pub mod auth;
pub mod mechanics;
pub mod openapi;
pub mod profiles;
pub mod service_requests;

pub use common::*;
pub use middleware::{AppState, Authenticated, OptionalAuth};

pub use auth::{auth_router, AuthState};
pub use mechanics::{mechanics_router, MechanicsState};
pub use openapi::PlatformApiDoc;
pub use profiles::{profiles_router, ProfilesState};
pub use service_requests::{service_requests_router, ServiceRequestsState};
