//! OpenAPI Documentation
//!
//! Central OpenAPI specification for all platform APIs.

use utoipa::OpenApi;

/// Platform API OpenAPI Documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "RoadCall Platform API",
        version = "1.0.0",
        description = "REST APIs for identity, availability, and service request management"
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "auth", description = "Registration, login, and password recovery"),
        (name = "profiles", description = "Actor self-service"),
        (name = "mechanics", description = "Mechanic availability and details"),
        (name = "service-requests", description = "Service request lifecycle")
    ),
    paths(
        // Auth API
        super::auth::register,
        super::auth::login,
        super::auth::forgot_password,
        super::auth::reset_password,
        // Profiles API
        super::profiles::get_my_info,
        super::profiles::update_profile,
        super::profiles::delete_profile,
        // Mechanics API
        super::mechanics::get_status,
        super::mechanics::update_status,
        super::mechanics::get_details,
        // Service Requests API
        super::service_requests::create_service_request,
        super::service_requests::approve_request,
        super::service_requests::reject_request,
        super::service_requests::list_my_requests,
        super::service_requests::mechanic_inbox,
    ),
    components(
        schemas(
            // Auth schemas
            super::auth::RegisterRequest,
            super::auth::LoginRequest,
            super::auth::LoginResponse,
            super::auth::ForgotPasswordRequest,
            super::auth::ForgotPasswordResponse,
            super::auth::ResetPasswordRequest,
            // Profile schemas
            super::profiles::ActorResponse,
            super::profiles::UpdateProfileRequest,
            // Mechanic schemas
            super::mechanics::AvailabilityResponse,
            super::mechanics::UpdateAvailabilityRequest,
            // Service request schemas
            super::service_requests::CreateServiceRequestRequest,
            super::service_requests::ServiceRequestResponse,
            // Common schemas
            super::common::ApiError,
            super::common::CreatedResponse,
            super::common::SuccessResponse,
        )
    )
)]
pub struct PlatformApiDoc;
