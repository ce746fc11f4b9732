//! RoadCall Platform Server
//!
//! Production server for the platform REST APIs:
//! - Auth APIs: registration, login, password recovery
//! - Profile APIs: self-service updates and deletion
//! - Mechanic APIs: availability and details
//! - Service Request APIs: creation, approval, rejection, list views
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `RC_API_PORT` | `8080` | HTTP API port |
//! | `RC_DATABASE_URL` | `mysql://root@localhost:3306/roadcall` | MySQL connection URL |
//! | `RC_JWT_SECRET` | - | Session token signing secret (required) |
//! | `RC_JWT_ISSUER` | `roadcall` | Token issuer claim |
//! | `RC_SESSION_TTL_SECS` | `604800` | Session token lifetime (7 days) |
//! | `RC_DB_MAX_CONNECTIONS` | `10` | Connection pool size |
//! | `RUST_LOG` | `info` | Log level |

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::routing::get;
use axum::{Extension, Json, Router};
use chrono::Utc;
use sqlx::mysql::MySqlPoolOptions;
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use rc_platform::api::{
    auth_router, mechanics_router, profiles_router, service_requests_router, AppState, AuthState,
    MechanicsState, PlatformApiDoc, ProfilesState, ServiceRequestsState,
};
use rc_platform::repository::{ActorRepository, ResetTokenRepository, ServiceRequestRepository};
use rc_platform::service::{AuthConfig, AuthService, PasswordResetService, PasswordService};

/// How often expired reset tokens are swept
const RESET_SWEEP_INTERVAL_SECS: u64 = 15 * 60;

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_or_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting RoadCall Platform Server");

    // Configuration from environment
    let api_port: u16 = env_or_parse("RC_API_PORT", 8080);
    let database_url = env_or("RC_DATABASE_URL", "mysql://root@localhost:3306/roadcall");
    let jwt_secret = std::env::var("RC_JWT_SECRET")
        .context("RC_JWT_SECRET must be set; sessions cannot be signed without it")?;
    let jwt_issuer = env_or("RC_JWT_ISSUER", "roadcall");
    let session_ttl_secs: i64 = env_or_parse("RC_SESSION_TTL_SECS", 7 * 24 * 3600);
    let max_connections: u32 = env_or_parse("RC_DB_MAX_CONNECTIONS", 10);

    // Connect to MySQL with a bounded pool; acquire waits are capped so no
    // request blocks indefinitely on the store
    info!("Connecting to MySQL");
    let pool = MySqlPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&database_url)
        .await
        .context("Failed to connect to MySQL")?;

    // Initialize repositories and bootstrap schemas
    let actor_repo = Arc::new(ActorRepository::new(pool.clone()));
    let request_repo = Arc::new(ServiceRequestRepository::new(pool.clone()));
    let reset_token_repo = Arc::new(ResetTokenRepository::new(pool.clone()));
    actor_repo.init_schema().await?;
    request_repo.init_schema().await?;
    reset_token_repo.init_schema().await?;
    info!("Repositories initialized");

    // Initialize services
    let auth_config = AuthConfig::new(jwt_secret)
        .with_issuer(jwt_issuer)
        .with_expiry_secs(session_ttl_secs);
    let auth_service = Arc::new(AuthService::new(auth_config));
    let password_service = Arc::new(PasswordService::default());
    let reset_service = Arc::new(PasswordResetService::new(
        actor_repo.clone(),
        reset_token_repo.clone(),
        password_service.clone(),
    ));
    info!("Auth services initialized");

    // Sweep expired reset tokens in the background; redemption never depends
    // on this, it only bounds table growth
    let sweep_repo = reset_token_repo.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(RESET_SWEEP_INTERVAL_SECS));
        loop {
            interval.tick().await;
            if let Err(e) = sweep_repo.purge_expired(Utc::now()).await {
                warn!("Reset token sweep failed: {}", e);
            }
        }
    });

    // Create AppState for the auth extractors
    let app_state = AppState {
        auth_service: auth_service.clone(),
    };

    // Build API states
    let auth_state = AuthState {
        actor_repo: actor_repo.clone(),
        auth_service,
        password_service,
        reset_service,
    };
    let profiles_state = ProfilesState {
        actor_repo: actor_repo.clone(),
    };
    let mechanics_state = MechanicsState { actor_repo };
    let service_requests_state = ServiceRequestsState { request_repo };

    // Build platform API router
    let app = Router::new()
        .nest("/auth", auth_router(auth_state))
        .nest("/profiles", profiles_router(profiles_state))
        .nest("/mechanic", mechanics_router(mechanics_state))
        .nest("/service-requests", service_requests_router(service_requests_state))
        .route("/health", get(health_handler))
        .merge(SwaggerUi::new("/swagger-ui").url("/q/openapi", PlatformApiDoc::openapi()))
        .layer(Extension(app_state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any));

    // Start API server
    let api_addr = format!("0.0.0.0:{}", api_port);
    info!("API server listening on http://{}", api_addr);

    let listener = TcpListener::bind(&api_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("RoadCall Platform Server shutdown complete");
    Ok(())
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "UP",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
