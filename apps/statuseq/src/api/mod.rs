//! # statuseq HTTP API Module
//!
//! This module implements the HTTP API server using axum.
//!
//! ## Endpoints
//!
//! - `POST /compare` - Compare the statuses of two resource documents
//! - `GET /config` - Effective comparison options
//! - `GET /health` - Health check
//!
//! ## Security Configuration
//!
//! - `[server] cors_origins`: browser origins allowed to call the API (default: none)
//! - `[server] rate_limit`: requests per second, 0 to disable
//! - `STATUSEQ_RATE_LIMIT`: overrides `[server] rate_limit` when numeric
//! - `STATUSEQ_API_KEY`: If set, requires Bearer token authentication

mod auth;
mod handlers;
mod middleware;
mod types;

pub use auth::{API_KEY_ENV_VAR, get_api_key_from_env};
pub use handlers::{compare_handler, config_handler, health_handler};
pub use middleware::{
    RATE_LIMIT_ENV_VAR, create_rate_limiter, effective_rate_limit, resolve_rate_limit,
};
pub use types::{CompareRequest, CompareResponse, HealthResponse};

use crate::config::AppConfig;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post},
};
use statuseq_core::{Comparator, StatusEqError};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

/// Maximum request body size (2 MB).
const MAX_BODY_SIZE: usize = 2 * 1024 * 1024;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state. The comparator is immutable, so no lock is needed.
#[derive(Clone)]
pub struct AppState {
    pub comparator: Arc<Comparator>,
    /// Configured requests per second; `STATUSEQ_RATE_LIMIT` takes precedence.
    pub rate_limit: u32,
    /// Allowed browser origins, validated by [`ServerConfig::validate`](crate::config::ServerConfig::validate).
    pub cors_origins: Vec<String>,
}

impl AppState {
    /// Create app state around a comparator, with no cross-origin access.
    #[must_use]
    pub fn new(comparator: Comparator, rate_limit: u32) -> Self {
        Self {
            comparator: Arc::new(comparator),
            rate_limit,
            cors_origins: Vec::new(),
        }
    }

    /// Allow the given browser origins.
    #[must_use]
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = origins;
        self
    }

    /// Build app state from the loaded configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, StatusEqError> {
        let comparator = Comparator::with_options(config.compare.clone())?;
        Ok(Self::new(comparator, config.server.rate_limit)
            .with_cors_origins(config.server.cors_origins.clone()))
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// CORS layer for the configured origins, or `None` when no origin is allowed.
///
/// Without a layer the server sends no CORS headers, so browsers keep it
/// same-origin.
fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    let allow_origin = match origins {
        [] => {
            tracing::debug!("CORS disabled, no [server] cors_origins configured");
            return None;
        }
        [only] if only == "*" => {
            tracing::warn!("CORS allows any origin ([server] cors_origins = [\"*\"])");
            AllowOrigin::any()
        }
        listed => {
            let values: Vec<HeaderValue> = listed
                .iter()
                .filter_map(|origin| match HeaderValue::from_str(origin) {
                    Ok(value) => Some(value),
                    Err(e) => {
                        tracing::warn!(origin = %origin, "Skipping CORS origin: {}", e);
                        None
                    }
                })
                .collect();
            tracing::info!(origins = ?listed, "CORS enabled");
            AllowOrigin::list(values)
        }
    };

    Some(
        CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
    )
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests (if origins are configured)
/// 3. Body limit
/// 4. Rate Limiting (if enabled)
/// 5. Authentication (if configured)
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.cors_origins);

    let rate_limiter = match effective_rate_limit(state.rate_limit) {
        Some(rps) => {
            tracing::info!("Rate limiting enabled: {} requests/second", rps);
            Some(create_rate_limiter(rps))
        }
        None => {
            tracing::info!("Rate limiting disabled");
            None
        }
    };

    let has_auth = get_api_key_from_env().is_some();
    if has_auth {
        tracing::info!("API key authentication enabled");
    } else {
        tracing::warn!(
            "API key authentication DISABLED - all endpoints are publicly accessible! \
             Set STATUSEQ_API_KEY environment variable to enable authentication."
        );
    }

    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/compare", post(handlers::compare_handler))
        .route("/config", get(handlers::config_handler));

    if has_auth {
        router = router.layer(axum_middleware::from_fn(auth::api_key_auth_middleware));
    }

    if let Some(limiter) = rate_limiter {
        router = router.layer(axum_middleware::from_fn_with_state(
            limiter,
            middleware::rate_limit_middleware,
        ));
    }

    router = router.layer(axum::extract::DefaultBodyLimit::max(MAX_BODY_SIZE));
    if let Some(cors) = cors {
        router = router.layer(cors);
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Resolve once Ctrl+C is received.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// Start the HTTP server and run until Ctrl+C.
pub async fn run_server(addr: &str, state: AppState) -> Result<(), StatusEqError> {
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| StatusEqError::IoError(format!("Bind failed: {}", e)))?;

    tracing::info!("statuseq HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| StatusEqError::IoError(format!("Server error: {}", e)))
}
