//! # Mathplan HTTP API Module
//!
//! This module implements the HTTP REST API server using axum.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /status` - Catalog/cache/live-system status
//! - `GET /majors` - All majors with resolved tiers
//! - `GET /majors/{code}` - One major with its requirement
//! - `GET /tiers` - The four tier lists
//! - `GET /prereqs` - The course → prerequisite-rules map
//! - `GET /students/{id}/placement` - Resolved placement status
//! - `GET /students/{id}/plan` - Cached plan data
//! - `POST /students/{id}/responses` - Store survey answers (write-through)
//! - `DELETE /students/{id}/responses/{page}` - Delete a survey page
//! - `POST /live/reset` - Clear the live-system down flag
//!
//! ## Security Configuration (Environment Variables)
//!
//! - `MATHPLAN_CORS_ORIGINS`: Comma-separated list of allowed origins, or "*" for all (default: localhost only)
//! - `MATHPLAN_RATE_LIMIT`: Requests per second (default: 100, 0 to disable)

mod handlers;
mod middleware;
mod types;

// Re-exports for external use
pub use middleware::create_rate_limiter;
// Re-export handlers and types for integration tests (via `mathplan::api::*`)
#[allow(unused_imports)]
pub use handlers::{
    delete_responses_handler, health_handler, live_reset_handler, major_handler, majors_handler,
    placement_handler, plan_handler, prereqs_handler, status_handler, store_responses_handler,
    tiers_handler,
};
#[allow(unused_imports)]
pub use types::{
    DeleteResponsesResponse, ErrorResponse, HealthResponse, LiveResetResponse,
    MajorDetailResponse, MajorJson, MajorsResponse, OptionJson, PlacementResponse, PlanResponse,
    PrereqJson, PrereqsResponse, RequirementJson, StatusResponse, StoreResponsesRequest,
    StoreResponsesResponse, TiersResponse,
};

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{delete, get, post},
};
use mathplan_core::{MathPlanError, MathPlanService};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state containing the advising service.
#[derive(Clone)]
pub struct AppState {
    /// The advising service; internally synchronized.
    pub service: Arc<MathPlanService>,
}

impl AppState {
    /// Create new app state over a service.
    #[must_use]
    pub fn new(service: Arc<MathPlanService>) -> Self {
        Self { service }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build CORS layer from environment configuration.
///
/// Reads `MATHPLAN_CORS_ORIGINS` environment variable:
/// - If "*": allows all origins (development mode - use with caution!)
/// - If not set: defaults to localhost only (restrictive default)
/// - Otherwise: parses comma-separated list of allowed origins
fn build_cors_layer() -> CorsLayer {
    let origins_env = std::env::var("MATHPLAN_CORS_ORIGINS").ok();

    match origins_env.as_deref() {
        Some("*") => {
            tracing::warn!(
                "CORS: Allowing ALL origins (MATHPLAN_CORS_ORIGINS=*). This is insecure for production!"
            );
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed_origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|s| {
                    let trimmed = s.trim();
                    match trimmed.parse::<HeaderValue>() {
                        Ok(hv) => {
                            tracing::info!("CORS: Allowing origin: {}", trimmed);
                            Some(hv)
                        }
                        Err(e) => {
                            tracing::warn!("CORS: Invalid origin '{}': {}", trimmed, e);
                            None
                        }
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!(
                    "CORS: No valid origins in MATHPLAN_CORS_ORIGINS, defaulting to localhost only"
                );
                build_localhost_cors()
            } else {
                CorsLayer::new()
                    .allow_origin(allowed_origins)
                    .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
                    .allow_headers([header::CONTENT_TYPE])
            }
        }
        None => {
            tracing::info!("CORS: No MATHPLAN_CORS_ORIGINS set, defaulting to localhost only");
            build_localhost_cors()
        }
    }
}

/// Build a restrictive CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let localhost_origins = vec![
        "http://localhost:3000".parse::<HeaderValue>().ok(),
        "http://localhost:8080".parse::<HeaderValue>().ok(),
        "http://127.0.0.1:3000".parse::<HeaderValue>().ok(),
        "http://127.0.0.1:8080".parse::<HeaderValue>().ok(),
    ];
    let origins: Vec<HeaderValue> = localhost_origins.into_iter().flatten().collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. CORS - handles preflight requests
/// 2. Tracing - logs all requests
/// 3. Rate Limiting - protects against overload (if enabled)
pub fn create_router(state: AppState, rate_limit: u32) -> Router {
    let cors = build_cors_layer();

    let rate_limiter = if rate_limit > 0 {
        tracing::info!("Rate limiting enabled: {} requests/second", rate_limit);
        Some(create_rate_limiter(rate_limit))
    } else {
        tracing::info!("Rate limiting disabled");
        None
    };

    // Build base router with routes
    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/status", get(handlers::status_handler))
        .route("/majors", get(handlers::majors_handler))
        .route("/majors/{code}", get(handlers::major_handler))
        .route("/tiers", get(handlers::tiers_handler))
        .route("/prereqs", get(handlers::prereqs_handler))
        .route(
            "/students/{id}/placement",
            get(handlers::placement_handler),
        )
        .route("/students/{id}/plan", get(handlers::plan_handler))
        .route(
            "/students/{id}/responses",
            post(handlers::store_responses_handler),
        )
        .route(
            "/students/{id}/responses/{page}",
            delete(handlers::delete_responses_handler),
        )
        .route("/live/reset", post(handlers::live_reset_handler));

    // Apply rate limiting middleware
    if let Some(limiter) = rate_limiter {
        router = router.layer(axum_middleware::from_fn_with_state(
            limiter,
            middleware::rate_limit_middleware,
        ));
    }

    // Apply CORS, body limit, and tracing (outermost layers)
    router
        .layer(axum::extract::DefaultBodyLimit::max(256 * 1024))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server.
pub async fn run_server(
    addr: &str,
    service: Arc<MathPlanService>,
    rate_limit: u32,
) -> Result<(), MathPlanError> {
    let state = AppState::new(service);
    let router = create_router(state, rate_limit);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| MathPlanError::Io(format!("Bind failed: {}", e)))?;

    tracing::info!("Mathplan HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .await
        .map_err(|e| MathPlanError::Io(format!("Server error: {}", e)))
}
