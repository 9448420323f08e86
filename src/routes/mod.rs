//! Rutas de la API
//!
//! Todo cuelga de `/api`. El orden de capas, de fuera hacia dentro:
//! CORS, trazas, rate limit general, autenticación básica y, en los
//! recursos del inquilino, el JWT.

pub mod auth_routes;
pub mod driver_routes;
pub mod project_routes;
pub mod report_routes;
pub mod trip_routes;
pub mod vehicle_group_routes;
pub mod vehicle_routes;

use std::time::Duration;

use axum::{
    extract::OriginalUri,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::middleware::{
    auth_middleware, auth_rate_limit_middleware, basic_auth_middleware, cors_middleware, rate_limit_middleware,
    RateLimitState,
};
use crate::state::AppState;

/// Construir el router completo de la aplicación
pub fn create_router(state: AppState) -> Router {
    let window = Duration::from_secs(state.config.rate_limit_window);
    let limiter = RateLimitState::new(state.config.rate_limit_requests, window);
    let auth_limiter = RateLimitState::new(state.config.auth_rate_limit_requests, window);

    let auth = auth_routes::create_auth_router(state.clone())
        .layer(middleware::from_fn_with_state(auth_limiter, auth_rate_limit_middleware));

    let tenant = Router::new()
        .nest("/driver", driver_routes::create_driver_router())
        .nest("/vehicle", vehicle_routes::create_vehicle_router())
        .nest("/vehicle-group", vehicle_group_routes::create_vehicle_group_router())
        .nest("/project", project_routes::create_project_router())
        .nest("/trip", trip_routes::create_trip_router())
        .nest("/report", report_routes::create_report_router())
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let api = Router::new()
        .route("/health", get(health))
        .route("/welcome", get(welcome))
        .route("/test-auth", get(test_auth))
        .nest("/auth", auth)
        .merge(tenant)
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(state.clone(), basic_auth_middleware))
        .layer(middleware::from_fn_with_state(limiter, rate_limit_middleware));

    Router::new()
        .nest("/api", api)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors_middleware(&state.config.cors_origins))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({
        "success": true,
        "status": "OK",
        "service": "transport-backoffice",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn welcome() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "Welcome to the transport back office API",
    }))
}

/// Solo comprueba la autenticación básica
async fn test_auth() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "Basic authentication is working",
    }))
}

/// `OriginalUri` conserva el prefijo `/api` que `nest` recorta
async fn not_found(OriginalUri(uri): OriginalUri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Not Found",
            "message": format!("Route {} not found", uri.path()),
            "code": "ROUTE_NOT_FOUND",
        })),
    )
}
