//! Route configuration and setup

use crate::auth::jwt::JwtService;
use crate::auth::middleware::AuthState;
use crate::handlers;
use crate::state::AppState;
use axum::{
    http::{HeaderValue, Method},
    routing::{delete, get, post},
    Json, Router,
};
use pixlift_core::Config;
use serde::Serialize;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use utoipa::ToSchema;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;
    let auth_state = AuthState {
        jwt: Arc::new(JwtService::new(&config.jwt_secret)),
    };

    // Public routes (no authentication required)
    let public_routes = public_routes();

    // Protected routes (require authentication)
    let protected_routes = library_routes()
        .merge(generation_routes())
        .layer(axum::middleware::from_fn_with_state(
            Arc::new(auth_state),
            crate::auth::middleware::auth_middleware,
        ));

    let app_state_routes = public_routes.merge(protected_routes);

    // Server-level concurrency limit to protect against resource exhaustion under extreme load
    let http_concurrency_limit = std::env::var("HTTP_CONCURRENCY_LIMIT")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(10_000)
        .max(1);
    tracing::info!(
        http_concurrency_limit = http_concurrency_limit,
        "HTTP concurrency limit layer enabled"
    );

    let app = app_state_routes
        .nest(
            "/docs",
            utoipa_rapidoc::RapiDoc::new("/api/openapi.json")
                .path("/docs")
                .into(),
        )
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(RequestBodyLimitLayer::new(config.max_body_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins.contains(&"*".to_string()) {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins: Result<Vec<HeaderValue>, _> =
            config.cors_origins.iter().map(|o| o.parse()).collect();

        CorsLayer::new()
            .allow_origin(origins.unwrap_or_default())
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}

/// Public routes (no authentication required)
fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/api/openapi.json",
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
}

/// Library routes
fn library_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/library", get(handlers::library::list_library))
        .route("/api/library/usage", get(handlers::library::get_usage))
        .route(
            "/api/library/batch",
            delete(handlers::library::batch_delete_library),
        )
        .route(
            "/api/library/{id}",
            get(handlers::library::get_library_item),
        )
        .route(
            "/api/library/{id}",
            delete(handlers::library::delete_library_item),
        )
}

/// Generation routes
fn generation_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/generate", post(handlers::generate::generate))
        .route("/api/angles", post(handlers::angles::angles))
        .route(
            "/api/product-enhance",
            post(handlers::product_enhance::product_enhance),
        )
        .route(
            "/api/fashion-motion",
            post(handlers::fashion_motion::fashion_motion),
        )
}

#[derive(Serialize, ToSchema)]
struct HealthCheckResponse {
    status: String,
    version: String,
}

async fn health_check() -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
