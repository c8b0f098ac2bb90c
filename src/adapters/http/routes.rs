//! Router assembly.

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;

use super::handlers::{
    export_result, health, ingest_document, list_templates, list_use_cases, process_submission,
    AppState,
};

/// API routes without middleware.
pub fn api_routes(state: AppState) -> Router {
    run_routes().merge(bounded_routes()).with_state(state)
}

/// Full application router with tracing, CORS, timeout and upload limit.
///
/// `/api/process` sits outside the request timeout: a run is bounded by the
/// orchestrator deadline, so the caller always receives the JSON outcome.
pub fn app_router(state: AppState, config: &ServerConfig) -> Router {
    run_routes()
        .merge(bounded_routes().layer(TimeoutLayer::new(config.request_timeout())))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(config))
                .layer(DefaultBodyLimit::max(config.max_upload_bytes)),
        )
}

fn run_routes() -> Router<AppState> {
    Router::new().route("/api/process", post(process_submission))
}

fn bounded_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/api/use-cases", get(list_use_cases))
        .route("/api/templates", get(list_templates))
        .route("/api/documents", post(ingest_document))
        .route("/api/export/:format", post(export_result))
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins_list()
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if origins.is_empty() {
        if config.is_production() {
            tracing::warn!("No CORS origins configured in production; cross-origin requests are refused");
            return CorsLayer::new();
        }
        return CorsLayer::permissive();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
