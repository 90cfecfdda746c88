use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

/// GET /health
async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "bewust-safety"
    }))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        // Content handlers report new topics, replies and messages here
        .route("/api/safety/content", post(handlers::submit_content))
        // Admin dashboard
        .route("/api/admin/alerts", get(handlers::list_alerts))
        .route("/api/admin/alerts/pending", get(handlers::list_pending))
        .route("/api/admin/alerts/stats", get(handlers::alert_stats))
        .route(
            "/api/admin/alerts/:id/resolve",
            post(handlers::resolve_alert),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
