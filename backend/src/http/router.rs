//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Sessions
        .route("/auth/login", post(handlers::login))
        .route("/auth/logout", post(handlers::logout))
        .route("/auth/me", get(handlers::me))
        // Production entries
        .route(
            "/entries",
            get(handlers::list_entries).post(handlers::create_entry),
        )
        .route(
            "/entries/{entry_id}",
            get(handlers::get_entry)
                .put(handlers::update_entry)
                .delete(handlers::delete_entry),
        )
        .route("/entries/{entry_id}/oee", get(handlers::get_entry_oee))
        .route("/entries/{entry_id}/approve", post(handlers::approve_entry))
        .route("/entries/{entry_id}/reject", post(handlers::reject_entry))
        // Dashboard
        .route("/analytics/dashboard", get(handlers::get_dashboard))
        .route("/analytics/summary", get(handlers::get_summary))
        .route("/analytics/lines", get(handlers::get_line_performance))
        .route("/analytics/shifts", get(handlers::get_shift_analytics))
        .route("/analytics/models", get(handlers::get_model_performance))
        .route("/analytics/daily-trend", get(handlers::get_daily_trend))
        .route("/oee/calculate", get(handlers::calculate))
        // User administration
        .route(
            "/users",
            get(handlers::list_users).post(handlers::create_user),
        )
        .route(
            "/users/{user_id}",
            put(handlers::update_user).delete(handlers::delete_user),
        );

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
