//! Route definitions for the Archivio HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`. The router
//! receives `AppState` and passes it to all handlers via Axum's `State`
//! extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, patch, post, put},
};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Headroom on top of the payload cap for multipart framing and metadata.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let max_body = state.config.storage.max_upload_size_bytes as usize + MULTIPART_OVERHEAD;

    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(file_routes())
        .merge(user_routes())
        .merge(department_routes())
        .merge(misc_routes());

    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(max_body))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Auth endpoints: login, logout, validate.
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/validate", get(handlers::auth::validate))
}

/// File listing, upload, download, review, and deletion.
fn file_routes() -> Router<AppState> {
    Router::new()
        .route("/files", get(handlers::file::list_files))
        .route("/files", post(handlers::file::upload_file))
        .route("/files/user/{user_id}", get(handlers::file::list_user_files))
        .route("/files/{id}", get(handlers::file::get_file))
        .route("/files/{id}", delete(handlers::file::delete_file))
        .route("/files/{id}/download", get(handlers::file::download_file))
        .route("/files/{id}/approve", patch(handlers::file::approve_file))
        .route("/files/{id}/reject", patch(handlers::file::reject_file))
}

/// User management (admin-gated in the service layer).
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(handlers::user::list_users))
        .route("/users", post(handlers::user::create_user))
        .route("/users/{id}", delete(handlers::user::delete_user))
}

/// Department management.
fn department_routes() -> Router<AppState> {
    Router::new()
        .route("/departments", get(handlers::department::list_departments))
        .route("/departments", post(handlers::department::create_department))
        .route(
            "/departments/{id}",
            put(handlers::department::update_department),
        )
        .route(
            "/departments/{id}",
            delete(handlers::department::delete_department),
        )
}

/// Stats, activity feed, health.
fn misc_routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(handlers::stats::get_stats))
        .route("/activities", get(handlers::activity::recent_activity))
        .route("/health", get(handlers::health::health))
}
