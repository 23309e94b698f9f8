//! # skyferry-api
//!
//! REST API layer for Skyferry. Provides the HTTP endpoints for accounts,
//! organizations, aircraft, ferry flights and their documents and records.

pub mod access;
pub mod auth;
pub mod middleware;
pub mod routes;

use axum::Router;
use skyferry_db::{storage::StorageClient, Database};
use std::sync::Arc;

/// Shared application state available to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    /// S3-compatible storage holding uploaded flight documents.
    pub storage: StorageClient,
}

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let config = skyferry_common::config::get();
    // Multipart framing on top of the largest allowed document
    let body_limit = config.limits.max_document_bytes as usize + 64 * 1024;

    let api_routes = Router::new()
        .merge(routes::health::router())
        .merge(routes::phases::router())
        .merge(routes::auth::router())
        .merge(routes::profile::router())
        .merge(routes::organizations::router())
        .merge(routes::aircraft::router())
        .merge(routes::flights::router())
        .merge(routes::documents::router())
        .merge(routes::inspections::router())
        .merge(routes::insurance::router())
        .merge(routes::examples::router());

    Router::new()
        .nest("/api", api_routes)
        .layer(axum::extract::DefaultBodyLimit::disable())
        .layer(tower_http::limit::RequestBodyLimitLayer::new(body_limit))
        .layer(axum::middleware::from_fn(middleware::security_headers))
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(tower_http::compression::CompressionLayer::new())
        .with_state(Arc::new(state))
}
