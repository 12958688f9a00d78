//! Cage Grid
//!
//! Keeps a client-side view of a rack's cage occupancy grid in sync with a REST backend,
//! and applies assign/release writes under optimistic concurrency. Also ships the
//! reference backend that serves the contract, with SQLite persistence.

pub mod api;
pub mod client;
pub mod config;
pub mod coordinator;
pub mod db;
pub mod errors;
pub mod models;
pub mod presentation;
pub mod sync;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use db::Repository;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API routes
    let api_routes = Router::new()
        // Racks
        .route("/racks", get(api::list_racks).post(api::create_rack))
        .route(
            "/racks/{id}",
            get(api::get_rack)
                .put(api::update_rack)
                .delete(api::delete_rack),
        )
        // Professors
        .route(
            "/professors",
            get(api::list_professors).post(api::create_professor),
        )
        .route(
            "/professors/{id}",
            get(api::get_professor)
                .put(api::update_professor)
                .delete(api::delete_professor),
        )
        // Cages
        .route("/cages/rack/{rack_id}", get(api::get_cage_grid))
        .route("/cages/{id}/assign", post(api::assign_cage))
        .route("/cages/{id}/release", post(api::release_cage))
        // Dashboard
        .route("/dashboard/summary", get(api::dashboard_summary))
        .route("/dashboard/professors", get(api::dashboard_professors))
        .route("/dashboard/costs", get(api::dashboard_costs));

    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
