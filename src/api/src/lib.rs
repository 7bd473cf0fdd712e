//! HTTP facade for the DAG engine
//!
//! Routes map 1:1 onto engine operations:
//!
//! - `POST /nodes`: insert a vertex (MCMC parent selection when `parents`
//!   is absent)
//! - `GET /nodes`: list all vertices
//! - `GET /nodes/{id}`: fetch one vertex plus its tip status
//! - `DELETE /nodes/{id}`: delete a childless vertex
//! - `POST /nodes/sync`: batch-merge a peer's vertex list

pub mod error;
pub mod handlers;
pub mod models;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/nodes",
            post(handlers::add_node).get(handlers::list_nodes),
        )
        .route("/nodes/sync", post(handlers::sync_nodes))
        .route(
            "/nodes/:id",
            get(handlers::get_node).delete(handlers::delete_node),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
