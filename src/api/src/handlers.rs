//! Node route handlers
//!
//! Each handler translates one HTTP route onto one engine call and maps the
//! engine's result back through [`crate::error::ApiError`].

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tangle_dag::{DagError, NewVertex, Vertex};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::models::{GetNodeResponse, MessageResponse};
use crate::state::AppState;

/// `POST /nodes`
///
/// A body without a `parents` field gets MCMC-selected parents; an explicit
/// `[]` inserts a genesis vertex.
pub async fn add_node(
    State(state): State<AppState>,
    payload: Result<Json<NewVertex>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    let Json(new) = payload.map_err(|_| ApiError::InvalidPayload)?;
    state.dag.add_node(new)?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Node added successfully")),
    ))
}

/// `GET /nodes/{id}`
pub async fn get_node(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<GetNodeResponse>> {
    let vertex = state
        .dag
        .get_node(&id)?
        .ok_or_else(|| ApiError::Dag(DagError::NotFound(id.clone())))?;
    let is_tip = state.dag.is_tip(&id)?;
    Ok(Json(GetNodeResponse::from_vertex(vertex, is_tip)))
}

/// `GET /nodes`
pub async fn list_nodes(State(state): State<AppState>) -> ApiResult<Json<Vec<Vertex>>> {
    Ok(Json(state.dag.get_all_nodes()?))
}

/// `DELETE /nodes/{id}`
pub async fn delete_node(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state.dag.delete_node(&id)?;
    Ok(Json(MessageResponse::new("Node deleted successfully")))
}

/// `POST /nodes/sync`
///
/// Batch-merges a vertex list through the engine; invalid entries are
/// skipped, so the endpoint only fails on a malformed body.
pub async fn sync_nodes(
    State(state): State<AppState>,
    payload: Result<Json<Vec<NewVertex>>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Json(incoming) = payload.map_err(|_| ApiError::InvalidPayload)?;
    let merged = state.dag.merge_vertices(incoming);
    info!(count = merged.len(), "synced nodes");
    Ok(Json(MessageResponse::new("Nodes synced successfully")))
}
