//! API error handling
//!
//! Engine errors map onto HTTP statuses; error bodies are plain text so
//! clients and tests can match on the message directly.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tangle_dag::DagError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug)]
pub enum ApiError {
    /// Request body was not valid JSON
    InvalidPayload,
    /// Engine rejected or failed the operation
    Dag(DagError),
}

impl From<DagError> for ApiError {
    fn from(err: DagError) -> Self {
        ApiError::Dag(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::InvalidPayload => (
                StatusCode::BAD_REQUEST,
                "Invalid request payload".to_string(),
            ),
            ApiError::Dag(err) => (status_for(&err), err.to_string()),
        };
        (status, body).into_response()
    }
}

fn status_for(err: &DagError) -> StatusCode {
    match err {
        DagError::AlreadyExists(_) | DagError::HasChildren(_) => StatusCode::CONFLICT,
        DagError::NotFound(_) => StatusCode::NOT_FOUND,
        DagError::ParentMissing(_)
        | DagError::CycleDetected(_)
        | DagError::InvalidVertex(_) => StatusCode::BAD_REQUEST,
        DagError::TooManyParents { .. }
        | DagError::EmptyDag
        | DagError::NoTips
        | DagError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
