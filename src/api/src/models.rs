//! API request and response models

use serde::{Deserialize, Serialize};
use tangle_dag::Vertex;

/// Response body for `GET /nodes/{id}`
#[derive(Debug, Serialize, Deserialize)]
pub struct GetNodeResponse {
    pub id: String,
    pub data: String,
    pub parents: Vec<String>,
    pub weight: f64,
    pub cumulative_weight: f64,
    pub is_tip: bool,
}

impl GetNodeResponse {
    pub fn from_vertex(vertex: Vertex, is_tip: bool) -> Self {
        Self {
            id: vertex.id,
            data: vertex.data,
            parents: vertex.parents,
            weight: vertex.weight,
            cumulative_weight: vertex.cumulative_weight,
            is_tip,
        }
    }
}

/// Generic success message body
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
