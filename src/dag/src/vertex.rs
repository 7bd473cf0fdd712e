//! DAG vertex model
//!
//! A vertex is a single record in the DAG: an opaque payload, references to
//! its parents, and the intrinsic/cumulative weight pair maintained by the
//! engine.

use serde::{Deserialize, Serialize};

/// Unique vertex identifier
pub type VertexId = String;

/// Vertex in the DAG
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    /// Unique vertex identifier
    pub id: VertexId,

    /// User payload (not interpreted)
    #[serde(default)]
    pub data: String,

    /// Parent vertex references
    #[serde(default)]
    pub parents: Vec<VertexId>,

    /// Intrinsic weight
    #[serde(default)]
    pub weight: f64,

    /// Own weight plus the weight of every descendant, counted once per
    /// descendant
    #[serde(default)]
    pub cumulative_weight: f64,
}

impl Vertex {
    /// Check if this vertex is a genesis vertex (no parents)
    pub fn is_genesis(&self) -> bool {
        self.parents.is_empty()
    }
}

/// Incoming vertex as submitted by a client or a peer.
///
/// `parents` is tri-state: a missing or `null` field asks the engine to pick
/// parents via the MCMC walk, an explicit `[]` keeps the vertex parent-less,
/// and a non-empty list is used verbatim. Unknown fields on the wire (such
/// as a peer's `cumulative_weight`) are ignored; the engine always rederives
/// cumulative weight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewVertex {
    pub id: VertexId,

    #[serde(default)]
    pub data: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parents: Option<Vec<VertexId>>,

    /// Intrinsic weight; 0 means "use the configured default"
    #[serde(default)]
    pub weight: f64,
}
