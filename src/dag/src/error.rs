//! Error types for the DAG engine

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DagError>;

#[derive(Debug, Error)]
pub enum DagError {
    #[error("node with ID {0} already exists")]
    AlreadyExists(String),

    #[error("node with ID {0} not found")]
    NotFound(String),

    #[error("parent {0} does not exist")]
    ParentMissing(String),

    #[error("cycle detected: node {0} cannot be its own parent")]
    CycleDetected(String),

    #[error("node {id} has too many parents: {count}, max allowed: {max}")]
    TooManyParents {
        id: String,
        count: usize,
        max: usize,
    },

    #[error("cannot delete node {0} because it has children")]
    HasChildren(String),

    #[error("no nodes in DAG")]
    EmptyDag,

    #[error("no tips available")]
    NoTips,

    #[error("invalid vertex: {0}")]
    InvalidVertex(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<rocksdb::Error> for DagError {
    fn from(err: rocksdb::Error) -> Self {
        DagError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for DagError {
    fn from(err: serde_json::Error) -> Self {
        DagError::Storage(err.to_string())
    }
}
