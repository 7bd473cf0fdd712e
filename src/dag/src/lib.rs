//! # Tangle DAG engine
//!
//! Persistent directed acyclic graph with weighted tip selection. Each
//! vertex carries an opaque payload, an intrinsic weight, and a cumulative
//! weight covering its descendants; new vertices attach to tips chosen
//! explicitly or by a cumulative-weight-biased MCMC random walk.
//!
//! ## Module Structure
//!
//! ```text
//! dag/
//! ├── vertex/    - Vertex record and incoming-vertex model
//! ├── store/     - RocksDB persistence
//! ├── engine/    - Mutation, query, and merge logic
//! └── tips/      - MCMC tip-selection walk
//! ```

pub mod engine;
pub mod error;
pub mod store;
mod tips;
pub mod vertex;

pub use engine::Dag;
pub use error::{DagError, Result};
pub use store::Store;
pub use vertex::{NewVertex, Vertex, VertexId};
