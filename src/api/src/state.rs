//! Shared application state

use std::sync::Arc;
use tangle_dag::Dag;

/// State shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// DAG engine backing every route
    pub dag: Arc<Dag>,
}

impl AppState {
    pub fn new(dag: Dag) -> Self {
        Self { dag: Arc::new(dag) }
    }
}
