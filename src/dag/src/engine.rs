//! DAG engine
//!
//! Mutation, query, and tip selection over the persistent store. A single
//! readers-writer lock serializes mutations and gives readers a snapshot
//! consistent with the last committed writer. Helpers that run while the
//! lock is already held take `&Store` and never re-acquire it.

use crate::error::{DagError, Result};
use crate::store::Store;
use crate::tips;
use crate::vertex::{NewVertex, Vertex, VertexId};
use parking_lot::RwLock;
use std::collections::{HashSet, VecDeque};
use tracing::{debug, info, warn};

/// Parent cap applied when the configured value is not positive
const DEFAULT_MAX_PARENTS: usize = 2;

/// Intrinsic weight applied when the configured value is not positive
const DEFAULT_WEIGHT: f64 = 1.0;

/// Number of tips requested when a vertex arrives without parents
const AUTO_SELECT_TIPS: usize = 2;

/// Persistent DAG with weighted tip selection
pub struct Dag {
    store: RwLock<Store>,
    max_parents: usize,
    default_weight: f64,
}

impl Dag {
    pub fn new(store: Store, max_parents: usize, default_weight: f64) -> Self {
        let max_parents = if max_parents == 0 {
            DEFAULT_MAX_PARENTS
        } else {
            max_parents
        };
        let default_weight = if default_weight <= 0.0 {
            DEFAULT_WEIGHT
        } else {
            default_weight
        };
        Dag {
            store: RwLock::new(store),
            max_parents,
            default_weight,
        }
    }

    /// Insert a new vertex.
    ///
    /// When the caller did not supply a `parents` field at all, up to two
    /// tips are chosen by the MCMC walk; on an empty store the vertex
    /// becomes a genesis vertex. An explicit empty list is kept as-is.
    pub fn add_node(&self, new: NewVertex) -> Result<Vertex> {
        let store = self.store.write();

        info!(id = %new.id, "adding node");
        validate_new(&new)?;

        if store.get(&new.id)?.is_some() {
            warn!(id = %new.id, "node already exists");
            return Err(DagError::AlreadyExists(new.id));
        }

        let NewVertex {
            id,
            data,
            parents,
            weight,
        } = new;

        let parents = match parents {
            Some(parents) => parents,
            None => match tips::select_tips(&store, AUTO_SELECT_TIPS, self.max_parents) {
                Ok(tips) => {
                    info!(id = %id, ?tips, "auto-selected parents");
                    tips
                }
                // First vertex ever inserted becomes a genesis vertex.
                Err(DagError::EmptyDag) => Vec::new(),
                Err(e) => {
                    warn!(id = %id, error = %e, "failed to select tips");
                    return Err(e);
                }
            },
        };

        let vertex = self.insert_locked(&store, id, data, parents, weight)?;
        info!(id = %vertex.id, weight = vertex.weight, "node added");
        Ok(vertex)
    }

    /// Remove a vertex, retracting its weight from every ancestor.
    ///
    /// Refused while any other vertex still lists `id` as a parent.
    pub fn delete_node(&self, id: &str) -> Result<()> {
        let store = self.store.write();

        info!(id, "deleting node");

        let vertex = store
            .get(id)?
            .ok_or_else(|| DagError::NotFound(id.to_string()))?;

        for item in store.iter() {
            let node = item?;
            if node.parents.iter().any(|p| p == id) {
                return Err(DagError::HasChildren(id.to_string()));
            }
        }

        self.propagate(&store, &vertex, -vertex.weight)?;
        store.delete(id)?;
        Ok(())
    }

    /// Fetch a vertex by id; `None` when absent
    pub fn get_node(&self, id: &str) -> Result<Option<Vertex>> {
        let store = self.store.read();
        debug!(id, "fetching node");
        store.get(id)
    }

    /// Return every stored vertex. Records that fail to decode are logged
    /// and skipped.
    pub fn get_all_nodes(&self) -> Result<Vec<Vertex>> {
        let store = self.store.read();
        let mut nodes = Vec::new();
        for item in store.iter() {
            match item {
                Ok(node) => nodes.push(node),
                Err(e) => warn!(error = %e, "skipping undecodable record"),
            }
        }
        Ok(nodes)
    }

    /// A vertex is a tip iff no other vertex lists it as a parent.
    ///
    /// An id absent from the store trivially has no children and reports
    /// `true`.
    pub fn is_tip(&self, id: &str) -> Result<bool> {
        let store = self.store.read();
        is_tip_locked(&store, id)
    }

    /// Select up to `max_tips` distinct tips via the weighted random walk.
    /// `max_tips == 0` defaults to the configured parent cap.
    pub fn select_tips(&self, max_tips: usize) -> Result<Vec<VertexId>> {
        let store = self.store.read();
        tips::select_tips(&store, max_tips, self.max_parents)
    }

    /// Merge a batch of vertices fetched from a peer.
    ///
    /// Vertices that already exist, reference themselves or a missing
    /// parent, or carry too many parents are skipped silently; a missing
    /// `parents` field is treated as empty (merge never auto-selects).
    /// Returns the ids that were merged.
    pub fn merge_vertices(&self, incoming: Vec<NewVertex>) -> Vec<VertexId> {
        let store = self.store.write();
        let mut merged = Vec::new();

        for new in incoming {
            let id = new.id.clone();
            match self.merge_one(&store, new) {
                Ok(()) => {
                    info!(id = %id, "node merged");
                    merged.push(id);
                }
                Err(e) => debug!(id = %id, reason = %e, "skipping vertex during merge"),
            }
        }

        if merged.is_empty() {
            warn!("no new nodes merged");
        } else {
            info!(count = merged.len(), "merge complete");
        }
        merged
    }

    fn merge_one(&self, store: &Store, new: NewVertex) -> Result<()> {
        validate_new(&new)?;
        if store.get(&new.id)?.is_some() {
            return Err(DagError::AlreadyExists(new.id));
        }

        let NewVertex {
            id,
            data,
            parents,
            weight,
        } = new;
        self.insert_locked(store, id, data, parents.unwrap_or_default(), weight)?;
        Ok(())
    }

    /// Validate, normalize, persist, and propagate one vertex. The caller
    /// has already resolved `parents` and checked for duplicates of `id`.
    fn insert_locked(
        &self,
        store: &Store,
        id: VertexId,
        data: String,
        parents: Vec<VertexId>,
        weight: f64,
    ) -> Result<Vertex> {
        if parents.len() > self.max_parents {
            return Err(DagError::TooManyParents {
                id,
                count: parents.len(),
                max: self.max_parents,
            });
        }
        self.check_parents(store, &id, &parents)?;

        let weight = if weight == 0.0 {
            self.default_weight
        } else {
            weight
        };
        let vertex = Vertex {
            id,
            data,
            parents,
            weight,
            cumulative_weight: weight,
        };
        store.put(&vertex)?;

        self.propagate(store, &vertex, weight)?;
        Ok(vertex)
    }

    /// Reject a self-referencing or dangling parent list. No transitive
    /// cycle is possible here: the vertex id is new, so nothing reachable
    /// from an existing parent can point back at it.
    fn check_parents(&self, store: &Store, id: &str, parents: &[VertexId]) -> Result<()> {
        for parent in parents {
            if parent == id {
                return Err(DagError::CycleDetected(id.to_string()));
            }
            if store.get(parent)?.is_none() {
                return Err(DagError::ParentMissing(parent.clone()));
            }
        }
        Ok(())
    }

    /// Apply `delta` to the cumulative weight of every strict ancestor of
    /// `vertex`, exactly once per ancestor regardless of how many paths
    /// reach it, flooring at the ancestor's own intrinsic weight.
    ///
    /// A store failure mid-loop surfaces to the caller; ancestors already
    /// written stay written.
    fn propagate(&self, store: &Store, vertex: &Vertex, delta: f64) -> Result<()> {
        if vertex.parents.is_empty() {
            return Ok(());
        }

        let mut ancestors: HashSet<VertexId> = HashSet::new();
        let mut queue: VecDeque<VertexId> = VecDeque::new();
        for parent in &vertex.parents {
            if ancestors.insert(parent.clone()) {
                queue.push_back(parent.clone());
            }
        }
        while let Some(current) = queue.pop_front() {
            let Some(node) = store.get(&current)? else {
                continue;
            };
            for grandparent in &node.parents {
                if ancestors.insert(grandparent.clone()) {
                    queue.push_back(grandparent.clone());
                }
            }
        }

        for id in &ancestors {
            let Some(mut ancestor) = store.get(id)? else {
                continue;
            };
            ancestor.cumulative_weight += delta;
            if ancestor.cumulative_weight < ancestor.weight {
                ancestor.cumulative_weight = ancestor.weight;
            }
            store.put(&ancestor)?;
        }
        Ok(())
    }
}

/// Model-level validation of an incoming vertex.
fn validate_new(new: &NewVertex) -> Result<()> {
    if new.id.is_empty() {
        return Err(DagError::InvalidVertex("id must not be empty".to_string()));
    }
    if !new.weight.is_finite() || new.weight < 0.0 {
        return Err(DagError::InvalidVertex(format!(
            "weight {} must be a non-negative finite number",
            new.weight
        )));
    }
    if let Some(parents) = &new.parents {
        let mut seen = HashSet::new();
        for parent in parents {
            if !seen.insert(parent.as_str()) {
                return Err(DagError::InvalidVertex(format!(
                    "duplicate parent {}",
                    parent
                )));
            }
        }
    }
    Ok(())
}

/// Tip predicate over an already-locked store.
fn is_tip_locked(store: &Store, id: &str) -> Result<bool> {
    for item in store.iter() {
        let node = item?;
        if node.parents.iter().any(|p| p == id) {
            return Ok(false);
        }
    }
    Ok(true)
}
