//! MCMC tip selection
//!
//! Random walks start at a uniformly chosen vertex and descend toward
//! children with probability proportional to cumulative weight, so new
//! vertices preferentially attach to heavy, well-referenced branches.

use crate::error::{DagError, Result};
use crate::store::Store;
use crate::vertex::{Vertex, VertexId};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;
use tracing::warn;

/// Floor applied to a child's cumulative weight so zero-weight branches can
/// still be reached by the walk.
const MIN_WALK_WEIGHT: f64 = 1e-4;

/// Walk attempts budgeted per requested tip.
const ATTEMPTS_PER_TIP: usize = 10;

/// Lower bound on the per-walk step budget.
const MIN_WALK_STEPS: usize = 10;

/// Select up to `max_tips` distinct tips; `max_tips == 0` defaults to
/// `max_parents`. Fails with [`DagError::EmptyDag`] on an empty store and
/// [`DagError::NoTips`] when the attempt budget runs out empty-handed.
pub(crate) fn select_tips(
    store: &Store,
    max_tips: usize,
    max_parents: usize,
) -> Result<Vec<VertexId>> {
    let max_tips = if max_tips == 0 { max_parents } else { max_tips };

    let ids = vertex_ids(store)?;
    if ids.is_empty() {
        return Err(DagError::EmptyDag);
    }

    let max_walk_steps = MIN_WALK_STEPS.max(ids.len() / 2);
    let max_attempts = ATTEMPTS_PER_TIP * max_tips;
    let mut attempts = max_attempts;

    let mut rng = rand::thread_rng();
    let mut tips: HashSet<VertexId> = HashSet::new();

    while tips.len() < max_tips && attempts > 0 {
        if let Some(tip) = walk(store, &ids, max_walk_steps, &mut rng)? {
            tips.insert(tip);
        }
        attempts -= 1;
    }

    if tips.is_empty() {
        warn!(attempts = max_attempts, "no tips found");
        return Err(DagError::NoTips);
    }
    Ok(tips.into_iter().collect())
}

/// One random walk from a uniformly chosen start vertex. Returns the tip it
/// terminated on, or `None` if the step budget ran out mid-graph.
fn walk(
    store: &Store,
    ids: &[VertexId],
    max_steps: usize,
    rng: &mut impl Rng,
) -> Result<Option<VertexId>> {
    let Some(start) = ids.choose(rng) else {
        return Ok(None);
    };
    let Some(mut current) = store.get(start)? else {
        return Ok(None);
    };

    for _ in 0..max_steps {
        let children = children_of(store, &current.id)?;
        if children.is_empty() {
            return Ok(Some(current.id));
        }
        current = weighted_choice(children, rng);
    }
    Ok(None)
}

/// Ids of all decodable vertices.
fn vertex_ids(store: &Store) -> Result<Vec<VertexId>> {
    Ok(store.iter().flatten().map(|vertex| vertex.id).collect())
}

/// Vertices listing `id` as a parent.
fn children_of(store: &Store, id: &str) -> Result<Vec<Vertex>> {
    let mut children = Vec::new();
    for item in store.iter() {
        let node = item?;
        if node.parents.iter().any(|p| p == id) {
            children.push(node);
        }
    }
    Ok(children)
}

/// Inverse-CDF selection over `children`, weighted by floored cumulative
/// weight. `children` must be non-empty.
fn weighted_choice(mut children: Vec<Vertex>, rng: &mut impl Rng) -> Vertex {
    let total: f64 = children
        .iter()
        .map(|c| c.cumulative_weight.max(MIN_WALK_WEIGHT))
        .sum();
    let r = rng.gen_range(0.0..total);

    let mut acc = 0.0;
    for (i, child) in children.iter().enumerate() {
        acc += child.cumulative_weight.max(MIN_WALK_WEIGHT);
        if r <= acc {
            return children.swap_remove(i);
        }
    }

    // Floating-point rounding can leave `r` past the final bucket.
    let last = children.len() - 1;
    children.swap_remove(last)
}
