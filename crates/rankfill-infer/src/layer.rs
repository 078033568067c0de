//! Topological layering of the ordering graph.
//!
//! # Algorithm
//!
//! Generation-based Kahn: layer 1 holds every item without predecessors;
//! layer `n + 1` holds every item whose predecessors all sit in layers
//! `1..=n`. Items sharing a layer are incomparable under the current
//! evidence, not equal.
//!
//! Unranked items with no edges at all carry no evidence. A post-pass moves
//! them to `1 + max(isolated_offset, deepest_layer)` so they sort after every
//! item that has evidence instead of landing in layer 1.
//!
//! If no item becomes eligible while some remain unassigned, the remainder
//! contains a cycle. The cycle members are recovered with Tarjan SCC over
//! the unresolved subgraph and reported as [`InferError::Cycle`].

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info, instrument};

use rankfill_core::error::{InferError, Result};
use rankfill_core::model::{ItemKey, ItemSet};

use crate::graph::cycles::{find_all_cycles, labels};
use crate::graph::order::OrderGraph;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Outcome of [`assign_layers`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Layering {
    /// Deepest generation reached by items with ordering evidence.
    pub layer_count: u32,
    /// Amount added to the layer of isolated unranked items.
    pub isolated_shift: u32,
    /// Number of isolated unranked items that were shifted.
    pub isolated: usize,
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

/// Write `approx_level` on every item.
///
/// # Errors
///
/// Returns [`InferError::Cycle`] if the graph is not acyclic.
#[instrument(skip(items), fields(items = items.len()))]
pub fn assign_layers(items: &mut ItemSet, isolated_offset: u32) -> Result<Layering> {
    let mut remaining: HashMap<ItemKey, usize> = items
        .iter()
        .map(|(key, item)| (key, item.predecessors().len()))
        .collect();

    let mut frontier: Vec<ItemKey> = items
        .keys()
        .filter(|key| remaining.get(key) == Some(&0))
        .collect();
    let mut level: u32 = 0;
    let mut assigned = 0usize;

    while !frontier.is_empty() {
        level += 1;
        let mut next = Vec::new();
        for &key in &frontier {
            items.set_approx_level(key, level);
            remaining.remove(&key);
            assigned += 1;
            for &succ in items.get(key).successors() {
                if let Some(count) = remaining.get_mut(&succ) {
                    *count = count.saturating_sub(1);
                    if *count == 0 {
                        next.push(succ);
                    }
                }
            }
        }
        debug!(level, size = frontier.len(), "layer assigned");
        next.sort_unstable();
        frontier = next;
    }

    if assigned < items.len() {
        return Err(cycle_error(items, &remaining));
    }

    let isolated: Vec<ItemKey> = items
        .iter()
        .filter(|(_, item)| !item.is_ranked() && item.is_isolated())
        .map(|(key, _)| key)
        .collect();

    let deepest = items
        .iter()
        .filter(|(key, _)| !isolated.contains(key))
        .filter_map(|(_, item)| item.approx_level())
        .max()
        .unwrap_or(0);

    let shift = isolated_offset.max(deepest);
    for &key in &isolated {
        let base = items.get(key).approx_level().unwrap_or(1);
        items.set_approx_level(key, base.saturating_add(shift));
    }

    let layering = Layering {
        layer_count: deepest,
        isolated_shift: shift,
        isolated: isolated.len(),
    };
    info!(
        layers = layering.layer_count,
        isolated = layering.isolated,
        shift = layering.isolated_shift,
        "layers assigned"
    );
    Ok(layering)
}

fn cycle_error(items: &ItemSet, unresolved: &HashMap<ItemKey, usize>) -> InferError {
    let subgraph = OrderGraph::from_subset(items, |key| unresolved.contains_key(&key));
    let mut members: Vec<ItemKey> = find_all_cycles(&subgraph).into_iter().flatten().collect();
    if members.is_empty() {
        members = unresolved.keys().copied().collect();
    }
    members.sort_unstable();
    members.dedup();
    InferError::Cycle {
        members: labels(items, &members),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
