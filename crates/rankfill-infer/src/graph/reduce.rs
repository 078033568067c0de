//! Redundant-edge pruning.
//!
//! If an item has two ranked predecessors `#a @1100` and `#b @1200`, the
//! edge from `#a` adds nothing: `#a` precedes `#b` through the rank chain.
//! Only the highest-ranked predecessor is kept. Unranked predecessors are
//! never touched.

use serde::Serialize;
use tracing::{debug, info, instrument};

use rankfill_core::model::{ItemKey, ItemSet};

/// Outcome of [`reduce_ranked_predecessors`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReduceReport {
    /// Items that lost at least one predecessor.
    pub adjusted_items: usize,
    /// Edges removed in total.
    pub removed_edges: usize,
}

/// Keep only the highest-ranked ranked predecessor of every item.
#[instrument(skip(items), fields(items = items.len()))]
pub fn reduce_ranked_predecessors(items: &mut ItemSet) -> ReduceReport {
    let mut report = ReduceReport::default();
    let keys: Vec<ItemKey> = items.keys().collect();

    for key in keys {
        let redundant = redundant_predecessors(items, key);
        if redundant.is_empty() {
            continue;
        }
        for pred in &redundant {
            items.remove_edge(*pred, key);
        }
        debug!(
            item = %items.get(key).compact(),
            removed = redundant.len(),
            "dropped lower-ranked predecessors"
        );
        report.adjusted_items += 1;
        report.removed_edges += redundant.len();
    }

    info!(
        adjusted = report.adjusted_items,
        removed = report.removed_edges,
        "ranked predecessors reduced"
    );
    report
}

/// Ranked predecessors of `key` other than the highest-ranked one.
fn redundant_predecessors(items: &ItemSet, key: ItemKey) -> Vec<ItemKey> {
    let mut ranked: Vec<(u32, ItemKey)> = items
        .get(key)
        .predecessors()
        .iter()
        .filter_map(|&pred| items.get(pred).rank().map(|rank| (rank, pred)))
        .collect();
    if ranked.len() < 2 {
        return Vec::new();
    }
    ranked.sort_unstable();
    ranked.pop();
    ranked.into_iter().map(|(_, pred)| pred).collect()
}
