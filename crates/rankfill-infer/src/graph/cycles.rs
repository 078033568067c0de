//! Incremental and full-graph cycle detection for the ordering graph.
//!
//! # Edge Direction
//!
//! Edges run `predecessor → successor`. Adding a new edge `from → to` would
//! create a cycle if `from` is already reachable from `to` through existing
//! successor links.

#![allow(clippy::module_name_repetitions)]

use std::collections::{HashMap, HashSet, VecDeque};

use petgraph::algo::tarjan_scc;
use rankfill_core::model::{ItemKey, ItemSet};

use crate::graph::order::OrderGraph;

/// Check whether adding `from → to` would introduce an ordering cycle.
///
/// Returns the closing path `from → to → ... → from` when it would. If the
/// edge already exists this returns `None` (no *new* cycle is created).
#[must_use]
pub fn would_create_cycle(items: &ItemSet, from: ItemKey, to: ItemKey) -> Option<Vec<ItemKey>> {
    if from == to {
        return Some(vec![from, from]);
    }

    if items.contains_edge(from, to) {
        return None;
    }

    // BFS from `to` looking for `from`.
    let mut queue: VecDeque<ItemKey> = VecDeque::from([to]);
    let mut visited: HashSet<ItemKey> = HashSet::from([to]);
    let mut parent: HashMap<ItemKey, ItemKey> = HashMap::new();

    while let Some(current) = queue.pop_front() {
        if current == from {
            return Some(reconstruct_cycle_path(from, to, &parent));
        }

        for &next in items.get(current).successors() {
            if visited.insert(next) {
                parent.insert(next, current);
                queue.push_back(next);
            }
        }
    }

    None
}

fn reconstruct_cycle_path(
    from: ItemKey,
    to: ItemKey,
    parent: &HashMap<ItemKey, ItemKey>,
) -> Vec<ItemKey> {
    // Parent links describe `to -> ... -> from`; prepend `from` for the new edge.
    let mut to_to_from: Vec<ItemKey> = vec![from];
    let mut cursor = from;

    while cursor != to {
        if let Some(next) = parent.get(&cursor) {
            cursor = *next;
            to_to_from.push(cursor);
        } else {
            break;
        }
    }

    to_to_from.reverse();

    let mut cycle = Vec::with_capacity(to_to_from.len() + 1);
    cycle.push(from);
    cycle.extend(to_to_from);
    cycle
}

/// Find every cycle in `graph`.
///
/// Each entry holds the members of one strongly connected component, sorted
/// by arena key. Self-loops are reported as one-element cycles.
#[must_use]
pub fn find_all_cycles(graph: &OrderGraph) -> Vec<Vec<ItemKey>> {
    let mut cycles: Vec<Vec<ItemKey>> = tarjan_scc(&graph.graph)
        .into_iter()
        .filter(|component| {
            component.len() > 1
                || component
                    .first()
                    .is_some_and(|node| graph.graph.find_edge(*node, *node).is_some())
        })
        .map(|component| {
            let mut keys: Vec<ItemKey> = component
                .into_iter()
                .filter_map(|idx| graph.item_key(idx))
                .collect();
            keys.sort_unstable();
            keys
        })
        .collect();

    cycles.sort_unstable();
    cycles
}

/// Labels (`#ab`) for a list of keys, for error messages.
#[must_use]
pub fn labels(items: &ItemSet, keys: &[ItemKey]) -> Vec<String> {
    keys.iter().map(|key| items.label(*key)).collect()
}
