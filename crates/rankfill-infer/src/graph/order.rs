//! petgraph projection of the item set's ordering edges.
//!
//! The item arena is the source of truth for edges. [`OrderGraph`] copies
//! them into a [`DiGraph`] whenever a whole-graph algorithm from petgraph is
//! needed (strongly connected components for cycle diagnostics, weakly
//! connected components for statistics).
//!
//! ## Edge Direction
//!
//! An edge `A → B` means "A must end with a lower rank than B", i.e. A is
//! one of B's predecessors.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use rankfill_core::model::{ItemKey, ItemSet};

/// A directed ordering graph over (a subset of) the item set.
///
/// Node weights are arena keys; look items up through the originating
/// [`ItemSet`].
#[derive(Debug)]
pub struct OrderGraph {
    pub graph: DiGraph<ItemKey, ()>,
    pub node_map: HashMap<ItemKey, NodeIndex>,
}

impl OrderGraph {
    /// Project every item and edge.
    #[must_use]
    pub fn from_items(items: &ItemSet) -> Self {
        Self::from_subset(items, |_| true)
    }

    /// Project only the items accepted by `keep`, and the edges between them.
    pub fn from_subset(items: &ItemSet, keep: impl Fn(ItemKey) -> bool) -> Self {
        let mut graph = DiGraph::<ItemKey, ()>::new();
        let mut node_map = HashMap::new();

        for key in items.keys().filter(|key| keep(*key)) {
            let idx = graph.add_node(key);
            node_map.insert(key, idx);
        }

        for edge in items.edges() {
            if let (Some(&from), Some(&to)) = (node_map.get(&edge.from), node_map.get(&edge.to)) {
                graph.add_edge(from, to, ());
            }
        }

        Self { graph, node_map }
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    #[must_use]
    pub fn node_index(&self, key: ItemKey) -> Option<NodeIndex> {
        self.node_map.get(&key).copied()
    }

    #[must_use]
    pub fn item_key(&self, idx: NodeIndex) -> Option<ItemKey> {
        self.graph.node_weight(idx).copied()
    }
}

/// BLAKE3 fingerprint of the edge set, keyed by item identifiers.
///
/// Edges are hashed in sorted identifier order, so the value depends only on
/// which items precede which, not on arena layout.
#[must_use]
pub fn edge_fingerprint(items: &ItemSet) -> String {
    let mut pairs: Vec<(&str, &str)> = items
        .edges()
        .into_iter()
        .map(|edge| {
            (
                items.get(edge.from).id().as_str(),
                items.get(edge.to).id().as_str(),
            )
        })
        .collect();
    pairs.sort_unstable();

    let mut hasher = blake3::Hasher::new();
    for (from, to) in pairs {
        hasher.update(from.as_bytes());
        hasher.update(b"\x00");
        hasher.update(to.as_bytes());
        hasher.update(b"\x00");
    }
    format!("blake3:{}", hasher.finalize())
}
