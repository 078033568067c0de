//! Graph statistics reported in the run summary.
//!
//! - **weakly_connected_component_count**: independent groups of evidence.
//!   Items in different components are never ordered against each other.
//! - **no_info_count**: unranked items without a predecessor (nothing
//!   bounds them from below).
//! - **no_upper_limit_count**: unranked items without a successor.

use petgraph::algo::connected_components;
use serde::Serialize;

use rankfill_core::model::ItemSet;

use crate::graph::order::OrderGraph;

// ---------------------------------------------------------------------------
// GraphStats
// ---------------------------------------------------------------------------

/// Summary statistics for an ordering graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub weakly_connected_component_count: usize,
    pub no_info_count: usize,
    pub no_upper_limit_count: usize,
}

impl GraphStats {
    /// Compute statistics over the current edges of `items`.
    #[must_use]
    pub fn from_items(items: &ItemSet) -> Self {
        let order = OrderGraph::from_items(items);
        let unranked = || items.iter().filter(|(_, item)| !item.is_ranked());

        Self {
            weakly_connected_component_count: connected_components(&order.graph),
            no_info_count: unranked()
                .filter(|(_, item)| item.predecessors().is_empty())
                .count(),
            no_upper_limit_count: unranked()
                .filter(|(_, item)| item.successors().is_empty())
                .count(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rankfill_core::model::ItemKey;
    use rankfill_core::{ItemSpec, RankfillConfig};

    fn set(specs: Vec<ItemSpec>, edges: &[(usize, usize)]) -> ItemSet {
        let mut items = ItemSet::new(specs, &RankfillConfig::default()).expect("valid set");
        for &(from, to) in edges {
            items.add_edge(ItemKey::new(from), ItemKey::new(to));
        }
        items
    }

    fn bare(n: i32) -> Vec<ItemSpec> {
        (0..n).map(|i| ItemSpec::new(format!("m{i}"), 2000 + i)).collect()
    }

    #[test]
    fn empty_graph_stats() {
        let stats = GraphStats::from_items(&set(Vec::new(), &[]));
        assert_eq!(stats.weakly_connected_component_count, 0);
        assert_eq!(stats.no_info_count, 0);
        assert_eq!(stats.no_upper_limit_count, 0);
    }

    #[test]
    fn linear_chain_stats() {
        // m0 → m1 → m2
        let stats = GraphStats::from_items(&set(bare(3), &[(0, 1), (1, 2)]));
        assert_eq!(stats.weakly_connected_component_count, 1);
        assert_eq!(stats.no_info_count, 1);
        assert_eq!(stats.no_upper_limit_count, 1);
    }

    #[test]
    fn disjoint_components_and_isolated_nodes() {
        // m0 → m1, m2 → m3, m4 alone
        let stats = GraphStats::from_items(&set(bare(5), &[(0, 1), (2, 3)]));
        assert_eq!(stats.weakly_connected_component_count, 3);
        assert_eq!(stats.no_info_count, 3);
        assert_eq!(stats.no_upper_limit_count, 3);
    }

    #[test]
    fn ranked_items_are_not_counted_as_unbounded() {
        let specs = vec![
            ItemSpec::new("a", 1990).with_rank(1100),
            ItemSpec::new("u", 1991),
        ];
        let stats = GraphStats::from_items(&set(specs, &[(0, 1)]));
        assert_eq!(stats.no_info_count, 0);
        assert_eq!(stats.no_upper_limit_count, 1);
    }
}
