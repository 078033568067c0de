//! End-to-end inference run.
//!
//! ```text
//! ItemSet ─ clear_derived ─ build ─ reduce ─ layer ─ range ─► RunSummary
//! ```
//!
//! Stages run strictly in order over the same `&mut ItemSet`; the first
//! error aborts the run. Derived state is cleared up front, so running twice
//! over the same set gives the same result.

use serde::Serialize;
use tracing::{info, instrument};

use rankfill_core::RankfillConfig;
use rankfill_core::error::Result;
use rankfill_core::model::{ItemSet, ItemSpec};

use crate::graph::{GraphStats, build_edges, edge_fingerprint, reduce_ranked_predecessors};
use crate::layer::assign_layers;
use crate::range::resolve_ranges;

/// What a run did to the item set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub ranked: usize,
    pub unranked: usize,
    /// Edges after the builder.
    pub edges_built: usize,
    /// Edges left after reduction.
    pub edges_reduced: usize,
    /// Group edges re-anchored to the end of an occupied run.
    pub promoted: usize,
    /// Items that lost predecessors during reduction.
    pub adjusted_items: usize,
    pub layer_count: u32,
    /// Unranked items without any ordering evidence.
    pub isolated: usize,
    /// Unranked items without a successor.
    pub no_upper_limit: usize,
    /// Unranked items without a predecessor.
    pub no_info: usize,
    /// Weakly connected components of the final graph.
    pub components: usize,
    /// Ranges anchored on both sides.
    pub bounded_both: usize,
    /// Ranges anchored on neither side.
    pub unbounded: usize,
    /// BLAKE3 hash of the final edge set.
    pub fingerprint: String,
}

/// Inference stages configured once, runnable over any item set.
#[derive(Debug, Clone, Copy)]
pub struct Pipeline {
    isolated_offset: u32,
}

impl Pipeline {
    #[must_use]
    pub const fn new(config: &RankfillConfig) -> Self {
        Self {
            isolated_offset: config.layering.isolated_offset,
        }
    }

    /// Run every stage over `items`, replacing earlier derived state.
    ///
    /// # Errors
    ///
    /// Propagates the first stage error: `Consistency` and `Cycle` from the
    /// builder, `Cycle` from layering, `BoundContradiction` from the range
    /// resolver.
    #[instrument(skip(self, items), fields(items = items.len()))]
    pub fn run(&self, items: &mut ItemSet) -> Result<RunSummary> {
        items.clear_derived();

        let build = build_edges(items)?;
        let edges_built = items.edge_count();

        let reduce = reduce_ranked_predecessors(items);
        let edges_reduced = items.edge_count();

        let layering = assign_layers(items, self.isolated_offset)?;
        let ranges = resolve_ranges(items)?;
        let stats = GraphStats::from_items(items);

        let summary = RunSummary {
            ranked: items.ranked_count(),
            unranked: items.len() - items.ranked_count(),
            edges_built,
            edges_reduced,
            promoted: build.promoted,
            adjusted_items: reduce.adjusted_items,
            layer_count: layering.layer_count,
            isolated: layering.isolated,
            no_upper_limit: stats.no_upper_limit_count,
            no_info: stats.no_info_count,
            components: stats.weakly_connected_component_count,
            bounded_both: ranges.bounded_both,
            unbounded: ranges.unbounded,
            fingerprint: edge_fingerprint(items),
        };

        info!(
            ranked = summary.ranked,
            unranked = summary.unranked,
            edges = summary.edges_reduced,
            layers = summary.layer_count,
            components = summary.components,
            "inference complete"
        );
        Ok(summary)
    }
}

/// Ingest `specs` and run the full pipeline.
///
/// # Errors
///
/// Any ingestion or stage error.
pub fn infer(specs: Vec<ItemSpec>, config: &RankfillConfig) -> Result<(ItemSet, RunSummary)> {
    let mut items = ItemSet::new(specs, config)?;
    let summary = Pipeline::new(config).run(&mut items)?;
    Ok((items, summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rankfill_core::InferError;

    fn specs() -> Vec<ItemSpec> {
        vec![
            ItemSpec::new("a", 1999).with_rank(1001),
            ItemSpec::new("s1", 2000).with_group_seq(1),
            ItemSpec::new("s2", 2000).with_group_seq(2),
            ItemSpec::new("b", 2001).with_rank(1004),
            ItemSpec::new("lonely", 2002),
        ]
    }

    fn config() -> RankfillConfig {
        let mut config = RankfillConfig::default();
        config.ranks.high = 1005;
        config
    }

    #[test]
    fn summary_counts_match_the_set() {
        let (items, summary) = infer(specs(), &config()).expect("consistent");
        assert_eq!(summary.ranked, 2);
        assert_eq!(summary.unranked, 3);
        assert_eq!(summary.edges_built, 2);
        assert_eq!(summary.edges_reduced, 2);
        assert_eq!(summary.isolated, 1);
        assert_eq!(summary.components, 3);
        assert!(summary.fingerprint.starts_with("blake3:"));
        assert!(items.items().iter().all(|item| item.approx_level().is_some()));
        assert!(
            items
                .items()
                .iter()
                .filter(|item| !item.is_ranked())
                .all(|item| item.range().is_some())
        );
    }

    #[test]
    fn rerun_is_idempotent() {
        let (mut items, first) = infer(specs(), &config()).expect("consistent");
        let snapshot = items.items().to_vec();
        let second = Pipeline::new(&config()).run(&mut items).expect("consistent");
        assert_eq!(first, second);
        assert_eq!(items.items(), snapshot.as_slice());
    }

    #[test]
    fn stage_errors_propagate() {
        let specs = vec![
            ItemSpec::new("s1", 2000).with_group_seq(1),
            ItemSpec::new("s3", 2000).with_group_seq(3),
        ];
        let err = infer(specs, &RankfillConfig::default()).expect_err("gap");
        assert!(matches!(err, InferError::Consistency { .. }));
    }
}
