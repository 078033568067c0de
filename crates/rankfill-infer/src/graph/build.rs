//! Ordering-edge construction from the two evidence signals.
//!
//! # Overview
//!
//! Both signals are plain functions over the canonically sorted item set
//! that return the edges they imply; [`build_edges`] composes them and
//! inserts the result, rejecting any edge that would close a cycle.
//!
//! ## Group-sequence evidence
//!
//! Within one year, sequenced items must read `1, 2, 3, ...`. Each item is
//! placed after the previous sequenced item; unsequenced items all follow
//! the last sequenced one (they are not chained among themselves).
//!
//! When the previous item is ranked and the current one is not, the edge is
//! drawn from the end of the previous item's run of consecutively occupied
//! ranks: if `#10` precedes an unranked item and ranks 11–13 are taken, the
//! unranked item must come after 13 as well.
//!
//! Pairs where both items are ranked produce no edge (the rank chain covers
//! them), but their ranks must agree with the group order.
//!
//! ## Rank-chain evidence
//!
//! Ranked items sorted by rank, each linked to the next.

use serde::Serialize;
use tracing::{debug, info, instrument};

use rankfill_core::error::{InferError, Result};
use rankfill_core::model::{Edge, Item, ItemKey, ItemSet};

use crate::graph::cycles::{labels, would_create_cycle};

/// Counts reported by [`build_edges`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    /// New edges contributed by group-sequence evidence.
    pub group_edges: usize,
    /// New edges contributed by the rank chain.
    pub rank_edges: usize,
    /// Group edges re-anchored to the end of an occupied rank run.
    pub promoted: usize,
}

impl BuildReport {
    #[must_use]
    pub const fn total(&self) -> usize {
        self.group_edges + self.rank_edges
    }
}

/// Edges implied by group-sequence evidence, plus how many were promoted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupEdges {
    pub edges: Vec<Edge>,
    pub promoted: usize,
}

/// Derive all edges and record them on the items.
///
/// # Errors
///
/// - [`InferError::Consistency`] if group sequences are broken.
/// - [`InferError::Cycle`] if an edge would close a cycle.
#[instrument(skip(items), fields(items = items.len()))]
pub fn build_edges(items: &mut ItemSet) -> Result<BuildReport> {
    let group = group_sequence_edges(items)?;
    let chain = rank_chain_edges(items);

    let mut report = BuildReport {
        promoted: group.promoted,
        ..BuildReport::default()
    };

    for edge in group.edges {
        if insert_edge(items, edge)? {
            report.group_edges += 1;
        }
    }
    for edge in chain {
        if insert_edge(items, edge)? {
            report.rank_edges += 1;
        }
    }

    info!(
        group_edges = report.group_edges,
        rank_edges = report.rank_edges,
        promoted = report.promoted,
        "ordering edges built"
    );
    Ok(report)
}

/// Insert one edge after checking it keeps the graph acyclic.
///
/// Returns `false` when the edge was already present.
///
/// # Errors
///
/// Returns [`InferError::Cycle`] with the closing path.
pub fn insert_edge(items: &mut ItemSet, edge: Edge) -> Result<bool> {
    if let Some(path) = would_create_cycle(items, edge.from, edge.to) {
        return Err(InferError::Cycle {
            members: labels(items, &path),
        });
    }
    Ok(items.add_edge(edge.from, edge.to))
}

/// Edges implied by per-year group sequence numbers.
///
/// # Errors
///
/// Returns [`InferError::Consistency`] naming the first offending item.
pub fn group_sequence_edges(items: &ItemSet) -> Result<GroupEdges> {
    let mut out = GroupEdges::default();
    let keys: Vec<ItemKey> = items.keys().collect();

    for group in keys.chunk_by(|a, b| items.get(*a).year() == items.get(*b).year()) {
        // Canonical order puts every unsequenced item after the sequenced run.
        let mut prev: Option<ItemKey> = None;

        for &key in group {
            check_sequence(items, prev, key)?;
            if let Some(last) = prev {
                if let Some(edge) = pair_edge(items, last, key, &mut out.promoted)? {
                    out.edges.push(edge);
                }
            }
            if items.get(key).group_seq().is_some() {
                prev = Some(key);
            }
        }
    }

    debug!(edges = out.edges.len(), "group-sequence evidence");
    Ok(out)
}

/// Validate `key`'s sequence number against the last sequenced item.
fn check_sequence(
    items: &ItemSet,
    prev: Option<ItemKey>,
    key: ItemKey,
) -> Result<()> {
    let item = items.get(key);
    let Some(seq) = item.group_seq() else {
        return Ok(());
    };
    let expected = prev
        .and_then(|p| items.get(p).group_seq())
        .map_or(1, |s| s + 1);
    if seq < expected {
        return Err(consistency(
            item,
            format!("duplicate or out-of-order group_seq {seq}, expected {expected}"),
        ));
    }
    if seq > expected {
        return Err(consistency(
            item,
            format!("gap before group_seq {seq}, expected {expected}"),
        ));
    }
    Ok(())
}

/// Edges linking each ranked item to the next higher rank.
#[must_use]
pub fn rank_chain_edges(items: &ItemSet) -> Vec<Edge> {
    let ranked: Vec<ItemKey> = items.ranked_keys().collect();
    let edges: Vec<Edge> = ranked
        .windows(2)
        .map(|pair| Edge::new(pair[0], pair[1]))
        .collect();
    debug!(edges = edges.len(), "rank-chain evidence");
    edges
}

/// The edge implied by `prev` preceding `curr` in group order, if any.
fn pair_edge(
    items: &ItemSet,
    prev: ItemKey,
    curr: ItemKey,
    promoted: &mut usize,
) -> Result<Option<Edge>> {
    let (before, after) = (items.get(prev), items.get(curr));
    match (before.rank(), after.rank()) {
        (Some(before_rank), Some(after_rank)) => {
            if before_rank >= after_rank {
                return Err(consistency(
                    after,
                    format!(
                        "ranked {} follows {} in group order",
                        after.compact(),
                        before.compact()
                    ),
                ));
            }
            Ok(None)
        }
        (Some(before_rank), None) => {
            let run_end = items.occupied_run_end(before_rank);
            let anchor = items.key_by_rank(run_end).unwrap_or(prev);
            if anchor != prev {
                *promoted += 1;
                debug!(
                    from = %before.compact(),
                    to = %items.get(anchor).compact(),
                    "promoted group anchor to end of occupied run"
                );
            }
            Ok(Some(Edge::new(anchor, curr)))
        }
        _ => Ok(Some(Edge::new(prev, curr))),
    }
}

fn consistency(item: &Item, reason: String) -> InferError {
    InferError::Consistency {
        item: item.id().to_string(),
        year: item.year(),
        reason,
    }
}
