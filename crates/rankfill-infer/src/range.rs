//! Provable rank bounds for unranked items.
//!
//! # Algorithm
//!
//! For an unranked item, walk predecessors generation by generation. A
//! ranked item reached at hop distance `d` with rank `r` is an anchor and
//! implies `min >= r + d`: every unranked hop in between needs a rank of its
//! own. Anchors end their path; unranked items are expanded further. The
//! same node may show up in several generations because it can be reached
//! through chains of different lengths, and each length is a separate
//! constraint. The lower bound is the largest implied minimum.
//!
//! The upper bound is the mirror image over successors (`r - d`, smallest
//! wins). Without an anchor the bound falls back to the lowest (or highest)
//! free rank.
//!
//! | Side  | Direction | Anchor constraint | Combine | Default            |
//! |-------|-----------|-------------------|---------|--------------------|
//! | lower | Incoming  | `r + d`           | max     | lowest free rank   |
//! | upper | Outgoing  | `r - d`           | min     | highest free rank  |
//!
//! A lower bound above the upper bound means the evidence contradicts
//! itself; it is reported, never clamped.

use std::collections::BTreeSet;

use petgraph::Direction;
use serde::Serialize;
use tracing::{debug, info, instrument};

use rankfill_core::error::{InferError, Result};
use rankfill_core::model::{ItemKey, ItemSet, RankRange};

use crate::graph::cycles::labels;

/// Outcome of [`resolve_ranges`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RangeReport {
    /// Unranked items that received a range.
    pub resolved: usize,
    /// Ranges with a ranked anchor on both sides.
    pub bounded_both: usize,
    /// Ranges with no anchor on either side.
    pub unbounded: usize,
}

/// An anchor-derived bound: the implied rank and the anchor producing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorBound {
    pub rank: u32,
    pub anchor: ItemKey,
}

/// Compute and store a [`RankRange`] for every unranked item.
///
/// Nothing is written unless every range is consistent.
///
/// # Errors
///
/// - [`InferError::BoundContradiction`] when an item's `min > max`.
/// - [`InferError::Cycle`] if a traversal outruns the item count.
#[instrument(skip(items), fields(items = items.len()))]
pub fn resolve_ranges(items: &mut ItemSet) -> Result<RangeReport> {
    let bounds = items.rank_bounds();
    let default_min = items.lowest_free_rank().unwrap_or(bounds.low);
    let default_max = items.highest_free_rank().unwrap_or(bounds.high);

    let mut ranges: Vec<(ItemKey, RankRange)> = Vec::new();
    let mut report = RangeReport::default();

    let unranked: Vec<ItemKey> = items.unranked_keys().collect();
    for key in unranked {
        let lower = anchor_bound(items, key, Direction::Incoming)?;
        let upper = anchor_bound(items, key, Direction::Outgoing)?;

        let range = RankRange {
            min: lower.map_or(default_min, |b| b.rank),
            max: upper.map_or(default_max, |b| b.rank),
            lower_anchor: lower.map(|b| items.get(b.anchor).id().clone()),
            upper_anchor: upper.map(|b| items.get(b.anchor).id().clone()),
        };

        if range.min > range.max {
            return Err(InferError::BoundContradiction {
                item: items.label(key),
                min: range.min,
                max: range.max,
                lower_anchor: range.lower_anchor.as_ref().map(ToString::to_string),
                upper_anchor: range.upper_anchor.as_ref().map(ToString::to_string),
            });
        }

        debug!(item = %items.get(key).compact(), range = %range, "range resolved");
        if lower.is_some() && upper.is_some() {
            report.bounded_both += 1;
        } else if !range.is_bounded() {
            report.unbounded += 1;
        }
        ranges.push((key, range));
    }

    report.resolved = ranges.len();
    for (key, range) in ranges {
        items.set_range(key, range);
    }

    info!(
        resolved = report.resolved,
        bounded_both = report.bounded_both,
        unbounded = report.unbounded,
        "ranges resolved"
    );
    Ok(report)
}

/// The tightest anchor-implied bound for `key` in `direction`.
///
/// `Incoming` walks predecessors and yields a lower bound; `Outgoing` walks
/// successors and yields an upper bound. `None` if no anchor is reachable.
///
/// # Errors
///
/// Returns [`InferError::Cycle`] if the walk is deeper than the item count.
pub fn anchor_bound(
    items: &ItemSet,
    key: ItemKey,
    direction: Direction,
) -> Result<Option<AnchorBound>> {
    let max_depth = u32::try_from(items.len()).unwrap_or(u32::MAX);
    let mut best: Option<AnchorBound> = None;
    let mut frontier: BTreeSet<ItemKey> = neighbors(items, key, direction).clone();
    let mut distance: u32 = 1;

    while !frontier.is_empty() {
        if distance > max_depth {
            let mut members: Vec<ItemKey> = frontier.into_iter().collect();
            members.insert(0, key);
            return Err(InferError::Cycle {
                members: labels(items, &members),
            });
        }

        let mut next = BTreeSet::new();
        for &node in &frontier {
            match items.get(node).rank() {
                Some(rank) => {
                    let implied = match direction {
                        Direction::Incoming => rank.saturating_add(distance),
                        Direction::Outgoing => rank.saturating_sub(distance),
                    };
                    let tighter = best.is_none_or(|b| match direction {
                        Direction::Incoming => implied > b.rank,
                        Direction::Outgoing => implied < b.rank,
                    });
                    if tighter {
                        best = Some(AnchorBound {
                            rank: implied,
                            anchor: node,
                        });
                    }
                }
                None => next.extend(neighbors(items, node, direction).iter().copied()),
            }
        }
        frontier = next;
        distance = distance.saturating_add(1);
    }

    Ok(best)
}

fn neighbors(items: &ItemSet, key: ItemKey, direction: Direction) -> &BTreeSet<ItemKey> {
    match direction {
        Direction::Incoming => items.get(key).predecessors(),
        Direction::Outgoing => items.get(key).successors(),
    }
}
