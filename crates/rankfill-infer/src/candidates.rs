//! Candidate rank assignments for unranked items.
//!
//! A pure read of the annotated item set. Every unranked item with a range
//! gets the free ranks inside it as candidates; every free rank gets the
//! items that could take it. The report is ordered so the most constrained
//! decisions come first: items with the fewest candidates, and ranks with
//! the fewest candidate items.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{info, instrument, warn};

use rankfill_core::model::{ItemId, ItemKey, ItemSet, RankRange};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Candidate ranks for one unranked item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemCandidates {
    pub key: ItemKey,
    pub id: ItemId,
    pub range: RankRange,
    /// Unoccupied ranks inside `range`, ascending.
    pub free: Vec<u32>,
}

impl ItemCandidates {
    #[must_use]
    pub fn is_forced(&self) -> bool {
        self.free.len() == 1
    }
}

/// Items that could take one free rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankCandidates {
    pub rank: u32,
    pub items: Vec<ItemId>,
}

/// An item with exactly one possible rank, or a rank with exactly one
/// possible item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForcedPair {
    pub id: ItemId,
    pub rank: u32,
}

/// Everything a person resolving the remaining ranks needs to start.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CandidateReport {
    /// Per item, fewest candidates first; ties keep set order.
    pub items: Vec<ItemCandidates>,
    /// Every free rank, ascending, with its candidate items.
    pub by_rank: Vec<RankCandidates>,
    /// Free ranks ordered by candidate count, fewest first.
    pub scarcest_ranks: Vec<u32>,
    /// Items whose range leaves a single free rank.
    pub forced_items: Vec<ForcedPair>,
    /// Free ranks only one item can take.
    pub forced_ranks: Vec<ForcedPair>,
    /// Items with no free rank at all.
    pub without_candidates: Vec<ItemId>,
    /// Items whose range comes from at least one ranked anchor.
    pub bounded: usize,
    /// Items whose range is the whole free span.
    pub unbounded: usize,
}

impl CandidateReport {
    /// Candidate entry for `id`, if the item is unranked and has a range.
    #[must_use]
    pub fn for_item(&self, id: &ItemId) -> Option<&ItemCandidates> {
        self.items.iter().find(|entry| &entry.id == id)
    }

    /// Candidate items for `rank`, if it is free.
    #[must_use]
    pub fn for_rank(&self, rank: u32) -> Option<&RankCandidates> {
        self.by_rank
            .binary_search_by_key(&rank, |entry| entry.rank)
            .ok()
            .map(|idx| &self.by_rank[idx])
    }
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

/// Build the candidate report from resolved ranges.
///
/// Unranked items without a range (resolver not run) are skipped.
#[must_use]
#[instrument(skip(items), fields(items = items.len()))]
pub fn enumerate_candidates(items: &ItemSet) -> CandidateReport {
    let mut report = CandidateReport::default();

    let mut by_rank: BTreeMap<u32, Vec<ItemId>> =
        items.free_ranks().map(|rank| (rank, Vec::new())).collect();

    for (key, item) in items.iter() {
        if item.is_ranked() {
            continue;
        }
        let Some(range) = item.range() else {
            continue;
        };

        let free: Vec<u32> = range.ranks().filter(|rank| !items.is_occupied(*rank)).collect();
        for rank in &free {
            if let Some(candidates) = by_rank.get_mut(rank) {
                candidates.push(item.id().clone());
            }
        }

        if range.is_bounded() {
            report.bounded += 1;
        } else {
            report.unbounded += 1;
        }
        if free.is_empty() {
            warn!(item = %item.compact(), range = %range, "no free rank inside range");
            report.without_candidates.push(item.id().clone());
        }

        report.items.push(ItemCandidates {
            key,
            id: item.id().clone(),
            range: range.clone(),
            free,
        });
    }

    report.items.sort_by_key(|entry| (entry.free.len(), entry.key));

    report.forced_items = report
        .items
        .iter()
        .filter_map(|entry| match entry.free.as_slice() {
            [rank] => Some(ForcedPair {
                id: entry.id.clone(),
                rank: *rank,
            }),
            _ => None,
        })
        .collect();

    report.by_rank = by_rank
        .into_iter()
        .map(|(rank, items)| RankCandidates { rank, items })
        .collect();

    report.forced_ranks = report
        .by_rank
        .iter()
        .filter_map(|entry| match entry.items.as_slice() {
            [only] => Some(ForcedPair {
                id: only.clone(),
                rank: entry.rank,
            }),
            _ => None,
        })
        .collect();

    let mut scarcest: Vec<(usize, u32)> = report
        .by_rank
        .iter()
        .map(|entry| (entry.items.len(), entry.rank))
        .collect();
    scarcest.sort_unstable();
    report.scarcest_ranks = scarcest.into_iter().map(|(_, rank)| rank).collect();

    info!(
        bounded = report.bounded,
        unbounded = report.unbounded,
        forced_items = report.forced_items.len(),
        forced_ranks = report.forced_ranks.len(),
        "candidates enumerated"
    );
    report
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rankfill_core::{ItemSpec, RankfillConfig};

    fn small_config() -> RankfillConfig {
        let mut config = RankfillConfig::default();
        config.ranks.high = 1006;
        config
    }

    fn range(min: u32, max: u32, anchored: bool) -> RankRange {
        RankRange {
            min,
            max,
            lower_anchor: anchored.then(|| ItemId::new("zz")),
            upper_anchor: None,
        }
    }

    /// Ranks 1001..=1006 with 1003 taken; u0, u1, u2 unranked.
    fn fixture(ranges: [RankRange; 3]) -> ItemSet {
        let mut items = ItemSet::new(
            vec![
                ItemSpec::new("r", 1990).with_rank(1003),
                ItemSpec::new("u0", 1991),
                ItemSpec::new("u1", 1992),
                ItemSpec::new("u2", 1993),
            ],
            &small_config(),
        )
        .expect("valid set");
        for (offset, r) in ranges.into_iter().enumerate() {
            items.set_range(ItemKey::new(offset + 1), r);
        }
        items
    }

    fn id(items: &ItemSet, index: usize) -> ItemId {
        items.get(ItemKey::new(index)).id().clone()
    }

    #[test]
    fn free_ranks_exclude_occupied_ones() {
        let items = fixture([
            range(1002, 1004, true),
            range(1001, 1006, false),
            range(1005, 1006, true),
        ]);
        let report = enumerate_candidates(&items);
        let entry = report.for_item(&id(&items, 1)).expect("u0 entry");
        assert_eq!(entry.free, vec![1002, 1004]);
        assert!(report.for_rank(1003).is_none(), "occupied rank is not a candidate slot");
        assert_eq!(report.by_rank.len(), 5);
    }

    #[test]
    fn items_are_ordered_by_candidate_count() {
        let items = fixture([
            range(1001, 1006, false),
            range(1005, 1006, true),
            range(1004, 1004, true),
        ]);
        let report = enumerate_candidates(&items);
        let order: Vec<ItemId> = report.items.iter().map(|e| e.id.clone()).collect();
        assert_eq!(order, vec![id(&items, 3), id(&items, 2), id(&items, 1)]);
        assert_eq!(report.bounded, 2);
        assert_eq!(report.unbounded, 1);
    }

    #[test]
    fn forced_items_and_ranks_are_surfaced() {
        let items = fixture([
            range(1004, 1004, true),
            range(1005, 1006, true),
            range(1005, 1006, true),
        ]);
        let report = enumerate_candidates(&items);
        assert_eq!(
            report.forced_items,
            vec![ForcedPair { id: id(&items, 1), rank: 1004 }]
        );
        assert_eq!(
            report.forced_ranks,
            vec![ForcedPair { id: id(&items, 1), rank: 1004 }]
        );
        // 1001 and 1002 have no candidates; they are the scarcest.
        assert_eq!(&report.scarcest_ranks[..2], &[1001, 1002]);
        assert_eq!(report.scarcest_ranks[2], 1004);
    }

    #[test]
    fn empty_range_is_reported() {
        let items = fixture([
            range(1003, 1003, true),
            range(1001, 1006, false),
            range(1001, 1006, false),
        ]);
        let report = enumerate_candidates(&items);
        assert_eq!(report.without_candidates, vec![id(&items, 1)]);
        assert!(report.items[0].free.is_empty());
    }

    #[test]
    fn items_without_ranges_are_skipped() {
        let items = ItemSet::new(vec![ItemSpec::new("u", 1990)], &small_config())
            .expect("valid set");
        let report = enumerate_candidates(&items);
        assert!(report.items.is_empty());
        assert_eq!(report.by_rank.len(), 6);
        assert!(report.by_rank.iter().all(|entry| entry.items.is_empty()));
    }
}
