use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tracing::{debug, instrument};

use super::item::{Item, ItemId, ItemKey, ItemSpec, RankRange};
use crate::config::{RankConfig, RankfillConfig};
use crate::error::{InferError, Result};
use crate::ids::IdPool;

/// A directed "must precede" relation between two items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Edge {
    pub from: ItemKey,
    pub to: ItemKey,
}

impl Edge {
    #[must_use]
    pub const fn new(from: ItemKey, to: ItemKey) -> Self {
        Self { from, to }
    }
}

/// The working set: an arena of items in canonical order plus the rank index.
///
/// Built once per input by [`ItemSet::new`], which assigns identifiers and
/// rejects malformed rows. Ordering edges live on the items as index-based
/// adjacency and are only touched through [`ItemSet::add_edge`] /
/// [`ItemSet::remove_edge`], which keep both directions in sync.
#[derive(Debug, Clone)]
pub struct ItemSet {
    items: Vec<Item>,
    by_id: HashMap<ItemId, ItemKey>,
    by_rank: BTreeMap<u32, ItemKey>,
    ranks: RankConfig,
}

impl ItemSet {
    /// Materialize and validate items, assigning identifiers from a pool
    /// seeded with `config.ids.seed`.
    ///
    /// Identifiers are handed out in input order; the items are then sorted
    /// by year, group sequence (unsequenced last) and rank (unranked last).
    ///
    /// # Errors
    ///
    /// - [`InferError::CapacityExceeded`] when there are more items than ranks.
    /// - [`InferError::IdPoolExhausted`] when the pool runs dry.
    /// - [`InferError::InvalidField`] for a rank or group sequence out of bounds.
    /// - [`InferError::DuplicateRank`] when two items claim the same rank.
    #[instrument(skip(specs, config), fields(items = specs.len()))]
    pub fn new(specs: Vec<ItemSpec>, config: &RankfillConfig) -> Result<Self> {
        let ranks = config.ranks;
        let capacity = ranks.capacity();
        if specs.len() > capacity {
            return Err(InferError::CapacityExceeded {
                items: specs.len(),
                capacity,
                low: ranks.low,
                high: ranks.high,
            });
        }

        let mut pool = IdPool::seeded(config.ids.seed);
        let mut items = Vec::with_capacity(specs.len());
        for spec in specs {
            let id = pool.allocate()?;
            let item = Item::from_spec(id, spec);
            validate_fields(&item, config)?;
            items.push(item);
        }

        items.sort_by_key(Item::sort_key);

        let mut by_id = HashMap::with_capacity(items.len());
        let mut by_rank = BTreeMap::new();
        for (index, item) in items.iter().enumerate() {
            let key = ItemKey::new(index);
            by_id.insert(item.id().clone(), key);
            if let Some(rank) = item.rank() {
                if let Some(existing) = by_rank.insert(rank, key) {
                    let first: &Item = &items[existing.index()];
                    return Err(InferError::DuplicateRank {
                        rank,
                        first: first.id().to_string(),
                        second: item.id().to_string(),
                    });
                }
            }
        }

        debug!(ranked = by_rank.len(), "item set materialized");

        Ok(Self {
            items,
            by_id,
            by_rank,
            ranks,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The configured global rank range.
    #[must_use]
    pub const fn rank_bounds(&self) -> RankConfig {
        self.ranks
    }

    /// Items in canonical order.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Look up an item by key.
    ///
    /// # Panics
    ///
    /// Panics if `key` was not produced by this set.
    #[must_use]
    pub fn get(&self, key: ItemKey) -> &Item {
        &self.items[key.index()]
    }

    pub fn keys(&self) -> impl Iterator<Item = ItemKey> + use<> {
        (0..self.items.len()).map(ItemKey::new)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ItemKey, &Item)> {
        self.items
            .iter()
            .enumerate()
            .map(|(index, item)| (ItemKey::new(index), item))
    }

    #[must_use]
    pub fn key_of(&self, id: &ItemId) -> Option<ItemKey> {
        self.by_id.get(id).copied()
    }

    /// The item holding `rank`, if any.
    #[must_use]
    pub fn key_by_rank(&self, rank: u32) -> Option<ItemKey> {
        self.by_rank.get(&rank).copied()
    }

    /// Ranked items in ascending rank order.
    pub fn ranked_keys(&self) -> impl Iterator<Item = ItemKey> + '_ {
        self.by_rank.values().copied()
    }

    pub fn unranked_keys(&self) -> impl Iterator<Item = ItemKey> + '_ {
        self.iter()
            .filter(|(_, item)| !item.is_ranked())
            .map(|(key, _)| key)
    }

    #[must_use]
    pub fn ranked_count(&self) -> usize {
        self.by_rank.len()
    }

    #[must_use]
    pub fn is_occupied(&self, rank: u32) -> bool {
        self.by_rank.contains_key(&rank)
    }

    /// Ranks in the global range that no item holds yet, ascending.
    pub fn free_ranks(&self) -> impl Iterator<Item = u32> + '_ {
        (self.ranks.low..=self.ranks.high).filter(|rank| !self.is_occupied(*rank))
    }

    #[must_use]
    pub fn lowest_free_rank(&self) -> Option<u32> {
        self.free_ranks().next()
    }

    #[must_use]
    pub fn highest_free_rank(&self) -> Option<u32> {
        (self.ranks.low..=self.ranks.high)
            .rev()
            .find(|rank| !self.is_occupied(*rank))
    }

    /// Last rank of the run of consecutively occupied ranks containing `rank`.
    ///
    /// `1010` with `1010..=1013` occupied and `1014` free yields `1013`.
    #[must_use]
    pub fn occupied_run_end(&self, rank: u32) -> u32 {
        let mut end = rank;
        while let Some(next) = end.checked_add(1) {
            if !self.is_occupied(next) {
                break;
            }
            end = next;
        }
        end
    }

    /// Display label for error messages: `#ab`.
    #[must_use]
    pub fn label(&self, key: ItemKey) -> String {
        self.get(key).id().to_string()
    }

    /// Record `from` as a predecessor of `to`. Returns `false` if the edge
    /// already existed.
    pub fn add_edge(&mut self, from: ItemKey, to: ItemKey) -> bool {
        let inserted = self.items[to.index()].predecessors.insert(from);
        self.items[from.index()].successors.insert(to);
        inserted
    }

    /// Drop the edge `from → to` from both ends. Returns `false` if absent.
    pub fn remove_edge(&mut self, from: ItemKey, to: ItemKey) -> bool {
        let removed = self.items[to.index()].predecessors.remove(&from);
        self.items[from.index()].successors.remove(&to);
        removed
    }

    #[must_use]
    pub fn contains_edge(&self, from: ItemKey, to: ItemKey) -> bool {
        self.get(to).predecessors.contains(&from)
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.items.iter().map(|item| item.predecessors.len()).sum()
    }

    /// All edges, ordered by source then target.
    #[must_use]
    pub fn edges(&self) -> Vec<Edge> {
        let mut edges: Vec<Edge> = self
            .iter()
            .flat_map(|(key, item)| item.successors.iter().map(move |&to| Edge::new(key, to)))
            .collect();
        edges.sort_unstable();
        edges
    }

    pub fn set_approx_level(&mut self, key: ItemKey, level: u32) {
        self.items[key.index()].approx_level = Some(level);
    }

    pub fn set_range(&mut self, key: ItemKey, range: RankRange) {
        self.items[key.index()].range = Some(range);
    }

    /// Forget every edge and derived annotation so a run starts from the
    /// freshly ingested state.
    pub fn clear_derived(&mut self) {
        for item in &mut self.items {
            item.predecessors.clear();
            item.successors.clear();
            item.approx_level = None;
            item.range = None;
        }
    }
}

fn validate_fields(item: &Item, config: &RankfillConfig) -> Result<()> {
    if let Some(rank) = item.rank() {
        if !config.ranks.contains(rank) {
            return Err(InferError::InvalidField {
                item: describe(item),
                field: "rank",
                value: i64::from(rank),
                min: i64::from(config.ranks.low),
                max: i64::from(config.ranks.high),
            });
        }
    }
    if let Some(seq) = item.group_seq() {
        if seq == 0 || seq > config.groups.max_seq {
            return Err(InferError::InvalidField {
                item: describe(item),
                field: "group_seq",
                value: i64::from(seq),
                min: 1,
                max: i64::from(config.groups.max_seq),
            });
        }
    }
    Ok(())
}

fn describe(item: &Item) -> String {
    format!("{} \"{}\" ({})", item.id(), item.title(), item.year())
}
