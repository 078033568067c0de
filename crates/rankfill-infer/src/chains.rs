//! Chains of unranked items pinned between two ranked anchors.
//!
//! Starting from each ranked item with predecessors, walk backwards: take
//! the single unranked predecessor if there is one, otherwise the single
//! ranked predecessor, until a ranked item is reached. A walk that passed
//! through at least one unranked item yields a chain
//! `@low -> u1 -> ... -> uk -> @high`.
//!
//! These are the easiest places to resolve by hand: `k` items must share the
//! `high - low - 1` ranks in between, in a known order.
//!
//! When several predecessors compete the walk is ambiguous and dropped.
//! Chains that differ only in their upper anchor keep the lowest one.

use std::cmp::Reverse;
use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info, instrument};

use rankfill_core::model::{ItemId, ItemKey, ItemSet};

/// `@low -> unranked... -> @high`, oldest anchor first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnchorChain {
    pub keys: Vec<ItemKey>,
    pub ids: Vec<ItemId>,
    pub low: u32,
    pub high: u32,
}

impl AnchorChain {
    /// Distance between the two anchors.
    #[must_use]
    pub const fn span(&self) -> u32 {
        self.high.saturating_sub(self.low)
    }

    /// Number of unranked items between the anchors.
    #[must_use]
    pub fn unranked_len(&self) -> usize {
        self.keys.len().saturating_sub(2)
    }

    /// `#ab @1101 -> #cd @---- -> #ef @1104`
    #[must_use]
    pub fn render(&self, items: &ItemSet) -> String {
        self.keys
            .iter()
            .map(|key| items.get(*key).compact())
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

/// Collect anchor chains, tightest span first, longer chains first on ties.
#[must_use]
#[instrument(skip(items), fields(items = items.len()))]
pub fn anchor_chains(items: &ItemSet) -> Vec<AnchorChain> {
    let mut best: HashMap<Vec<ItemKey>, usize> = HashMap::new();
    let mut chains: Vec<AnchorChain> = Vec::new();

    for (key, item) in items.iter() {
        if !item.is_ranked() || item.predecessors().is_empty() {
            continue;
        }
        let Some(chain) = walk_back(items, key) else {
            continue;
        };

        let prefix = chain.keys[..chain.keys.len() - 1].to_vec();
        match best.get(&prefix) {
            Some(&idx) if chains[idx].high <= chain.high => {}
            Some(&idx) => chains[idx] = chain,
            None => {
                best.insert(prefix, chains.len());
                chains.push(chain);
            }
        }
    }

    chains.sort_by_key(|chain| (chain.span(), Reverse(chain.keys.len())));
    info!(chains = chains.len(), "anchor chains collected");
    chains
}

fn walk_back(items: &ItemSet, start: ItemKey) -> Option<AnchorChain> {
    let mut keys = vec![start];
    let mut head = start;
    let mut nontrivial = false;

    loop {
        if keys.len() > items.len() {
            return None;
        }
        let preds = items.get(head).predecessors();
        let (unranked, ranked): (Vec<ItemKey>, Vec<ItemKey>) =
            preds.iter().partition(|pred| !items.get(**pred).is_ranked());
        nontrivial |= !unranked.is_empty();

        let next = match (unranked.as_slice(), ranked.as_slice()) {
            ([only], _) | ([], [only]) => *only,
            ([], []) => return None,
            _ => {
                debug!(at = %items.get(head).compact(), "ambiguous chain walk");
                return None;
            }
        };
        keys.push(next);
        head = next;
        if items.get(next).is_ranked() {
            break;
        }
    }

    if !nontrivial {
        return None;
    }
    keys.reverse();
    let low = items.get(keys[0]).rank()?;
    let high = items.get(start).rank()?;
    let ids = keys.iter().map(|key| items.get(*key).id().clone()).collect();
    Some(AnchorChain {
        keys,
        ids,
        low,
        high,
    })
}
