use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Arena index of an item inside its [`ItemSet`](super::ItemSet).
///
/// Keys follow the set's canonical sort order (year, group sequence, rank),
/// so comparing two keys compares their positions in that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemKey(usize);

impl ItemKey {
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Short stable identifier handed out by the [`IdPool`](crate::ids::IdPool).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One input row, before identity is assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSpec {
    #[serde(default)]
    pub title: String,
    pub year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_seq: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
}

impl ItemSpec {
    #[must_use]
    pub fn new(title: impl Into<String>, year: i32) -> Self {
        Self {
            title: title.into(),
            year,
            group_seq: None,
            rank: None,
        }
    }

    #[must_use]
    pub const fn with_group_seq(mut self, seq: u32) -> Self {
        self.group_seq = Some(seq);
        self
    }

    #[must_use]
    pub const fn with_rank(mut self, rank: u32) -> Self {
        self.rank = Some(rank);
        self
    }
}

/// Inclusive provable bound on an unranked item's final rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankRange {
    pub min: u32,
    pub max: u32,
    /// Ranked item that produced `min`; `None` when `min` is the lowest free rank.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lower_anchor: Option<ItemId>,
    /// Ranked item that produced `max`; `None` when `max` is the highest free rank.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper_anchor: Option<ItemId>,
}

impl RankRange {
    #[must_use]
    pub const fn contains(&self, rank: u32) -> bool {
        rank >= self.min && rank <= self.max
    }

    /// Number of ranks covered, occupied or not.
    #[must_use]
    pub const fn width(&self) -> u32 {
        if self.max < self.min {
            0
        } else {
            self.max - self.min + 1
        }
    }

    /// `true` when at least one side comes from a ranked anchor.
    #[must_use]
    pub const fn is_bounded(&self) -> bool {
        self.lower_anchor.is_some() || self.upper_anchor.is_some()
    }

    pub fn ranks(&self) -> impl Iterator<Item = u32> {
        self.min..=self.max
    }
}

impl fmt::Display for RankRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.min, self.max)
    }
}

/// An item of the working set together with its ordering relations.
///
/// Identity fields are fixed at ingestion. `predecessors`/`successors` are
/// only changed through [`ItemSet`](super::ItemSet) so the relation stays
/// symmetric; `approx_level` and `range` are derived per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    id: ItemId,
    title: String,
    year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    group_seq: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rank: Option<u32>,
    #[serde(skip)]
    pub(crate) predecessors: BTreeSet<ItemKey>,
    #[serde(skip)]
    pub(crate) successors: BTreeSet<ItemKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) approx_level: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) range: Option<RankRange>,
}

impl Item {
    pub(crate) fn from_spec(id: ItemId, spec: ItemSpec) -> Self {
        Self {
            id,
            title: spec.title,
            year: spec.year,
            group_seq: spec.group_seq,
            rank: spec.rank,
            predecessors: BTreeSet::new(),
            successors: BTreeSet::new(),
            approx_level: None,
            range: None,
        }
    }

    #[must_use]
    pub const fn id(&self) -> &ItemId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    #[must_use]
    pub const fn group_seq(&self) -> Option<u32> {
        self.group_seq
    }

    #[must_use]
    pub const fn rank(&self) -> Option<u32> {
        self.rank
    }

    #[must_use]
    pub const fn is_ranked(&self) -> bool {
        self.rank.is_some()
    }

    /// Items that must end with a strictly lower rank than this one.
    #[must_use]
    pub const fn predecessors(&self) -> &BTreeSet<ItemKey> {
        &self.predecessors
    }

    /// Items that must end with a strictly higher rank than this one.
    #[must_use]
    pub const fn successors(&self) -> &BTreeSet<ItemKey> {
        &self.successors
    }

    #[must_use]
    pub const fn approx_level(&self) -> Option<u32> {
        self.approx_level
    }

    #[must_use]
    pub const fn range(&self) -> Option<&RankRange> {
        self.range.as_ref()
    }

    /// No incoming and no outgoing ordering edges.
    #[must_use]
    pub fn is_isolated(&self) -> bool {
        self.predecessors.is_empty() && self.successors.is_empty()
    }

    /// Compact label used in reports: `#ab @1234` or `#ab @----`.
    #[must_use]
    pub fn compact(&self) -> String {
        match self.rank {
            Some(rank) => format!("{} @{rank}", self.id),
            None => format!("{} @----", self.id),
        }
    }

    /// Canonical sort key: year, then sequenced before unsequenced, then
    /// ranked before unranked.
    pub(crate) fn sort_key(&self) -> (i32, u32, u32) {
        (
            self.year,
            self.group_seq.unwrap_or(u32::MAX),
            self.rank.unwrap_or(u32::MAX),
        )
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let seq = self
            .group_seq
            .map_or_else(|| "-".to_string(), |s| s.to_string());
        let rank = self
            .rank
            .map_or_else(|| "----".to_string(), |r| r.to_string());
        write!(
            f,
            "{}: [{seq:>2}, @{rank}] {} - {}",
            self.id, self.year, self.title
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_id_displays_with_hash() {
        assert_eq!(ItemId::new("k3").to_string(), "#k3");
    }

    #[test]
    fn compact_marks_unranked_items() {
        let ranked = Item::from_spec(ItemId::new("ab"), ItemSpec::new("A", 1990).with_rank(1234));
        let unranked = Item::from_spec(ItemId::new("cd"), ItemSpec::new("B", 1990));
        assert_eq!(ranked.compact(), "#ab @1234");
        assert_eq!(unranked.compact(), "#cd @----");
    }

    #[test]
    fn sort_key_puts_unsequenced_and_unranked_last() {
        let seq = Item::from_spec(ItemId::new("a2"), ItemSpec::new("A", 2000).with_group_seq(3));
        let ranked = Item::from_spec(ItemId::new("b2"), ItemSpec::new("B", 2000).with_rank(1500));
        let bare = Item::from_spec(ItemId::new("c2"), ItemSpec::new("C", 2000));
        assert!(seq.sort_key() < ranked.sort_key());
        assert!(ranked.sort_key() < bare.sort_key());
    }

    #[test]
    fn range_width_and_bounded() {
        let range = RankRange {
            min: 1002,
            max: 1004,
            lower_anchor: None,
            upper_anchor: Some(ItemId::new("zz")),
        };
        assert_eq!(range.width(), 3);
        assert!(range.is_bounded());
        assert!(range.contains(1003));
        assert!(!range.contains(1005));
        assert_eq!(range.ranks().collect::<Vec<_>>(), vec![1002, 1003, 1004]);
        assert_eq!(range.to_string(), "1002..=1004");
    }

    #[test]
    fn spec_deserializes_with_optional_fields() {
        let spec: ItemSpec =
            serde_json::from_str(r#"{"title": "Stalker", "year": 1979, "rank": 1042}"#)
                .expect("valid spec");
        assert_eq!(spec.rank, Some(1042));
        assert_eq!(spec.group_seq, None);
    }
}
