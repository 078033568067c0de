//! Ingestion properties: ordering, identity and the rank index.

use std::collections::HashSet;

use proptest::prelude::*;

use rankfill_core::{InferError, ItemSet, ItemSpec, RankfillConfig};

fn arb_specs() -> impl Strategy<Value = Vec<ItemSpec>> {
    (0usize..40).prop_flat_map(|n| {
        (
            proptest::sample::subsequence((1001u32..=1100).collect::<Vec<_>>(), n)
                .prop_shuffle(),
            proptest::collection::vec(
                (1980i32..1990, proptest::option::of(1u32..10), any::<bool>()),
                n,
            ),
        )
            .prop_map(|(ranks, rows)| {
                ranks
                    .into_iter()
                    .zip(rows)
                    .enumerate()
                    .map(|(i, (rank, (year, seq, show)))| {
                        let mut spec = ItemSpec::new(format!("t{i}"), year);
                        spec.group_seq = seq;
                        if show {
                            spec = spec.with_rank(rank);
                        }
                        spec
                    })
                    .collect()
            })
    })
}

proptest! {
    #[test]
    fn items_come_out_in_canonical_order(specs in arb_specs()) {
        let set = ItemSet::new(specs, &RankfillConfig::default()).expect("valid input");
        let keys: Vec<_> = set
            .items()
            .iter()
            .map(|item| {
                (
                    item.year(),
                    item.group_seq().unwrap_or(u32::MAX),
                    item.rank().unwrap_or(u32::MAX),
                )
            })
            .collect();
        prop_assert!(keys.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn identifiers_are_unique_and_short(specs in arb_specs()) {
        let set = ItemSet::new(specs, &RankfillConfig::default()).expect("valid input");
        let ids: HashSet<_> = set.items().iter().map(|item| item.id().clone()).collect();
        prop_assert_eq!(ids.len(), set.len());
        for id in &ids {
            prop_assert_eq!(id.as_str().chars().count(), 2);
        }
    }

    #[test]
    fn rank_index_matches_items(specs in arb_specs()) {
        let set = ItemSet::new(specs, &RankfillConfig::default()).expect("valid input");
        prop_assert_eq!(set.ranked_count(), set.items().iter().filter(|i| i.is_ranked()).count());
        for (key, item) in set.iter() {
            if let Some(rank) = item.rank() {
                prop_assert!(set.is_occupied(rank));
                prop_assert_eq!(set.key_by_rank(rank), Some(key));
            }
        }
        prop_assert_eq!(set.edge_count(), 0);
    }
}

#[test]
fn more_items_than_ranks_is_rejected() {
    let mut config = RankfillConfig::default();
    config.ranks.high = 1002;
    let specs = (0..3).map(|i| ItemSpec::new(format!("t{i}"), 2000)).collect();
    let err = ItemSet::new(specs, &config).expect_err("over capacity");
    assert!(matches!(err, InferError::CapacityExceeded { items: 3, capacity: 2, .. }), "{err}");
}

#[test]
fn rank_outside_range_is_invalid() {
    let specs = vec![ItemSpec::new("late", 2000).with_rank(2001)];
    let err = ItemSet::new(specs, &RankfillConfig::default()).expect_err("out of range");
    assert!(matches!(err, InferError::InvalidField { field: "rank", .. }), "{err}");
}
