//! Property tests over randomly generated, internally consistent inputs.
//!
//! Each case starts from a hidden total order (a true rank per item), then
//! derives evidence that agrees with it: some items reveal their rank, and
//! within each year the earliest items get sequence numbers. Whatever the
//! pipeline infers must then hold for the hidden order too.

use std::collections::HashMap;

use proptest::prelude::*;

use rankfill_core::model::ItemSet;
use rankfill_core::{ItemSpec, RankfillConfig};
use rankfill_infer::graph::{OrderGraph, find_all_cycles};
use rankfill_infer::{Pipeline, enumerate_candidates, infer};

const YEARS: std::ops::Range<i32> = 1990..1995;

/// Generated input plus the hidden rank of every item, keyed by title.
#[derive(Debug, Clone)]
struct World {
    specs: Vec<ItemSpec>,
    truth: HashMap<String, u32>,
}

fn build_world(
    ranks: Vec<u32>,
    years: Vec<i32>,
    revealed: Vec<bool>,
    seq_counts: Vec<usize>,
) -> World {
    let mut specs: Vec<ItemSpec> = ranks
        .iter()
        .zip(&years)
        .zip(&revealed)
        .enumerate()
        .map(|(i, ((rank, year), show))| {
            let spec = ItemSpec::new(format!("t{i}"), *year);
            if *show { spec.with_rank(*rank) } else { spec }
        })
        .collect();

    for (slot, year) in YEARS.enumerate() {
        let mut cohort: Vec<usize> = (0..specs.len()).filter(|i| years[*i] == year).collect();
        cohort.sort_by_key(|i| ranks[*i]);
        let sequenced = seq_counts[slot].min(cohort.len());
        for (pos, i) in cohort.into_iter().take(sequenced).enumerate() {
            specs[i].group_seq = Some(u32::try_from(pos + 1).expect("small"));
        }
    }

    let truth = (0..ranks.len()).map(|i| (format!("t{i}"), ranks[i])).collect();
    World { specs, truth }
}

fn arb_world() -> impl Strategy<Value = World> {
    (1usize..30)
        .prop_flat_map(|n| {
            (
                proptest::sample::subsequence((1001u32..=1060).collect::<Vec<_>>(), n)
                    .prop_shuffle(),
                proptest::collection::vec(YEARS, n),
                proptest::collection::vec(any::<bool>(), n),
                proptest::collection::vec(0usize..8, YEARS.len()),
            )
        })
        .prop_map(|(ranks, years, revealed, seq_counts)| {
            build_world(ranks, years, revealed, seq_counts)
        })
}

fn truth_of(world: &World, items: &ItemSet, key: rankfill_core::ItemKey) -> u32 {
    world.truth[items.get(key).title()]
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(256))]

    #[test]
    fn consistent_evidence_always_resolves(world in arb_world()) {
        let result = infer(world.specs.clone(), &RankfillConfig::default());
        prop_assert!(result.is_ok(), "{:?}", result.err());
    }

    #[test]
    fn edges_agree_with_the_hidden_order(world in arb_world()) {
        let (items, _) =
            infer(world.specs.clone(), &RankfillConfig::default()).expect("consistent");
        for edge in items.edges() {
            prop_assert!(truth_of(&world, &items, edge.from) < truth_of(&world, &items, edge.to));
        }
    }

    #[test]
    fn ranges_contain_the_hidden_rank(world in arb_world()) {
        let (items, _) =
            infer(world.specs.clone(), &RankfillConfig::default()).expect("consistent");
        for (key, item) in items.iter().filter(|(_, item)| !item.is_ranked()) {
            let range = item.range().expect("unranked items get a range");
            let truth = truth_of(&world, &items, key);
            prop_assert!(range.contains(truth), "{} not in {range} for {item}", truth);
            prop_assert!(range.min <= range.max);
        }
    }

    #[test]
    fn graph_stays_acyclic_and_symmetric(world in arb_world()) {
        let (items, _) =
            infer(world.specs.clone(), &RankfillConfig::default()).expect("consistent");
        prop_assert!(find_all_cycles(&OrderGraph::from_items(&items)).is_empty());
        for (key, item) in items.iter() {
            for succ in item.successors() {
                prop_assert!(items.get(*succ).predecessors().contains(&key));
            }
            for pred in item.predecessors() {
                prop_assert!(items.get(*pred).successors().contains(&key));
            }
        }
    }

    #[test]
    fn layers_increase_along_edges(world in arb_world()) {
        let (items, _) =
            infer(world.specs.clone(), &RankfillConfig::default()).expect("consistent");
        for edge in items.edges() {
            let from = items.get(edge.from).approx_level().expect("layered");
            let to = items.get(edge.to).approx_level().expect("layered");
            prop_assert!(from < to);
        }
        let deepest_with_evidence = items
            .items()
            .iter()
            .filter(|item| item.is_ranked() || !item.is_isolated())
            .filter_map(|item| item.approx_level())
            .max()
            .unwrap_or(0);
        for item in items.items().iter().filter(|item| !item.is_ranked() && item.is_isolated()) {
            prop_assert!(item.approx_level().expect("layered") > deepest_with_evidence);
        }
    }

    #[test]
    fn at_most_one_ranked_predecessor(world in arb_world()) {
        let (items, _) =
            infer(world.specs.clone(), &RankfillConfig::default()).expect("consistent");
        for (_, item) in items.iter() {
            let ranked = item.predecessors().iter().filter(|p| items.get(**p).is_ranked()).count();
            prop_assert!(ranked <= 1);
        }
    }

    #[test]
    fn pipeline_is_idempotent(world in arb_world()) {
        let config = RankfillConfig::default();
        let (mut items, first) = infer(world.specs.clone(), &config).expect("consistent");
        let before = items.items().to_vec();
        let second = Pipeline::new(&config).run(&mut items).expect("consistent");
        prop_assert_eq!(first, second);
        prop_assert_eq!(items.items(), before.as_slice());
    }

    #[test]
    fn hidden_rank_is_always_a_candidate(world in arb_world()) {
        let (items, _) =
            infer(world.specs.clone(), &RankfillConfig::default()).expect("consistent");
        let report = enumerate_candidates(&items);
        prop_assert!(report.without_candidates.is_empty());
        for entry in &report.items {
            let truth = truth_of(&world, &items, entry.key);
            prop_assert!(entry.free.contains(&truth));
        }
    }
}
