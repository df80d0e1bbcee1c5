use influence_games::{NodeSet, types::sorted};
use proptest::prelude::*;

mod common;

#[test]
fn diamond_spreads_from_the_source() {
    let graph = common::diamond();
    let influenced = graph.expand(&[0]);
    assert_eq!(sorted(&influenced), vec![0, 1, 2, 3]);
}

#[test]
fn diamond_sink_needs_both_parents_when_threshold_is_high() {
    let mut graph = common::diamond();
    // node 3 has in-degree 2, so each active parent adds 2
    graph.set_threshold(3, 4.0);
    assert!(graph.expand(&[0]).contains(&3));

    graph.set_threshold(3, 5.0);
    assert!(!graph.expand(&[0]).contains(&3));
    assert!(!graph.expand(&[1]).contains(&3));
}

#[test]
fn path_levels_follow_distance() {
    let graph = common::path(5);
    let spread = graph.spread(&[0]);
    assert_eq!(spread.len(), 5);
    assert_eq!(spread.depth(), 4);
    assert_eq!(spread.order, vec![0, 1, 2, 3, 4]);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn seeds_are_always_influenced(graph in common::graphs(12, 30), pick in 0usize..12) {
        let seed = pick % graph.node_count();
        let influenced = graph.expand(&[seed]);
        prop_assert!(influenced.contains(&seed));
    }

    #[test]
    fn expansion_is_idempotent(graph in common::graphs(12, 30), mask in any::<u16>()) {
        let seeds: NodeSet = (0..graph.node_count()).filter(|n| mask & (1 << n) != 0).collect();
        let once = graph.expand(&seeds);
        let twice = graph.expand(&once);
        prop_assert_eq!(sorted(&once), sorted(&twice));
    }

    #[test]
    fn more_seeds_never_shrink_the_spread(
        graph in common::graphs(12, 30),
        mask in any::<u16>(),
        extra in 0usize..12,
    ) {
        let seeds: NodeSet = (0..graph.node_count()).filter(|n| mask & (1 << n) != 0).collect();
        let mut larger = seeds.clone();
        larger.insert(extra % graph.node_count());

        let small = graph.expand(&seeds);
        let large = graph.expand(&larger);
        prop_assert!(small.is_subset(&large));
    }

    #[test]
    fn lower_thresholds_never_shrink_the_spread(
        edges in common::edge_lists(12, 30),
        low in 0.0..=0.5_f64,
        high in 0.5..=1.0_f64,
    ) {
        let mut graph = influence_games::WeightedGraph::from_edge_list(&edges, true).unwrap();
        graph.assign_fixed(high).unwrap();
        let strict = graph.expand(&[0]);
        graph.assign_fixed(low).unwrap();
        let lenient = graph.expand(&[0]);
        prop_assert!(strict.is_subset(&lenient));
    }
}
