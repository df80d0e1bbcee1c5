use influence_games::{
    DiffuserMode, Edge, GameContext, NodeId, SeedConfiguration, SeedSelectionGame,
    ThresholdConfiguration, ThresholdSelectionGame, WeightedGraph, types::sorted,
};
use proptest::prelude::*;

mod common;

fn covered_with(graph: &WeightedGraph, context: &GameContext, node: NodeId, threshold: u32) -> bool {
    let mut trial = graph.clone();
    trial.set_threshold(node, f64::from(threshold));
    trial.covers(context.initial_set(), context.target_set())
}

fn random_context(graph: &WeightedGraph, seed: u64) -> GameContext {
    let mut context = GameContext::with_seed(graph.node_count(), seed);
    context.select_initial_nodes([0]).unwrap();
    context.select_target_proportion(0.3).unwrap();
    context
}

#[test]
fn seed_game_on_diamond_keeps_one_parent() {
    let graph = common::diamond();
    let mut context = GameContext::new(graph.node_count());
    context.select_target_nodes([3]).unwrap();

    let summary = {
        let mut game = SeedSelectionGame::new(&graph, &mut context).unwrap();
        game.initialize(&SeedConfiguration::Complete).unwrap();
        game.game_dynamics(100).unwrap()
    };

    // node 3 has in-degree 2, so one active parent already reaches it
    assert!(summary.converged());
    assert_eq!(summary.rounds, 2);
    assert_eq!(sorted(context.initial_set()), vec![2]);
    assert_eq!(sorted(context.final_influence()), vec![2, 3]);
}

#[test]
fn malicious_diffuser_raises_unblockable_thresholds_to_the_cap() {
    // 0 -> 2, 1 -> 2, 2 -> 3; one unit parent already gives node 2 its in-degree
    let edges = [
        Edge::unit(0, 2),
        Edge::unit(1, 2),
        Edge::unit(2, 3),
    ];
    let mut graph = common::with_unit_thresholds(&edges);
    let seed = graph.node_index(0).unwrap();
    let middle = graph.node_index(2).unwrap();
    let target = graph.node_index(3).unwrap();
    let mut context = GameContext::new(graph.node_count());
    context.select_initial_nodes([seed]).unwrap();
    context.select_target_nodes([target]).unwrap();

    let summary = {
        let mut game =
            ThresholdSelectionGame::new(&mut graph, &mut context, DiffuserMode::Malicious).unwrap();
        game.initialize(ThresholdConfiguration::Empty);
        game.game_dynamics(100).unwrap()
    };

    assert!(summary.converged());
    assert_eq!(graph.threshold(middle), 2.0);
    assert!(context.final_influence().contains(&target));
}

#[test]
fn light_edges_stay_blocked_for_the_malicious_diffuser() {
    // weight 0.5 into node 2 (in-degree 1) contributes 0.5, below any threshold >= 1
    let edges = [
        Edge::unit(0, 1),
        Edge::new(1, 2, 0.5),
        Edge::unit(2, 3),
    ];
    let mut graph = WeightedGraph::from_edge_list(&edges, true).unwrap();
    graph.set_thresholds(&[1.0; 4]).unwrap();
    let mut context = GameContext::new(graph.node_count());
    context.select_initial_nodes([0]).unwrap();
    context.select_target_nodes([3]).unwrap();

    {
        let mut game =
            ThresholdSelectionGame::new(&mut graph, &mut context, DiffuserMode::Malicious).unwrap();
        game.initialize(ThresholdConfiguration::Empty);
        game.game_dynamics(100).unwrap();
    }

    assert_eq!(sorted(context.final_influence()), vec![0, 1]);
}

#[test]
fn cooperative_diffuser_covers_the_path() {
    let mut graph = common::path(4);
    let mut context = GameContext::new(graph.node_count());
    context.select_initial_nodes([0]).unwrap();
    context.select_target_nodes([3]).unwrap();

    {
        let mut game =
            ThresholdSelectionGame::new(&mut graph, &mut context, DiffuserMode::Cooperative)
                .unwrap();
        game.initialize(ThresholdConfiguration::Complete);
        game.game_dynamics(100).unwrap();
    }

    assert_eq!(sorted(context.final_influence()), vec![0, 1, 2, 3]);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn converged_seed_dynamics_end_in_equilibrium(
        graph in common::graphs(10, 25),
        seed in any::<u64>(),
        alpha in 0.0..2.0_f64,
    ) {
        let mut context = GameContext::with_seed(graph.node_count(), seed);
        context.select_target_proportion(0.3).unwrap();

        let summary = {
            let mut game = SeedSelectionGame::new(&graph, &mut context)
                .unwrap()
                .with_alpha(alpha)
                .unwrap();
            game.initialize(&SeedConfiguration::Random).unwrap();
            game.game_dynamics(200).unwrap()
        };
        prop_assume!(summary.converged());

        // a fresh game starts from the published initial set
        let game = SeedSelectionGame::new(&graph, &mut context).unwrap().with_alpha(alpha).unwrap();
        prop_assert!(game.is_equilibrium());
    }

    #[test]
    fn malicious_best_response_is_the_blocking_boundary(
        graph in common::graphs(10, 25),
        seed in any::<u64>(),
    ) {
        let mut graph = graph;
        let mut context = random_context(&graph, seed);
        let responses: Vec<(NodeId, u32, u32)> = {
            let mut game =
                ThresholdSelectionGame::new(&mut graph, &mut context, DiffuserMode::Malicious)
                    .unwrap();
            let players = game.players().to_vec();
            players
                .into_iter()
                .map(|p| (p, game.best_response(p), game.cap(p)))
                .collect()
        };

        for (player, best, cap) in responses {
            prop_assert!((1..=cap).contains(&best));
            if covered_with(&graph, &context, player, best) {
                prop_assert_eq!(best, cap);
            } else if best > 1 {
                prop_assert!(covered_with(&graph, &context, player, best - 1));
            }
        }
    }

    #[test]
    fn cooperative_best_response_is_the_covering_boundary(
        graph in common::graphs(10, 25),
        seed in any::<u64>(),
    ) {
        let mut graph = graph;
        let mut context = random_context(&graph, seed);
        let responses: Vec<(NodeId, u32, u32)> = {
            let mut game =
                ThresholdSelectionGame::new(&mut graph, &mut context, DiffuserMode::Cooperative)
                    .unwrap();
            let players = game.players().to_vec();
            players
                .into_iter()
                .map(|p| (p, game.best_response(p), game.cap(p)))
                .collect()
        };

        for (player, best, cap) in responses {
            // the in-degree itself is never offered to a cooperative diffuser
            let top = cap.saturating_sub(1).max(1);
            prop_assert!((1..=top).contains(&best));
            if covered_with(&graph, &context, player, best) {
                prop_assert!(best == top || !covered_with(&graph, &context, player, best + 1));
            } else {
                prop_assert_eq!(best, 1);
            }
        }
    }

    #[test]
    fn converged_threshold_dynamics_end_in_equilibrium(
        graph in common::graphs(10, 25),
        seed in any::<u64>(),
        cooperative in any::<bool>(),
    ) {
        let mode = if cooperative { DiffuserMode::Cooperative } else { DiffuserMode::Malicious };
        let mut graph = graph;
        let mut context = random_context(&graph, seed);

        let summary = {
            let mut game = ThresholdSelectionGame::new(&mut graph, &mut context, mode).unwrap();
            game.initialize(ThresholdConfiguration::Random);
            game.game_dynamics(200).unwrap()
        };
        prop_assume!(summary.converged());

        let mut game = ThresholdSelectionGame::new(&mut graph, &mut context, mode).unwrap();
        prop_assert!(game.is_equilibrium());
    }
}
