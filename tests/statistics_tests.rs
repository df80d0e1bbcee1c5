use influence_games::{
    Centrality, Edge, Error, GameContext, RunOutcome, SeedConfiguration, SeedSelectionGame,
    Statistics, WeightedGraph, export::STATISTICS_HEADER,
};

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

/// Diamond with PageRank scores aligned with first-seen order.
fn scored_diamond() -> WeightedGraph {
    let edges = [
        Edge::unit(0, 1),
        Edge::unit(0, 2),
        Edge::unit(1, 3),
        Edge::unit(2, 3),
    ];
    let mut graph =
        WeightedGraph::from_edges(&edges, vec![0.4, 0.2, 0.1, 0.3], Vec::new(), true).unwrap();
    graph.set_thresholds(&[1.0; 4]).unwrap();
    graph
}

fn play_seed_game(graph: &WeightedGraph) -> (GameContext, usize) {
    let mut context = GameContext::new(graph.node_count());
    context.select_target_nodes([3]).unwrap();
    let summary = {
        let mut game = SeedSelectionGame::new(graph, &mut context).unwrap();
        game.initialize(&SeedConfiguration::Complete).unwrap();
        game.game_dynamics(100).unwrap()
    };
    (context, summary.rounds)
}

#[test]
fn seed_game_run_is_summarized() {
    let graph = scored_diamond();
    let (context, rounds) = play_seed_game(&graph);

    let mut stats = Statistics::new();
    stats
        .update(&graph, RunOutcome::from_context(&context, rounds))
        .unwrap();
    stats.finalize(1).unwrap();

    // equilibrium keeps node 2 alone, which reaches the target
    assert!(approx_eq(stats.initial_proportion(), 0.25));
    assert!(approx_eq(stats.influence_proportion(), 0.5));
    assert!(approx_eq(stats.target_proportion(), 1.0));
    assert!(approx_eq(stats.rounds(), 2.0));

    let degree_ini = stats.initial_metric(Centrality::Degree);
    assert!(approx_eq(degree_ini.global_avg, 1.0));
    let degree_inf = stats.influence_metric(Centrality::Degree);
    assert!(approx_eq(degree_inf.global_min, 0.0));
    assert!(approx_eq(degree_inf.global_max, 1.0));
    let page_inf = stats.influence_metric(Centrality::PageRank);
    assert!(approx_eq(page_inf.global_avg, 0.2));
}

#[test]
fn repetitions_are_averaged() {
    let graph = scored_diamond();
    let (context, rounds) = play_seed_game(&graph);
    let empty = influence_games::NodeSet::new();
    let quiet = RunOutcome {
        initial: &empty,
        target: context.target_set(),
        influence: &empty,
        rounds: 1,
    };

    let mut stats = Statistics::new();
    stats
        .update(&graph, RunOutcome::from_context(&context, rounds))
        .unwrap();
    stats.update(&graph, quiet).unwrap();
    stats.finalize(2).unwrap();

    assert_eq!(stats.updates(), 2);
    assert!(approx_eq(stats.target_proportion(), 0.5));
    assert!(approx_eq(stats.rounds(), 1.5));
    // the empty run adds nothing to the global sums
    let page_ini = stats.initial_metric(Centrality::PageRank);
    assert!(approx_eq(page_ini.global_avg, 0.05));
}

#[test]
fn finalized_statistics_reject_more_runs() {
    let graph = scored_diamond();
    let (context, rounds) = play_seed_game(&graph);
    let mut stats = Statistics::new();
    stats.finalize(1).unwrap();

    let err = stats
        .update(&graph, RunOutcome::from_context(&context, rounds))
        .unwrap_err();
    assert!(matches!(err, Error::AlreadyFinalized));
    assert!(matches!(stats.finalize(1), Err(Error::AlreadyFinalized)));
}

#[test]
fn record_serializes_in_header_order() {
    let graph = scored_diamond();
    let (context, rounds) = play_seed_game(&graph);
    let mut stats = Statistics::with_thresholds(graph.node_count());
    stats
        .update(&graph, RunOutcome::from_context(&context, rounds))
        .unwrap();
    stats.finalize(1).unwrap();

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.serialize(stats.record("diamond", 4)).unwrap();
    let bytes = writer.into_inner().unwrap();
    let text = String::from_utf8(bytes).unwrap();
    let mut lines = text.lines();

    assert_eq!(lines.next().unwrap(), STATISTICS_HEADER.join(","));
    assert!(lines.next().unwrap().starts_with("diamond,4,0.25,0.5,1.0,2.0,"));

    // unit thresholds over in-degrees 0, 1, 1, 2
    assert_eq!(stats.thresholds().unwrap(), &[1.0, 1.0, 1.0, 0.5]);
}
