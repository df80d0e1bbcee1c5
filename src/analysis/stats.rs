//! Statistics aggregated over repeated game runs

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    game::GameContext,
    graph::WeightedGraph,
    types::{Centrality, NodeSet, intersection_size},
};

/// Min/max/avg of a metric over one run, folded into cross-run sums.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    local_min: f64,
    local_max: f64,
    sum: f64,
    count: usize,
    pub global_min: f64,
    pub global_max: f64,
    pub global_avg: f64,
}

impl Default for MetricSummary {
    fn default() -> Self {
        Self {
            local_min: f64::INFINITY,
            local_max: f64::NEG_INFINITY,
            sum: 0.0,
            count: 0,
            global_min: 0.0,
            global_max: 0.0,
            global_avg: 0.0,
        }
    }
}

impl MetricSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, value: f64) {
        self.local_min = self.local_min.min(value);
        self.local_max = self.local_max.max(value);
        self.sum += value;
        self.count += 1;
    }

    /// Average of the current run, 0 if nothing was added
    pub fn avg(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }

    /// Values added in the current run
    pub fn count(&self) -> usize {
        self.count
    }

    /// Forget the current run
    pub fn restart(&mut self) {
        self.local_min = f64::INFINITY;
        self.local_max = f64::NEG_INFINITY;
        self.sum = 0.0;
        self.count = 0;
    }

    /// Add the current run to the global sums and restart.
    ///
    /// A run without values contributes 0 to every global sum.
    pub fn accumulate_global(&mut self) {
        if self.count > 0 {
            self.global_min += self.local_min;
            self.global_max += self.local_max;
            self.global_avg += self.avg();
        }
        self.restart();
    }

    pub fn global_average(&mut self, repetitions: usize) {
        let k = repetitions as f64;
        self.global_min /= k;
        self.global_max /= k;
        self.global_avg /= k;
    }
}

/// Result sets of one finished game
#[derive(Debug, Clone, Copy)]
pub struct RunOutcome<'a> {
    pub initial: &'a NodeSet,
    pub target: &'a NodeSet,
    pub influence: &'a NodeSet,
    pub rounds: usize,
}

impl<'a> RunOutcome<'a> {
    /// Read the sets a game published into `context`
    pub fn from_context(context: &'a GameContext, rounds: usize) -> Self {
        Self {
            initial: context.initial_set(),
            target: context.target_set(),
            influence: context.final_influence(),
            rounds,
        }
    }
}

/// Two-tier accumulator of coverage ratios, rounds and centrality summaries.
///
/// Call [`Statistics::update`] once per repetition and
/// [`Statistics::finalize`] once at the end.
#[derive(Debug, Clone, Default)]
pub struct Statistics {
    initial_proportion: f64,
    influence_proportion: f64,
    target_proportion: f64,
    rounds: f64,
    initial_metrics: [MetricSummary; 3],
    influence_metrics: [MetricSummary; 3],
    thresholds: Option<Vec<f64>>,
    updates: usize,
    finalized: bool,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also track the per-node threshold to in-degree ratio of `nodes` nodes
    pub fn with_thresholds(nodes: usize) -> Self {
        Self {
            thresholds: Some(vec![0.0; nodes]),
            ..Self::default()
        }
    }

    /// Fold one run into the running sums.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyFinalized`] after [`Statistics::finalize`] and
    /// [`Error::ThresholdLength`] if tracked thresholds do not match the graph.
    pub fn update(&mut self, graph: &WeightedGraph, outcome: RunOutcome<'_>) -> Result<()> {
        if self.finalized {
            return Err(Error::AlreadyFinalized);
        }
        if let Some(thresholds) = &self.thresholds
            && thresholds.len() != graph.node_count()
        {
            return Err(Error::ThresholdLength {
                expected: thresholds.len(),
                got: graph.node_count(),
            });
        }

        let n = graph.node_count() as f64;
        if n > 0.0 {
            self.initial_proportion += outcome.initial.len() as f64 / n;
            self.influence_proportion += outcome.influence.len() as f64 / n;
        }
        if !outcome.target.is_empty() {
            let covered = intersection_size(outcome.target, outcome.influence);
            self.target_proportion += covered as f64 / outcome.target.len() as f64;
        }
        self.rounds += outcome.rounds as f64;

        for metric in Centrality::ALL {
            let i = metric.index();
            for &node in outcome.initial {
                self.initial_metrics[i].add(graph.metric(node, metric, true));
            }
            for &node in outcome.influence {
                self.influence_metrics[i].add(graph.metric(node, metric, false));
            }
            self.initial_metrics[i].accumulate_global();
            self.influence_metrics[i].accumulate_global();
        }

        if let Some(thresholds) = self.thresholds.as_mut() {
            for (node, ratio) in thresholds.iter_mut().enumerate() {
                let degree = graph.in_degree(node).max(1) as f64;
                *ratio += graph.threshold(node) / degree;
            }
        }

        self.updates += 1;
        Ok(())
    }

    /// Divide every sum by `repetitions`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoRepetitions`] for zero repetitions and
    /// [`Error::AlreadyFinalized`] on a second call.
    pub fn finalize(&mut self, repetitions: usize) -> Result<()> {
        if repetitions == 0 {
            return Err(Error::NoRepetitions);
        }
        if self.finalized {
            return Err(Error::AlreadyFinalized);
        }

        let k = repetitions as f64;
        self.initial_proportion /= k;
        self.influence_proportion /= k;
        self.target_proportion /= k;
        self.rounds /= k;
        for summary in self
            .initial_metrics
            .iter_mut()
            .chain(self.influence_metrics.iter_mut())
        {
            summary.global_average(repetitions);
        }
        if let Some(thresholds) = self.thresholds.as_mut() {
            for ratio in thresholds.iter_mut() {
                *ratio /= k;
            }
        }

        self.finalized = true;
        Ok(())
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Runs folded in so far
    pub fn updates(&self) -> usize {
        self.updates
    }

    /// Average `|I| / N`
    pub fn initial_proportion(&self) -> f64 {
        self.initial_proportion
    }

    /// Average `|F| / N`
    pub fn influence_proportion(&self) -> f64 {
        self.influence_proportion
    }

    /// Average `|T ∩ F| / |T|`
    pub fn target_proportion(&self) -> f64 {
        self.target_proportion
    }

    pub fn rounds(&self) -> f64 {
        self.rounds
    }

    pub fn initial_metric(&self, metric: Centrality) -> &MetricSummary {
        &self.initial_metrics[metric.index()]
    }

    pub fn influence_metric(&self, metric: Centrality) -> &MetricSummary {
        &self.influence_metrics[metric.index()]
    }

    /// Per-node threshold to in-degree ratios, if tracked
    pub fn thresholds(&self) -> Option<&[f64]> {
        self.thresholds.as_deref()
    }

    /// Flatten into one CSV row
    pub fn record(&self, network: &str, nodes: usize) -> StatisticsRecord {
        let ini = |m: Centrality| self.initial_metric(m);
        let inf = |m: Centrality| self.influence_metric(m);
        StatisticsRecord {
            network: network.to_string(),
            nodes,
            initial_prop: self.initial_proportion,
            influence_prop: self.influence_proportion,
            influence_target_prop: self.target_proportion,
            rounds: self.rounds,
            min_degree_ini: ini(Centrality::Degree).global_min,
            max_degree_ini: ini(Centrality::Degree).global_max,
            avg_degree_ini: ini(Centrality::Degree).global_avg,
            min_page_ini: ini(Centrality::PageRank).global_min,
            max_page_ini: ini(Centrality::PageRank).global_max,
            avg_page_ini: ini(Centrality::PageRank).global_avg,
            min_btw_ini: ini(Centrality::Betweenness).global_min,
            max_btw_ini: ini(Centrality::Betweenness).global_max,
            avg_btw_ini: ini(Centrality::Betweenness).global_avg,
            min_degree_inf: inf(Centrality::Degree).global_min,
            max_degree_inf: inf(Centrality::Degree).global_max,
            avg_degree_inf: inf(Centrality::Degree).global_avg,
            min_page_inf: inf(Centrality::PageRank).global_min,
            max_page_inf: inf(Centrality::PageRank).global_max,
            avg_page_inf: inf(Centrality::PageRank).global_avg,
            min_btw_inf: inf(Centrality::Betweenness).global_min,
            max_btw_inf: inf(Centrality::Betweenness).global_max,
            avg_btw_inf: inf(Centrality::Betweenness).global_avg,
        }
    }
}

/// One row of the statistics CSV
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsRecord {
    #[serde(rename = "Network")]
    pub network: String,
    #[serde(rename = "N")]
    pub nodes: usize,
    #[serde(rename = "InitialProp")]
    pub initial_prop: f64,
    #[serde(rename = "InfluenceProp")]
    pub influence_prop: f64,
    #[serde(rename = "InfluenceTargetProp")]
    pub influence_target_prop: f64,
    #[serde(rename = "Rounds")]
    pub rounds: f64,
    #[serde(rename = "MinDegreeIni")]
    pub min_degree_ini: f64,
    #[serde(rename = "MaxDegreeIni")]
    pub max_degree_ini: f64,
    #[serde(rename = "AvgDegreeIni")]
    pub avg_degree_ini: f64,
    #[serde(rename = "MinPageIni")]
    pub min_page_ini: f64,
    #[serde(rename = "MaxPageIni")]
    pub max_page_ini: f64,
    #[serde(rename = "AvgPageIni")]
    pub avg_page_ini: f64,
    #[serde(rename = "MinBtwIni")]
    pub min_btw_ini: f64,
    #[serde(rename = "MaxBtwIni")]
    pub max_btw_ini: f64,
    #[serde(rename = "AvgBtwIni")]
    pub avg_btw_ini: f64,
    #[serde(rename = "MinDegreeInf")]
    pub min_degree_inf: f64,
    #[serde(rename = "MaxDegreeInf")]
    pub max_degree_inf: f64,
    #[serde(rename = "AvgDegreeInf")]
    pub avg_degree_inf: f64,
    #[serde(rename = "MinPageInf")]
    pub min_page_inf: f64,
    #[serde(rename = "MaxPageInf")]
    pub max_page_inf: f64,
    #[serde(rename = "AvgPageInf")]
    pub avg_page_inf: f64,
    #[serde(rename = "MinBtwInf")]
    pub min_btw_inf: f64,
    #[serde(rename = "MaxBtwInf")]
    pub max_btw_inf: f64,
    #[serde(rename = "AvgBtwInf")]
    pub avg_btw_inf: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Edge;

    #[test]
    fn empty_run_contributes_zero() {
        let mut summary = MetricSummary::new();
        summary.accumulate_global();
        summary.add(4.0);
        summary.add(2.0);
        summary.accumulate_global();
        summary.global_average(2);
        assert_eq!(summary.global_min, 1.0);
        assert_eq!(summary.global_max, 2.0);
        assert_eq!(summary.global_avg, 1.5);
    }

    #[test]
    fn restart_clears_the_local_tier() {
        let mut summary = MetricSummary::new();
        summary.add(3.0);
        summary.restart();
        assert_eq!(summary.count(), 0);
        assert_eq!(summary.avg(), 0.0);
    }

    fn line() -> WeightedGraph {
        let edges = [Edge::unit(0, 1), Edge::unit(1, 2), Edge::unit(2, 3)];
        let mut graph = WeightedGraph::from_edge_list(&edges, true).unwrap();
        graph.set_thresholds(&[1.0, 1.0, 2.0, 1.0]).unwrap();
        graph
    }

    #[test]
    fn identical_runs_average_to_the_single_run() {
        let graph = line();
        let initial: NodeSet = [0].into_iter().collect();
        let target: NodeSet = [2, 3].into_iter().collect();
        let influence: NodeSet = [0, 1, 2].into_iter().collect();
        let outcome = RunOutcome {
            initial: &initial,
            target: &target,
            influence: &influence,
            rounds: 3,
        };

        let mut single = Statistics::with_thresholds(4);
        single.update(&graph, outcome).unwrap();
        single.finalize(1).unwrap();

        let mut repeated = Statistics::with_thresholds(4);
        for _ in 0..4 {
            repeated.update(&graph, outcome).unwrap();
        }
        repeated.finalize(4).unwrap();

        assert_eq!(single.initial_proportion(), 0.25);
        assert_eq!(single.influence_proportion(), 0.75);
        assert_eq!(single.target_proportion(), 0.5);
        assert_eq!(single.rounds(), 3.0);
        // out-degrees of 0, 1, 2 are all 1
        assert_eq!(single.influence_metric(Centrality::Degree).global_avg, 1.0);
        assert_eq!(single.thresholds().unwrap()[2], 2.0);

        for metric in Centrality::ALL {
            let a = single.influence_metric(metric).global_avg;
            let b = repeated.influence_metric(metric).global_avg;
            assert!((a - b).abs() < 1e-12);
        }
        assert!((single.target_proportion() - repeated.target_proportion()).abs() < 1e-12);
        assert_eq!(single.record("line", 4), repeated.record("line", 4));
    }

    #[test]
    fn empty_target_set_scores_zero() {
        let graph = line();
        let empty = NodeSet::new();
        let influence: NodeSet = [0].into_iter().collect();
        let mut stats = Statistics::new();
        stats
            .update(
                &graph,
                RunOutcome {
                    initial: &influence,
                    target: &empty,
                    influence: &influence,
                    rounds: 1,
                },
            )
            .unwrap();
        assert_eq!(stats.target_proportion(), 0.0);
        assert!(stats.thresholds().is_none());
    }

    #[test]
    fn finalize_guards_against_misuse() {
        let mut stats = Statistics::new();
        assert!(matches!(stats.finalize(0), Err(Error::NoRepetitions)));
        stats.finalize(1).unwrap();
        assert!(matches!(stats.finalize(1), Err(Error::AlreadyFinalized)));
    }

    #[test]
    fn record_uses_csv_column_names() {
        let record = Statistics::new().record("toy", 3);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["Network"], "toy");
        assert_eq!(json["N"], 3);
        assert!(json.get("AvgBtwInf").is_some());
    }
}
