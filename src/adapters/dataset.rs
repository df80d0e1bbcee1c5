//! Dataset descriptions and graph loading

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    edge_list::{WeightMode, read_edge_list},
    scores::read_centrality,
};
use crate::{Result, graph::WeightedGraph};

/// A network on disk: edge list plus optional centrality files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSpec {
    /// Name used in result rows and file names
    pub name: String,
    pub edges: PathBuf,
    #[serde(default)]
    pub directed: bool,
    #[serde(default)]
    pub weighted: bool,
    /// Read the weight column but treat every edge as weight 1
    #[serde(default)]
    pub ignore_weights: bool,
    #[serde(default)]
    pub pagerank: Option<PathBuf>,
    #[serde(default)]
    pub betweenness: Option<PathBuf>,
}

impl DatasetSpec {
    /// Unweighted dataset without centralities
    pub fn new(name: impl Into<String>, edges: impl Into<PathBuf>, directed: bool) -> Self {
        Self {
            name: name.into(),
            edges: edges.into(),
            directed,
            weighted: false,
            ignore_weights: false,
            pagerank: None,
            betweenness: None,
        }
    }

    pub fn weight_mode(&self) -> WeightMode {
        WeightMode::from_flags(self.weighted, self.ignore_weights)
    }

    /// Make relative paths relative to `base`
    pub fn resolve(mut self, base: &Path) -> Self {
        let join = |path: PathBuf| {
            if path.is_relative() {
                base.join(path)
            } else {
                path
            }
        };
        self.edges = join(self.edges);
        self.pagerank = self.pagerank.map(join);
        self.betweenness = self.betweenness.map(join);
        self
    }

    /// Read the files and build the graph.
    ///
    /// Missing centrality files leave the scores at zero.
    pub fn load(&self) -> Result<WeightedGraph> {
        let edges = read_edge_list(&self.edges, self.weight_mode())?;
        let pagerank = self
            .pagerank
            .as_deref()
            .map(read_centrality)
            .transpose()?
            .unwrap_or_default();
        let betweenness = self
            .betweenness
            .as_deref()
            .map(read_centrality)
            .transpose()?
            .unwrap_or_default();

        let graph = WeightedGraph::from_edges(&edges, pagerank, betweenness, self.directed)?;
        debug!(
            dataset = %self.name,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            directed = self.directed,
            "dataset loaded"
        );
        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn loads_edges_and_centralities() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(dir.path().join("toy.txt"), "1 2\n2 3\n").unwrap();
        fs::write(dir.path().join("pr.csv"), "id,score\n1,0.2\n2,0.3\n3,0.5\n").unwrap();

        let mut spec = DatasetSpec::new("toy", "toy.txt", true);
        spec.pagerank = Some(PathBuf::from("pr.csv"));
        let graph = spec.resolve(dir.path()).load().unwrap();

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.pagerank(2), 0.5);
        assert_eq!(graph.betweenness(2), 0.0);
    }

    #[test]
    fn centrality_length_must_match() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(dir.path().join("toy.txt"), "1 2\n").unwrap();
        fs::write(dir.path().join("bw.csv"), "id,score\n1,0.2\n").unwrap();

        let mut spec = DatasetSpec::new("toy", "toy.txt", false);
        spec.betweenness = Some(PathBuf::from("bw.csv"));
        assert!(spec.resolve(dir.path()).load().is_err());
    }

    #[test]
    fn absolute_paths_survive_resolution() {
        let spec = DatasetSpec::new("abs", "/data/abs.txt", false).resolve(Path::new("/cfg"));
        assert_eq!(spec.edges, PathBuf::from("/data/abs.txt"));
    }

    #[test]
    fn config_fields_default_to_plain_undirected() {
        let spec: DatasetSpec =
            serde_json::from_str(r#"{"name": "d", "edges": "d.txt"}"#).unwrap();
        assert!(!spec.directed);
        assert_eq!(spec.weight_mode(), WeightMode::Unweighted);
    }
}
