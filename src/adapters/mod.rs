//! File readers that turn datasets on disk into graphs and rankings.

pub mod dataset;
pub mod edge_list;
pub mod scores;

pub use dataset::DatasetSpec;
pub use edge_list::{WeightMode, parse_edge_list, read_edge_list};
pub use scores::{read_centrality, read_ranking, read_scores};
