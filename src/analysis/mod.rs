//! Aggregation of game outcomes across repetitions

pub mod stats;

pub use stats::{MetricSummary, RunOutcome, Statistics, StatisticsRecord};
