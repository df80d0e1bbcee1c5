//! Export of experiment results
//!
//! Statistics rows and per-node threshold dumps are written as CSV.

mod statistics_csv;

pub use statistics_csv::{STATISTICS_HEADER, StatisticsWriter, write_thresholds};
