//! Error types for the influence games crate

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the influence games crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("edge {from} -> {to} has weight {weight} (must be non-negative and finite)")]
    InvalidWeight { from: i64, to: i64, weight: f64 },

    #[error("{metric} vector has {got} entries but the graph has {expected} nodes")]
    CentralityLength {
        metric: String,
        expected: usize,
        got: usize,
    },

    #[error("threshold vector has {got} entries but the graph has {expected} nodes")]
    ThresholdLength { expected: usize, got: usize },

    #[error("threshold factor {value} must lie in [0, 1]")]
    InvalidFactor { value: f64 },

    #[error("proportion {value} must lie in [0, 1]")]
    InvalidProportion { value: f64 },

    #[error("participation cost {value} must be non-negative and finite")]
    InvalidAlpha { value: f64 },

    #[error("node {node} is out of range for a graph with {nodes} nodes")]
    UnknownNode { node: usize, nodes: usize },

    #[error("context covers {context} nodes but the graph has {graph}")]
    SizeMismatch { context: usize, graph: usize },

    #[error("node {node} is already a {existing} node and cannot become a {requested} node")]
    RoleConflict {
        node: usize,
        existing: String,
        requested: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("statistics cannot be averaged over zero repetitions")]
    NoRepetitions,

    #[error("statistics were already finalized")]
    AlreadyFinalized,

    #[error("{path}:{line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("invalid {kind} '{input}'. Expected one of: {expected}")]
    ParseOption {
        kind: String,
        input: String,
        expected: String,
    },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}

impl Error {
    /// Wrap an IO error with the operation that failed
    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Error::Io {
            operation: operation.into(),
            source,
        }
    }
}
