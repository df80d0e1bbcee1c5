//! Whitespace-separated edge list reader
//!
//! One edge per line as `from to [weight]`. Blank lines and lines starting
//! with `#` or `%` are skipped.

use std::{fs, path::Path};

use crate::{Error, Result, types::Edge};

/// How edge weights are read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeightMode {
    /// Every edge has weight 1; extra columns are ignored
    #[default]
    Unweighted,
    /// The third column is required and its absolute value is used
    Weighted,
    /// The third column is required but every edge has weight 1
    IgnoreWeights,
}

impl WeightMode {
    pub fn from_flags(weighted: bool, ignore_weights: bool) -> Self {
        match (weighted, ignore_weights) {
            (false, _) => WeightMode::Unweighted,
            (true, false) => WeightMode::Weighted,
            (true, true) => WeightMode::IgnoreWeights,
        }
    }
}

/// Read an edge list file.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read and [`Error::Parse`] for
/// malformed lines.
pub fn read_edge_list(path: &Path, mode: WeightMode) -> Result<Vec<Edge>> {
    let content = fs::read_to_string(path)
        .map_err(|source| Error::io(format!("read edge list {path:?}"), source))?;
    parse_edge_list(&content, path, mode)
}

/// Parse edge list text. `path` only labels errors.
pub fn parse_edge_list(content: &str, path: &Path, mode: WeightMode) -> Result<Vec<Edge>> {
    let mut edges = Vec::new();

    for (i, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('%') {
            continue;
        }

        let parse_error = |message: String| Error::Parse {
            path: path.to_path_buf(),
            line: i + 1,
            message,
        };

        let mut fields = line.split_whitespace();
        let mut node = |name: &str| -> Result<i64> {
            let field = fields
                .next()
                .ok_or_else(|| parse_error(format!("missing {name} node")))?;
            field
                .parse()
                .map_err(|_| parse_error(format!("invalid {name} node '{field}'")))
        };
        let from = node("source")?;
        let to = node("target")?;

        let weight = match mode {
            WeightMode::Unweighted => 1.0,
            WeightMode::Weighted | WeightMode::IgnoreWeights => {
                let field = fields
                    .next()
                    .ok_or_else(|| parse_error("missing weight".to_string()))?;
                let weight: f64 = field
                    .parse()
                    .map_err(|_| parse_error(format!("invalid weight '{field}'")))?;
                if !weight.is_finite() {
                    return Err(parse_error(format!("non-finite weight '{field}'")));
                }
                if mode == WeightMode::Weighted {
                    weight.abs()
                } else {
                    1.0
                }
            }
        };

        edges.push(Edge::new(from, to, weight));
    }

    Ok(edges)
}
