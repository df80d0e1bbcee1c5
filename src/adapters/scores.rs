//! Readers for `id,score` files: centralities and threshold rankings.
//!
//! Both formats carry a header row followed by one `id,score` row per node.

use std::{fs::File, path::Path};

use crate::{Error, Result};

/// Read `(id, score)` pairs in file order.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be opened, [`Error::Csv`] for
/// unreadable rows and [`Error::Parse`] for non-finite scores.
pub fn read_scores(path: &Path) -> Result<Vec<(i64, f64)>> {
    let file = File::open(path)
        .map_err(|source| Error::io(format!("open score file {path:?}"), source))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut scores = Vec::new();
    // rows are positional, header names vary between files
    for (i, row) in reader.deserialize::<(i64, f64)>().enumerate() {
        let (id, score) = row?;
        if !score.is_finite() {
            return Err(Error::Parse {
                path: path.to_path_buf(),
                // header is line 1
                line: i + 2,
                message: format!("non-finite score for node {id}"),
            });
        }
        scores.push((id, score));
    }
    Ok(scores)
}

/// Read a centrality file as a vector aligned with first-seen node order.
pub fn read_centrality(path: &Path) -> Result<Vec<f64>> {
    Ok(read_scores(path)?
        .into_iter()
        .map(|(_, score)| score)
        .collect())
}

/// Read a threshold ranking.
///
/// # Errors
///
/// Besides the errors of [`read_scores`], returns [`Error::InvalidFactor`]
/// for scores outside `[0, 1]`.
pub fn read_ranking(path: &Path) -> Result<Vec<(i64, f64)>> {
    let scores = read_scores(path)?;
    if let Some(&(_, value)) = scores.iter().find(|(_, s)| !(0.0..=1.0).contains(s)) {
        return Err(Error::InvalidFactor { value });
    }
    Ok(scores)
}
