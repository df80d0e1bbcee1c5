//! CSV output for aggregated statistics and per-node thresholds

use std::{
    fs::{self, File, OpenOptions},
    path::{Path, PathBuf},
};

use serde::Serialize;

use crate::{Error, Result, analysis::StatisticsRecord};

/// Column names of the statistics CSV, in [`StatisticsRecord`] field order
pub const STATISTICS_HEADER: [&str; 24] = [
    "Network",
    "N",
    "InitialProp",
    "InfluenceProp",
    "InfluenceTargetProp",
    "Rounds",
    "MinDegreeIni",
    "MaxDegreeIni",
    "AvgDegreeIni",
    "MinPageIni",
    "MaxPageIni",
    "AvgPageIni",
    "MinBtwIni",
    "MaxBtwIni",
    "AvgBtwIni",
    "MinDegreeInf",
    "MaxDegreeInf",
    "AvgDegreeInf",
    "MinPageInf",
    "MaxPageInf",
    "AvgPageInf",
    "MinBtwInf",
    "MaxBtwInf",
    "AvgBtwInf",
];

/// Appends statistics rows to a CSV file whose header was written once
#[derive(Debug, Clone)]
pub struct StatisticsWriter {
    path: PathBuf,
}

impl StatisticsWriter {
    /// Create (or truncate) the file and write the header.
    ///
    /// Missing parent directories are created.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        ensure_parent(&path)?;
        let file = File::create(&path)
            .map_err(|source| Error::io(format!("create statistics file {path:?}"), source))?;
        let mut writer = csv::Writer::from_writer(file);
        writer.write_record(STATISTICS_HEADER)?;
        writer
            .flush()
            .map_err(|source| Error::io(format!("write header to {path:?}"), source))?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one row.
    pub fn append(&self, record: &StatisticsRecord) -> Result<()> {
        let file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|source| Error::io(format!("open {:?} for append", self.path), source))?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.serialize(record)?;
        writer
            .flush()
            .map_err(|source| Error::io(format!("append to {:?}", self.path), source))?;
        Ok(())
    }
}

#[derive(Serialize)]
struct ThresholdRow {
    #[serde(rename = "Node")]
    node: i64,
    #[serde(rename = "Threshold")]
    threshold: f64,
}

/// Write one `Node,Threshold` row per node, labelled with external ids.
///
/// # Errors
///
/// Returns [`Error::ThresholdLength`] if `nodes` and `thresholds` differ in
/// length.
pub fn write_thresholds(path: &Path, nodes: &[i64], thresholds: &[f64]) -> Result<()> {
    if nodes.len() != thresholds.len() {
        return Err(Error::ThresholdLength {
            expected: nodes.len(),
            got: thresholds.len(),
        });
    }

    ensure_parent(path)?;
    let file = File::create(path)
        .map_err(|source| Error::io(format!("create threshold file {path:?}"), source))?;
    let mut writer = csv::Writer::from_writer(file);
    for (&node, &threshold) in nodes.iter().zip(thresholds) {
        writer.serialize(ThresholdRow { node, threshold })?;
    }
    writer
        .flush()
        .map_err(|source| Error::io(format!("write thresholds to {path:?}"), source))?;
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .map_err(|source| Error::io(format!("create directory {parent:?}"), source))?;
    }
    Ok(())
}
