//! Experiment configuration

use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    adapters::DatasetSpec,
    game::{
        DEFAULT_ALPHA, DEFAULT_MAX_ROUNDS, DEFAULT_SEED, SeedConfiguration, ThresholdConfiguration,
    },
    types::DiffuserMode,
};

/// The two canonical experiments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExperimentKind {
    /// Seed game then threshold game, for every fixed threshold factor
    ThresholdSweep,
    /// Threshold game from a random initial set, then the seed game from it
    Diffuser,
}

impl ExperimentKind {
    pub fn label(&self) -> &'static str {
        match self {
            ExperimentKind::ThresholdSweep => "threshold-sweep",
            ExperimentKind::Diffuser => "diffuser",
        }
    }
}

impl fmt::Display for ExperimentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ExperimentKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "threshold-sweep" | "sweep" => Ok(ExperimentKind::ThresholdSweep),
            "diffuser" => Ok(ExperimentKind::Diffuser),
            _ => Err(Error::ParseOption {
                kind: "experiment".to_string(),
                input: s.to_string(),
                expected: "threshold-sweep, diffuser".to_string(),
            }),
        }
    }
}

/// Parameters shared by both experiments, loaded from JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub datasets: Vec<DatasetSpec>,
    /// Fixed threshold factors of the sweep
    pub factors: Vec<f64>,
    /// Threshold factor of the diffuser experiment
    pub diffuser_factor: f64,
    pub target_proportion: f64,
    pub initial_proportion: f64,
    pub seed_configuration: SeedConfiguration,
    pub threshold_configuration: ThresholdConfiguration,
    /// Diffuser objective of the threshold sweep
    pub sweep_mode: DiffuserMode,
    /// Diffuser objective of the diffuser experiment
    pub mode: DiffuserMode,
    pub alpha: f64,
    pub repetitions: usize,
    pub seed: u64,
    pub max_rounds: usize,
    pub output_dir: PathBuf,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            datasets: Vec::new(),
            factors: vec![0.25, 0.5, 0.75, 0.95],
            diffuser_factor: 0.5,
            target_proportion: 0.2,
            initial_proportion: 0.2,
            seed_configuration: SeedConfiguration::Complete,
            threshold_configuration: ThresholdConfiguration::Empty,
            sweep_mode: DiffuserMode::Cooperative,
            mode: DiffuserMode::Malicious,
            alpha: DEFAULT_ALPHA,
            repetitions: 5,
            seed: DEFAULT_SEED,
            max_rounds: DEFAULT_MAX_ROUNDS,
            output_dir: PathBuf::from("results"),
        }
    }
}

impl ExperimentConfig {
    /// Load a JSON configuration.
    ///
    /// Relative dataset paths are resolved against the file's directory.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .map_err(|source| Error::io(format!("open config {path:?}"), source))?;
        let mut config: Self = serde_json::from_reader(file)?;

        if let Some(base) = path.parent() {
            config.datasets = config
                .datasets
                .into_iter()
                .map(|dataset| dataset.resolve(base))
                .collect();
        }
        config.validate()?;
        Ok(config)
    }

    /// Save as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = std::fs::File::create(path)
            .map_err(|source| Error::io(format!("create config {path:?}"), source))?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| Err(Error::InvalidConfiguration { message });

        if self.datasets.is_empty() {
            return invalid("no datasets configured".to_string());
        }
        if self.repetitions == 0 {
            return invalid("repetitions must be positive".to_string());
        }
        if self.max_rounds == 0 {
            return invalid("max_rounds must be positive".to_string());
        }
        if !self.alpha.is_finite() || self.alpha < 0.0 {
            return invalid(format!("alpha {} must be non-negative", self.alpha));
        }
        for (name, value) in [
            ("target_proportion", self.target_proportion),
            ("initial_proportion", self.initial_proportion),
            ("diffuser_factor", self.diffuser_factor),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return invalid(format!("{name} {value} must lie in [0, 1]"));
            }
        }
        if let Some(factor) = self.factors.iter().find(|f| !(0.0..=1.0).contains(*f)) {
            return invalid(format!("threshold factor {factor} must lie in [0, 1]"));
        }
        Ok(())
    }

    /// Seed of the private generator of cell `index`
    pub fn cell_seed(&self, index: usize) -> u64 {
        self.seed.wrapping_add(index as u64)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn with_dataset() -> ExperimentConfig {
        ExperimentConfig {
            datasets: vec![DatasetSpec::new("toy", "toy.txt", true)],
            ..ExperimentConfig::default()
        }
    }

    #[test]
    fn defaults_follow_the_canonical_setup() {
        let config = ExperimentConfig::default();
        assert_eq!(config.factors, vec![0.25, 0.5, 0.75, 0.95]);
        assert_eq!(config.repetitions, 5);
        assert_eq!(config.seed, 2000);
        assert_eq!(config.mode, DiffuserMode::Malicious);
        assert_eq!(config.sweep_mode, DiffuserMode::Cooperative);
        assert_eq!(config.seed_configuration, SeedConfiguration::Complete);
        assert_eq!(config.threshold_configuration, ThresholdConfiguration::Empty);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config: ExperimentConfig = serde_json::from_str(
            r#"{"datasets": [{"name": "d", "edges": "d.txt"}], "mode": "cooperative"}"#,
        )
        .unwrap();
        assert_eq!(config.mode, DiffuserMode::Cooperative);
        assert_eq!(config.alpha, 0.5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validation_names_the_bad_field() {
        let mut config = with_dataset();
        config.target_proportion = 1.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("target_proportion"));

        let mut config = with_dataset();
        config.repetitions = 0;
        assert!(config.validate().is_err());

        assert!(ExperimentConfig::default().validate().is_err());
    }

    #[test]
    fn load_resolves_dataset_paths() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("config.json");
        with_dataset().save(&path).unwrap();

        let loaded = ExperimentConfig::load(&path).unwrap();
        assert_eq!(loaded.datasets[0].edges, dir.path().join("toy.txt"));
    }

    #[test]
    fn experiment_kind_parses() {
        assert_eq!(
            "threshold-sweep".parse::<ExperimentKind>().unwrap(),
            ExperimentKind::ThresholdSweep
        );
        assert_eq!(
            "Diffuser".parse::<ExperimentKind>().unwrap(),
            ExperimentKind::Diffuser
        );
        assert!("third".parse::<ExperimentKind>().is_err());
    }
}
