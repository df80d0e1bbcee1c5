//! Observers of experiment progress
//!
//! Cells run in parallel, so observers are shared between worker threads and
//! take `&self`.

use std::sync::OnceLock;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use super::experiment::{CellResult, CellSpec};
use crate::{Error, Result};

/// Hooks called while an experiment runs.
///
/// `on_experiment_start` and `on_experiment_end` are called once from the
/// driving thread; the cell hooks may be called concurrently.
pub trait ExperimentObserver: Send + Sync {
    fn on_experiment_start(&self, _total_cells: usize) -> Result<()> {
        Ok(())
    }

    fn on_cell_start(&self, _cell: &CellSpec) {}

    fn on_cell_end(&self, _result: &CellResult) {}

    fn on_experiment_end(&self) -> Result<()> {
        Ok(())
    }
}

/// Progress bar over the experiment cells
#[derive(Default)]
pub struct ProgressObserver {
    progress_bar: OnceLock<ProgressBar>,
}

impl ProgressObserver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ExperimentObserver for ProgressObserver {
    fn on_experiment_start(&self, total_cells: usize) -> Result<()> {
        let pb = ProgressBar::new(total_cells as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} cells ({msg})")
                .map_err(|e| Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        // a second start keeps the first bar
        let _ = self.progress_bar.set(pb);
        Ok(())
    }

    fn on_cell_end(&self, result: &CellResult) {
        if let Some(pb) = self.progress_bar.get() {
            pb.inc(1);
            pb.set_message(format!("{} th={:.2}", result.dataset, result.factor));
        }
    }

    fn on_experiment_end(&self) -> Result<()> {
        if let Some(pb) = self.progress_bar.get() {
            pb.finish_with_message("done");
        }
        Ok(())
    }
}

/// Structured log line per cell
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl ExperimentObserver for LogObserver {
    fn on_experiment_start(&self, total_cells: usize) -> Result<()> {
        info!(cells = total_cells, "experiment started");
        Ok(())
    }

    fn on_cell_start(&self, cell: &CellSpec) {
        info!(
            cell = cell.index,
            dataset = %cell.dataset,
            factor = cell.factor,
            "cell started"
        );
    }

    fn on_cell_end(&self, result: &CellResult) {
        info!(
            cell = result.index,
            dataset = %result.dataset,
            factor = result.factor,
            seed_game_coverage = result.seed_game.influence_target_prop,
            threshold_game_coverage = result.threshold_game.influence_target_prop,
            "cell finished"
        );
        if result.round_limit_hits > 0 {
            warn!(
                cell = result.index,
                dataset = %result.dataset,
                runs = result.round_limit_hits,
                "some runs stopped at the round limit"
            );
        }
    }

    fn on_experiment_end(&self) -> Result<()> {
        info!("experiment finished");
        Ok(())
    }
}
