//! Experiment pipelines
//!
//! This module provides:
//! - [`ExperimentConfig`]: JSON-loaded parameters of an experiment
//! - [`Experiment`]: the threshold sweep and diffuser experiments, run in
//!   parallel per (factor, dataset) cell
//! - Observers reporting progress while cells run

pub mod config;
pub mod experiment;
pub mod observers;

pub use config::{ExperimentConfig, ExperimentKind};
pub use experiment::{
    CellResult, CellSpec, Experiment, ExperimentSummary, run_diffuser, run_threshold_sweep,
};
pub use observers::{ExperimentObserver, LogObserver, ProgressObserver};
