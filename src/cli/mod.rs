//! CLI infrastructure for the influence games toolkit
//!
//! This module provides the command-line interface for playing single games
//! and running the batch experiments.

pub mod commands;
pub mod config;
pub mod output;
