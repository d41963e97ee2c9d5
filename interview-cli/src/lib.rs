//! # interview-cli
//!
//! The `mock-interview` binary and the pieces it is assembled from:
//!
//! - [`config::AppConfig`] - settings read once from the environment
//! - [`extract`] - text from PDF, RTF and plain files
//! - [`commands`] - the `interview` and `evaluate` entry points
//! - [`telemetry`] - `tracing` subscriber setup

pub mod cli;
pub mod commands;
pub mod config;
pub mod extract;
pub mod telemetry;
