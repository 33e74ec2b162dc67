//! EVM Analyzer - Earned Value Management metrics and insights.
//!
//! This library provides the core functionality for the `evm` CLI tool:
//! loading a project, computing its EVM metrics, grading them into
//! insights, and exporting the result as a report.
//!
//! ```
//! use evm_analyzer::evm::{compute_metrics, generate_insights};
//! use evm_analyzer::models::sample_project;
//!
//! let project = sample_project();
//! let metrics = compute_metrics(&project);
//! let insights = generate_insights(&metrics, &project);
//! assert_eq!(insights.len(), 5);
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod evm;
pub mod export;
pub mod models;
pub mod sources;

/// Library-level error type for EVM analyzer operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for EVM analyzer operations.
pub type Result<T> = std::result::Result<T, Error>;
