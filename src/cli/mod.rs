//! CLI argument definitions for the EVM analyzer.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::EVM_CONFIG_ENV;
use crate::export::ExportFormat;
use crate::sources::{Platform, ProjectSource};

/// EVM Analyzer - Earned Value Management metrics for project status.
///
/// Start with `evm analyze` to see the sample project, then point
/// `--file` at your own project description.
#[derive(Parser, Debug)]
#[command(name = "evm")]
#[command(author, version, about = "Earned Value Management metrics and insights", long_about = None)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// Path to config.kdl (defaults to the user config directory)
    #[arg(long = "config", global = true, env = EVM_CONFIG_ENV)]
    pub config_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the built-in sample project
    Sample,

    /// Compute EVM metrics (PV, EV, AC, CPI, SPI, EAC, ...)
    Metrics {
        #[command(flatten)]
        project: ProjectArgs,
    },

    /// Grade metrics into cost, schedule, and task insights
    Insights {
        #[command(flatten)]
        project: ProjectArgs,
    },

    /// Project summary, metrics, and insights in one report
    Analyze {
        #[command(flatten)]
        project: ProjectArgs,
    },

    /// Export the report as text, CSV, or JSON
    Export {
        #[command(flatten)]
        project: ProjectArgs,

        /// Report format (defaults to the configured export-format)
        #[arg(long, value_enum)]
        format: Option<ExportFormat>,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Where to load the project from. Defaults to the sample project.
#[derive(Args, Debug, Clone, Default)]
pub struct ProjectArgs {
    /// Project description file (.json or .toml)
    #[arg(short, long, conflicts_with = "connect")]
    pub file: Option<PathBuf>,

    /// Connect to a project management platform
    #[arg(long, value_enum)]
    pub connect: Option<Platform>,

    /// API key for --connect
    #[arg(long, env = "EVM_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
}

impl ProjectArgs {
    /// Translate the flags into a project source.
    pub fn source(&self) -> ProjectSource {
        if let Some(ref path) = self.file {
            ProjectSource::File(path.clone())
        } else if let Some(platform) = self.connect {
            ProjectSource::Connector {
                platform,
                api_key: self.api_key.clone().unwrap_or_default(),
            }
        } else {
            ProjectSource::Sample
        }
    }
}

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show resolved settings and where each came from
    Show,

    /// Set a value in config.kdl
    Set {
        /// Key: output-format, export-format, or currency
        key: String,

        /// New value
        value: String,
    },
}
