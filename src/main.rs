//! EVM Analyzer CLI - Earned Value Management metrics and insights.

use clap::Parser;
use evm_analyzer::cli::{Cli, Commands, ConfigCommands};
use evm_analyzer::commands::{self, CommandResult};
use evm_analyzer::config::{ConfigOverrides, OutputFormat, config_path, resolve_config};
use std::process;
use std::time::Instant;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (e.g. `debug`, `evm_analyzer=info`).
const LOG_ENV: &str = "EVM_LOG";

fn main() {
    let cli = Cli::parse();
    init_logging();

    let start = Instant::now();
    let (human, result) = run(cli);
    debug!(duration_ms = start.elapsed().as_millis() as u64, "command finished");

    if let Err(e) = result {
        if human {
            eprintln!("Error: {}", e);
        } else {
            eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
        }
        process::exit(1);
    }
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Resolve config and run the command. Returns whether errors should be
/// reported in human-readable form alongside the outcome.
fn run(cli: Cli) -> (bool, Result<(), evm_analyzer::Error>) {
    let mut overrides = ConfigOverrides::new();
    if cli.human_readable {
        overrides = overrides.with_output_format(OutputFormat::Human);
    }
    if let Commands::Export {
        format: Some(format),
        ..
    } = cli.command
    {
        overrides = overrides.with_export_format(format);
    }

    let config = match resolve_config(cli.config_path.as_deref(), &overrides) {
        Ok(config) => config,
        Err(e) => return (cli.human_readable, Err(e)),
    };
    let human = config.human();

    let result = match cli.command {
        Commands::Sample => {
            output(&commands::sample(&config), human);
            Ok(())
        }

        Commands::Metrics { project } => {
            commands::metrics(&project.source(), &config).map(|r| output(&r, human))
        }

        Commands::Insights { project } => {
            commands::insights(&project.source(), &config).map(|r| output(&r, human))
        }

        Commands::Analyze { project } => {
            commands::analyze(&project.source(), &config).map(|r| output(&r, human))
        }

        Commands::Export {
            project, output: path, ..
        } => commands::export(&project.source(), &config, path.as_deref())
            .map(|r| output(&r, human)),

        Commands::Config { command } => match command {
            ConfigCommands::Show => {
                output(&commands::config_show(&config), human);
                Ok(())
            }
            ConfigCommands::Set { key, value } => match config_path(cli.config_path.as_deref()) {
                Some(path) => {
                    commands::config_set(&path, &key, &value).map(|r| output(&r, human))
                }
                None => Err(evm_analyzer::Error::Config(
                    "no config directory found; pass --config <path>".to_string(),
                )),
            },
        },
    };

    (human, result)
}

fn output<T: CommandResult>(result: &T, human: bool) {
    if human {
        println!("{}", result.to_human());
    } else {
        println!("{}", result.to_json());
    }
}
