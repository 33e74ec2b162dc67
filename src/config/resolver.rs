//! Precedence resolution for configuration.
//!
//! ## Config file location
//!
//! 1. `--config <path>` flag or `EVM_CONFIG` environment variable
//! 2. `<config dir>/evm-analyzer/config.kdl` (e.g. `~/.config/evm-analyzer/config.kdl`)
//!
//! A missing file is treated as empty.
//!
//! ## Value precedence (highest to lowest)
//!
//! 1. CLI flags (passed at runtime)
//! 2. config.kdl
//! 3. Built-in defaults

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::{EvmConfig, OutputFormat};
use crate::evm::format::DEFAULT_CURRENCY;
use crate::export::ExportFormat;
use crate::{Error, Result};

/// Environment variable naming an explicit config file.
pub const EVM_CONFIG_ENV: &str = "EVM_CONFIG";

/// Tracks where a resolved value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Value from CLI flag
    CliFlag,
    /// Value from a config file
    ConfigFile(PathBuf),
    /// Built-in default value
    Default,
}

impl std::fmt::Display for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueSource::CliFlag => write!(f, "cli"),
            ValueSource::ConfigFile(path) => write!(f, "file:{}", path.display()),
            ValueSource::Default => write!(f, "default"),
        }
    }
}

/// A resolved value with its source.
#[derive(Debug, Clone)]
pub struct Resolved<T> {
    /// The resolved value
    pub value: T,
    /// Where the value came from
    pub source: ValueSource,
}

impl<T> Resolved<T> {
    /// Create a new resolved value.
    pub fn new(value: T, source: ValueSource) -> Self {
        Self { value, source }
    }
}

/// Fully resolved configuration with source tracking.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Path of the config file consulted, if any location could be determined
    pub path: Option<PathBuf>,
    /// Output format preference
    pub output_format: Resolved<OutputFormat>,
    /// Export format preference
    pub export_format: Resolved<ExportFormat>,
    /// Currency symbol
    pub currency: Resolved<String>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            path: None,
            output_format: Resolved::new(OutputFormat::Json, ValueSource::Default),
            export_format: Resolved::new(ExportFormat::Text, ValueSource::Default),
            currency: Resolved::new(DEFAULT_CURRENCY.to_string(), ValueSource::Default),
        }
    }
}

impl ResolvedConfig {
    pub fn export_format(&self) -> ExportFormat {
        self.export_format.value
    }

    pub fn currency(&self) -> &str {
        &self.currency.value
    }

    /// True when output should be rendered for humans.
    pub fn human(&self) -> bool {
        self.output_format.value == OutputFormat::Human
    }
}

/// CLI overrides for configuration resolution.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Output format override from CLI flag
    pub output_format: Option<OutputFormat>,
    /// Export format override from CLI flag
    pub export_format: Option<ExportFormat>,
}

impl ConfigOverrides {
    /// Create empty overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set output format override.
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }

    /// Set export format override.
    pub fn with_export_format(mut self, format: ExportFormat) -> Self {
        self.export_format = Some(format);
        self
    }
}

/// Default config file location for the current user.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("evm-analyzer").join("config.kdl"))
}

/// Pick the config file to use: the explicit path if given, else the default.
pub fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    explicit.map(Path::to_path_buf).or_else(default_config_path)
}

/// Read config.kdl, returning an empty config when the file does not exist.
pub fn read_config(path: &Path) -> Result<EvmConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "config file not found, using defaults");
        return Ok(EvmConfig::new());
    }
    let content = fs::read_to_string(path)?;
    let doc: kdl::KdlDocument = content
        .parse()
        .map_err(|e| Error::Config(format!("failed to parse {}: {}", path.display(), e)))?;
    Ok(EvmConfig::from_kdl(&doc))
}

/// Write config.kdl, creating parent directories as needed.
pub fn write_config(path: &Path, config: &EvmConfig) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, config.to_kdl().to_string())?;
    Ok(())
}

/// Resolve configuration with full precedence chain.
///
/// Precedence (highest to lowest):
/// 1. CLI flags (from `overrides`)
/// 2. config.kdl at `explicit` or the default location
/// 3. Built-in defaults
pub fn resolve_config(
    explicit: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<ResolvedConfig> {
    let mut result = ResolvedConfig {
        path: config_path(explicit),
        ..ResolvedConfig::default()
    };

    let file_config = match result.path {
        Some(ref path) => read_config(path)?,
        None => EvmConfig::new(),
    };
    let file_source = || {
        result
            .path
            .clone()
            .map(ValueSource::ConfigFile)
            .unwrap_or(ValueSource::Default)
    };

    // Resolve output_format
    let output_format = if let Some(format) = overrides.output_format {
        Resolved::new(format, ValueSource::CliFlag)
    } else if let Some(format) = file_config.output_format {
        Resolved::new(format, file_source())
    } else {
        Resolved::new(OutputFormat::Json, ValueSource::Default)
    };

    // Resolve export_format
    let export_format = if let Some(format) = overrides.export_format {
        Resolved::new(format, ValueSource::CliFlag)
    } else if let Some(format) = file_config.export_format {
        Resolved::new(format, file_source())
    } else {
        Resolved::new(ExportFormat::Text, ValueSource::Default)
    };

    // Resolve currency (no CLI flag)
    let currency = match file_config.currency {
        Some(ref currency) => Resolved::new(currency.clone(), file_source()),
        None => Resolved::new(DEFAULT_CURRENCY.to_string(), ValueSource::Default),
    };

    result.output_format = output_format;
    result.export_format = export_format;
    result.currency = currency;
    Ok(result)
}
