//! KDL schema for config.kdl.
//!
//! This module provides:
//! - The [`EvmConfig`] struct representing the file
//! - Conversion to/from KDL documents
//! - Key-based updates used by `evm config set`

use kdl::{KdlDocument, KdlEntry, KdlNode, KdlValue};
use serde::{Deserialize, Serialize};

use crate::export::ExportFormat;

/// Output format preference for CLI commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON output (default, machine-readable)
    #[default]
    Json,
    /// Human-readable output
    Human,
}

impl OutputFormat {
    /// Parse from string, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "human" => Some(OutputFormat::Human),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Human => "human",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Keys accepted in config.kdl.
pub const CONFIG_KEYS: &[&str] = &["output-format", "export-format", "currency"];

/// User preferences stored in config.kdl.
///
/// # KDL Schema
///
/// ```kdl
/// output-format "human"  // or "json"
/// export-format "csv"    // text, csv or json
/// currency "€"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvmConfig {
    /// Default output format for CLI commands
    pub output_format: Option<OutputFormat>,

    /// Default format for `evm export`
    pub export_format: Option<ExportFormat>,

    /// Currency symbol used in human-readable amounts
    pub currency: Option<String>,
}

impl EvmConfig {
    /// Create an empty config with no values set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse config from a KDL document.
    ///
    /// Unknown nodes and invalid values are ignored.
    pub fn from_kdl(doc: &KdlDocument) -> Self {
        let mut config = Self::new();

        if let Some(s) = first_string(doc, "output-format") {
            config.output_format = OutputFormat::parse(s);
        }

        if let Some(s) = first_string(doc, "export-format") {
            config.export_format = ExportFormat::parse(s);
        }

        if let Some(s) = first_string(doc, "currency") {
            config.currency = Some(s.to_string());
        }

        config
    }

    /// Convert config to a KDL document.
    pub fn to_kdl(&self) -> KdlDocument {
        let mut doc = KdlDocument::new();

        if let Some(format) = self.output_format {
            push_string(&mut doc, "output-format", format.as_str());
        }

        if let Some(format) = self.export_format {
            push_string(&mut doc, "export-format", format.as_str());
        }

        if let Some(ref currency) = self.currency {
            push_string(&mut doc, "currency", currency);
        }

        doc
    }

    /// Set a value by its KDL key, validating it first.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "output-format" => {
                let format = OutputFormat::parse(value)
                    .ok_or_else(|| format!("output-format must be json or human, got {}", value))?;
                self.output_format = Some(format);
            }
            "export-format" => {
                let format = ExportFormat::parse(value).ok_or_else(|| {
                    format!("export-format must be text, csv or json, got {}", value)
                })?;
                self.export_format = Some(format);
            }
            "currency" => {
                if value.trim().is_empty() {
                    return Err("currency cannot be empty".to_string());
                }
                self.currency = Some(value.to_string());
            }
            other => {
                return Err(format!(
                    "unknown config key {} (expected one of: {})",
                    other,
                    CONFIG_KEYS.join(", ")
                ));
            }
        }
        Ok(())
    }
}

fn first_string<'a>(doc: &'a KdlDocument, name: &str) -> Option<&'a str> {
    doc.get(name)?.entries().first()?.value().as_string()
}

fn push_string(doc: &mut KdlDocument, name: &str, value: &str) {
    let mut node = KdlNode::new(name);
    node.push(KdlEntry::new(KdlValue::String(value.to_string())));
    doc.nodes_mut().push(node);
}
