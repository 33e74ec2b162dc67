//! Report export in text, CSV, and JSON formats.
//!
//! A [`Report`] bundles everything a reader needs about one analysis run:
//! the project header, when the report was generated, the metrics, the
//! insights, and the task list. Each format carries the same field set.

mod csv;
mod text;

use std::fmt;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::evm::{Insight, Metrics, compute_metrics, generate_insights_with_currency};
use crate::models::{Project, ProjectSummary, Task};
use crate::{Error, Result};

/// Output format for exported reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Human-readable labelled sections
    #[default]
    Text,
    /// Flat comma-separated rows
    Csv,
    /// Nested JSON object
    Json,
}

impl ExportFormat {
    /// Parse from string, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(ExportFormat::Text),
            "csv" => Some(ExportFormat::Csv),
            "json" => Some(ExportFormat::Json),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Text => "text",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    /// File extension used for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Text => "txt",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A complete analysis of one project, ready for export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub project: ProjectSummary,
    pub generated_date: DateTime<Utc>,
    pub metrics: Metrics,
    pub insights: Vec<Insight>,
    pub tasks: Vec<Task>,
}

impl Report {
    /// Run the engine over a project and stamp the result with the current time.
    pub fn generate(project: &Project, currency: &str) -> Self {
        let metrics = compute_metrics(project);
        let insights = generate_insights_with_currency(&metrics, project, currency);
        Self::from_parts(project, metrics, insights, Utc::now())
    }

    /// Assemble a report from already computed parts.
    pub fn from_parts(
        project: &Project,
        metrics: Metrics,
        insights: Vec<Insight>,
        generated_date: DateTime<Utc>,
    ) -> Self {
        Self {
            project: project.summary(),
            generated_date,
            metrics,
            insights,
            tasks: project.tasks.clone(),
        }
    }

    /// Parse a report previously exported as JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Render the report in the requested format.
    pub fn render(&self, format: ExportFormat, currency: &str) -> Result<String> {
        match format {
            ExportFormat::Text => Ok(text::render(self, currency)),
            ExportFormat::Csv => csv::render(self),
            ExportFormat::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }

    /// Default download file name, e.g. `website-redesign-project-evm-report.csv`.
    pub fn default_file_name(&self, format: ExportFormat) -> String {
        format!(
            "{}-evm-report.{}",
            slugify(&self.project.name),
            format.extension()
        )
    }

    /// Render and write the report to `path`, returning the number of bytes written.
    pub fn write_to(&self, path: &Path, format: ExportFormat, currency: &str) -> Result<usize> {
        let content = self.render(format, currency)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                return Err(Error::InvalidInput(format!(
                    "output directory does not exist: {}",
                    parent.display()
                )));
            }
        }
        fs::write(path, &content)?;
        info!(path = %path.display(), %format, bytes = content.len(), "exported report");
        Ok(content.len())
    }
}

fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "project".to_string()
    } else {
        slug.to_string()
    }
}
