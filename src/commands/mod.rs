//! Command implementations for the EVM analyzer CLI.
//!
//! Each command loads what it needs, runs the engine, and returns a result
//! struct implementing [`CommandResult`], so `main` can print it as JSON or text.

use std::fmt::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::Result;
use crate::config::{CONFIG_KEYS, ResolvedConfig, read_config, write_config};
use crate::evm::format::{format_currency, format_optional_ratio, format_ratio};
use crate::evm::{Insight, Metrics, compute_metrics, generate_insights_with_currency};
use crate::export::{ExportFormat, Report};
use crate::models::{Project, sample_project};
use crate::sources::ProjectSource;

/// Command results that can be serialized to JSON or formatted for humans.
pub trait CommandResult {
    /// Serialize to JSON string.
    fn to_json(&self) -> String;

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

fn json_or_error<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() }).to_string())
}

/// Result of `evm sample`.
#[derive(Debug)]
pub struct SampleResult {
    pub project: Project,
    currency: String,
}

impl CommandResult for SampleResult {
    fn to_json(&self) -> String {
        json_or_error(&self.project)
    }

    fn to_human(&self) -> String {
        let p = &self.project;
        let mut out = format!(
            "{}\n  Budget: {}\n  Period {} of {}\n  {} tasks:\n",
            p.name,
            format_currency(p.budget.round() as i64, &self.currency),
            p.current_period,
            p.duration,
            p.tasks.len()
        );
        for task in &p.tasks {
            let _ = writeln!(out, "    {}. {} ({}%)", task.id, task.name, task.complete);
        }
        out.trim_end().to_string()
    }
}

/// Print the built-in sample project.
pub fn sample(config: &ResolvedConfig) -> SampleResult {
    SampleResult {
        project: sample_project(),
        currency: config.currency().to_string(),
    }
}

/// Result of `evm metrics`.
#[derive(Debug, Serialize)]
pub struct MetricsResult {
    pub project: String,
    pub metrics: Metrics,
    #[serde(skip)]
    currency: String,
}

impl CommandResult for MetricsResult {
    fn to_json(&self) -> String {
        json_or_error(self)
    }

    fn to_human(&self) -> String {
        format!("{}\n{}", self.project, metrics_table(&self.metrics, &self.currency))
    }
}

/// Compute metrics for the project from `source`.
pub fn metrics(source: &ProjectSource, config: &ResolvedConfig) -> Result<MetricsResult> {
    let project = source.load()?;
    Ok(MetricsResult {
        project: project.name.clone(),
        metrics: compute_metrics(&project),
        currency: config.currency().to_string(),
    })
}

/// Result of `evm insights`.
#[derive(Debug, Serialize)]
pub struct InsightsResult {
    pub project: String,
    pub count: usize,
    pub insights: Vec<Insight>,
}

impl CommandResult for InsightsResult {
    fn to_json(&self) -> String {
        json_or_error(self)
    }

    fn to_human(&self) -> String {
        format!(
            "{}: {} insight(s)\n{}",
            self.project,
            self.count,
            insight_lines(&self.insights)
        )
    }
}

/// Generate insights for the project from `source`.
pub fn insights(source: &ProjectSource, config: &ResolvedConfig) -> Result<InsightsResult> {
    let project = source.load()?;
    let metrics = compute_metrics(&project);
    let insights = generate_insights_with_currency(&metrics, &project, config.currency());
    Ok(InsightsResult {
        project: project.name,
        count: insights.len(),
        insights,
    })
}

/// Result of `evm analyze`.
#[derive(Debug, Serialize)]
pub struct AnalyzeResult {
    #[serde(flatten)]
    pub report: Report,
    #[serde(skip)]
    currency: String,
}

impl CommandResult for AnalyzeResult {
    fn to_json(&self) -> String {
        json_or_error(self)
    }

    fn to_human(&self) -> String {
        let r = &self.report;
        format!(
            "{} (period {} of {})\n\nMetrics:\n{}\n\nInsights:\n{}",
            r.project.name,
            r.project.current_period,
            r.project.duration,
            metrics_table(&r.metrics, &self.currency),
            insight_lines(&r.insights)
        )
    }
}

/// Full analysis: project summary, metrics, insights, and tasks.
pub fn analyze(source: &ProjectSource, config: &ResolvedConfig) -> Result<AnalyzeResult> {
    let project = source.load()?;
    Ok(AnalyzeResult {
        report: Report::generate(&project, config.currency()),
        currency: config.currency().to_string(),
    })
}

/// Result of `evm export`.
#[derive(Debug)]
pub enum ExportResult {
    /// Report rendered for stdout
    Rendered(String),
    /// Report written to a file
    Written(ExportWritten),
}

#[derive(Debug, Serialize)]
pub struct ExportWritten {
    pub path: PathBuf,
    pub format: ExportFormat,
    pub bytes: usize,
}

impl CommandResult for ExportResult {
    fn to_json(&self) -> String {
        match self {
            // The rendered report is already in its requested format
            ExportResult::Rendered(content) => content.trim_end().to_string(),
            ExportResult::Written(written) => json_or_error(written),
        }
    }

    fn to_human(&self) -> String {
        match self {
            ExportResult::Rendered(content) => content.trim_end().to_string(),
            ExportResult::Written(w) => format!(
                "Exported {} report to {} ({} bytes)",
                w.format,
                w.path.display(),
                w.bytes
            ),
        }
    }
}

/// Render a report, writing it to `output` when given.
///
/// The format falls back to the configured export format.
pub fn export(
    source: &ProjectSource,
    config: &ResolvedConfig,
    output: Option<&Path>,
) -> Result<ExportResult> {
    let project = source.load()?;
    let report = Report::generate(&project, config.currency());
    let format = config.export_format();

    match output {
        Some(path) => {
            let bytes = report.write_to(path, format, config.currency())?;
            Ok(ExportResult::Written(ExportWritten {
                path: path.to_path_buf(),
                format,
                bytes,
            }))
        }
        None => Ok(ExportResult::Rendered(
            report.render(format, config.currency())?,
        )),
    }
}

/// Result of `evm config show`.
#[derive(Debug, Serialize)]
pub struct ConfigShowResult {
    pub path: Option<PathBuf>,
    pub settings: Vec<ConfigSetting>,
}

#[derive(Debug, Serialize)]
pub struct ConfigSetting {
    pub key: &'static str,
    pub value: String,
    pub source: String,
}

impl CommandResult for ConfigShowResult {
    fn to_json(&self) -> String {
        json_or_error(self)
    }

    fn to_human(&self) -> String {
        let mut out = match self.path {
            Some(ref path) => format!("Config file: {}\n", path.display()),
            None => "Config file: (none)\n".to_string(),
        };
        for s in &self.settings {
            let _ = writeln!(out, "  {} = {} ({})", s.key, s.value, s.source);
        }
        out.trim_end().to_string()
    }
}

/// Show the resolved configuration and where each value came from.
pub fn config_show(config: &ResolvedConfig) -> ConfigShowResult {
    ConfigShowResult {
        path: config.path.clone(),
        settings: vec![
            ConfigSetting {
                key: CONFIG_KEYS[0],
                value: config.output_format.value.to_string(),
                source: config.output_format.source.to_string(),
            },
            ConfigSetting {
                key: CONFIG_KEYS[1],
                value: config.export_format.value.to_string(),
                source: config.export_format.source.to_string(),
            },
            ConfigSetting {
                key: CONFIG_KEYS[2],
                value: config.currency.value.clone(),
                source: config.currency.source.to_string(),
            },
        ],
    }
}

/// Result of `evm config set`.
#[derive(Debug, Serialize)]
pub struct ConfigSetResult {
    pub path: PathBuf,
    pub key: String,
    pub value: String,
}

impl CommandResult for ConfigSetResult {
    fn to_json(&self) -> String {
        json_or_error(self)
    }

    fn to_human(&self) -> String {
        format!("Set {} = {} in {}", self.key, self.value, self.path.display())
    }
}

/// Update one key in config.kdl, keeping the other values.
pub fn config_set(path: &Path, key: &str, value: &str) -> Result<ConfigSetResult> {
    let mut config = read_config(path)?;
    config.set(key, value).map_err(crate::Error::InvalidInput)?;
    write_config(path, &config)?;
    Ok(ConfigSetResult {
        path: path.to_path_buf(),
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn metrics_table(m: &Metrics, currency: &str) -> String {
    let money = |amount: i64| format_currency(amount, currency);
    let rows = [
        ("PV", money(m.pv)),
        ("EV", money(m.ev)),
        ("AC", money(m.ac)),
        ("CV", money(m.cv)),
        ("SV", money(m.sv)),
        ("CPI", format_ratio(m.cpi)),
        ("SPI", format_ratio(m.spi)),
        ("EAC", money(m.eac)),
        ("ETC", money(m.etc)),
        ("VAC", money(m.vac)),
        ("TCPI", format_optional_ratio(m.tcpi)),
        ("Complete", format!("{}%", m.percent_complete)),
        ("Schedule", format!("{}%", m.percent_schedule)),
    ];
    rows.iter()
        .map(|(label, value)| format!("  {:<9} {}", label, value))
        .collect::<Vec<_>>()
        .join("\n")
}

fn insight_lines(insights: &[Insight]) -> String {
    insights
        .iter()
        .map(|i| {
            format!(
                "  [{}] {}: {}\n      -> {}",
                i.severity, i.category, i.message, i.recommendation
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigOverrides, resolve_config};
    use tempfile::TempDir;

    fn config(dir: &TempDir) -> ResolvedConfig {
        resolve_config(
            Some(&dir.path().join("config.kdl")),
            &ConfigOverrides::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_sample_command() {
        let dir = TempDir::new().unwrap();
        let result = sample(&config(&dir));
        let value: serde_json::Value = serde_json::from_str(&result.to_json()).unwrap();
        assert_eq!(value["budget"], 100_000.0);
        assert!(result.to_human().contains("Budget: $100,000"));
    }

    #[test]
    fn test_metrics_command_json() {
        let dir = TempDir::new().unwrap();
        let result = metrics(&ProjectSource::Sample, &config(&dir)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&result.to_json()).unwrap();
        assert_eq!(value["metrics"]["ac"], 55_500);
        assert!(value.get("currency").is_none());
    }

    #[test]
    fn test_metrics_command_human() {
        let dir = TempDir::new().unwrap();
        let human = metrics(&ProjectSource::Sample, &config(&dir))
            .unwrap()
            .to_human();
        assert!(human.contains("  AC        $55,500"));
        assert!(human.contains("  CPI       0.90"));
    }

    #[test]
    fn test_insights_command() {
        let dir = TempDir::new().unwrap();
        let result = insights(&ProjectSource::Sample, &config(&dir)).unwrap();
        assert_eq!(result.count, 5);
        assert!(result.to_human().contains("[critical] Forecast"));
    }

    #[test]
    fn test_analyze_json_is_flat_report() {
        let dir = TempDir::new().unwrap();
        let result = analyze(&ProjectSource::Sample, &config(&dir)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&result.to_json()).unwrap();
        for key in ["project", "generatedDate", "metrics", "insights", "tasks"] {
            assert!(value.get(key).is_some(), "missing key {}", key);
        }
    }

    #[test]
    fn test_export_to_stdout_uses_configured_format() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.kdl");
        fs_write(&path, "export-format \"csv\"\n");
        let cfg = resolve_config(Some(&path), &ConfigOverrides::new()).unwrap();

        let result = export(&ProjectSource::Sample, &cfg, None).unwrap();
        assert!(result.to_json().starts_with("section,field,value"));
    }

    #[test]
    fn test_export_to_file() {
        let dir = TempDir::new().unwrap();
        let cfg = resolve_config(
            Some(&dir.path().join("config.kdl")),
            &ConfigOverrides::new().with_export_format(ExportFormat::Json),
        )
        .unwrap();
        let out = dir.path().join("report.json");

        let result = export(&ProjectSource::Sample, &cfg, Some(&out)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&result.to_json()).unwrap();
        assert_eq!(value["format"], "json");
        let written = std::fs::read_to_string(&out).unwrap();
        assert!(Report::from_json(&written).is_ok());
    }

    #[test]
    fn test_config_set_and_show() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.kdl");
        config_set(&path, "currency", "€").unwrap();
        config_set(&path, "output-format", "human").unwrap();

        let cfg = resolve_config(Some(&path), &ConfigOverrides::new()).unwrap();
        let shown = config_show(&cfg);
        assert_eq!(shown.settings[0].value, "human");
        assert_eq!(shown.settings[1].source, "default");
        assert_eq!(shown.settings[2].value, "€");
    }

    #[test]
    fn test_config_set_unknown_key() {
        let dir = TempDir::new().unwrap();
        let err = config_set(&dir.path().join("config.kdl"), "editor", "vim").unwrap_err();
        assert!(matches!(err, crate::Error::InvalidInput(_)));
    }

    #[test]
    fn test_export_to_missing_directory_errors() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("no").join("such").join("report.txt");
        let err = export(&ProjectSource::Sample, &config(&dir), Some(&out)).unwrap_err();
        assert!(err.to_string().contains("output directory does not exist"));
    }

    #[test]
    fn test_results_are_debug() {
        let dir = TempDir::new().unwrap();
        let cfg = config(&dir);
        let shown = format!("{:?}", config_show(&cfg));
        assert!(shown.contains("ConfigShowResult"));
        let sampled = format!("{:?}", sample(&cfg));
        assert!(sampled.contains("SampleResult"));
        let measured = format!("{:?}", metrics(&ProjectSource::Sample, &cfg).unwrap());
        assert!(measured.contains("MetricsResult"));
    }

    fn fs_write(path: &Path, content: &str) {
        std::fs::write(path, content).unwrap();
    }
}
