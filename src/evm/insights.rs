//! Threshold rules that turn metrics into actionable insights.
//!
//! Rules run in a fixed order and each one is independent:
//!
//! 1. **Cost** - always one insight, graded on CPI
//! 2. **Schedule** - always one insight, graded on SPI
//! 3. **Forecast** - only when VAC is negative
//! 4. **Performance** - only when TCPI demands more than 110% efficiency
//! 5. **Tasks** - only when some tasks lag the schedule by more than 10 points
//!
//! The output order is the rule order.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::format::{DEFAULT_CURRENCY, format_currency, format_ratio, round_ratio};
use super::metrics::Metrics;
use crate::models::Project;

/// Thresholds for insight grading.
pub mod thresholds {
    /// Index below which cost or schedule performance is critical.
    pub const INDEX_CRITICAL: f64 = 0.9;

    /// Index at or above which cost or schedule performance is healthy.
    pub const INDEX_HEALTHY: f64 = 1.0;

    /// Overrun (negative VAC) beyond which the forecast is critical.
    pub const VAC_CRITICAL: i64 = -10_000;

    /// TCPI above which finishing on budget is considered unrealistic.
    pub const TCPI_CRITICAL: f64 = 1.1;

    /// Percentage points a task may trail the schedule before it is flagged.
    pub const TASK_LAG_TOLERANCE: f64 = 10.0;
}

/// Area of project health an insight refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Cost,
    Schedule,
    Forecast,
    Performance,
    Tasks,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Cost => "Cost",
            Category::Schedule => "Schedule",
            Category::Forecast => "Forecast",
            Category::Performance => "Performance",
            Category::Tasks => "Tasks",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How urgently an insight needs attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Success,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Warning => "warning",
            Severity::Success => "success",
        }
    }

    /// Grade a performance index against the shared thresholds.
    ///
    /// The index is graded as displayed, rounded to two decimals.
    fn for_index(index: f64) -> Self {
        let index = round_ratio(index);
        if index < thresholds::INDEX_CRITICAL {
            Severity::Critical
        } else if index < thresholds::INDEX_HEALTHY {
            Severity::Warning
        } else {
            Severity::Success
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A finding about the project with a suggested course of action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    pub category: Category,
    pub severity: Severity,
    pub message: String,
    pub recommendation: String,
}

impl Insight {
    fn new(
        category: Category,
        severity: Severity,
        message: String,
        recommendation: &str,
    ) -> Self {
        Self {
            category,
            severity,
            message,
            recommendation: recommendation.to_string(),
        }
    }
}

/// Generate insights using the default currency symbol in messages.
pub fn generate_insights(metrics: &Metrics, project: &Project) -> Vec<Insight> {
    generate_insights_with_currency(metrics, project, DEFAULT_CURRENCY)
}

/// Generate insights, formatting amounts with the given currency symbol.
pub fn generate_insights_with_currency(
    metrics: &Metrics,
    project: &Project,
    currency: &str,
) -> Vec<Insight> {
    let mut insights = vec![cost_insight(metrics), schedule_insight(metrics)];
    insights.extend(forecast_insight(metrics, currency));
    insights.extend(performance_insight(metrics, project));
    insights.extend(task_insight(project));
    insights
}

fn cost_insight(metrics: &Metrics) -> Insight {
    let cpi = format_ratio(metrics.cpi);
    match Severity::for_index(metrics.cpi) {
        Severity::Critical => Insight::new(
            Category::Cost,
            Severity::Critical,
            format!("Project is significantly over budget (CPI: {})", cpi),
            "Review spending on in-flight tasks, freeze non-essential costs, and \
             re-baseline the budget with stakeholders.",
        ),
        Severity::Warning => Insight::new(
            Category::Cost,
            Severity::Warning,
            format!("Project is slightly over budget (CPI: {})", cpi),
            "Monitor costs closely and look for efficiencies before the overrun grows.",
        ),
        Severity::Success => Insight::new(
            Category::Cost,
            Severity::Success,
            format!("Project is on or under budget (CPI: {})", cpi),
            "Keep current cost controls in place.",
        ),
    }
}

fn schedule_insight(metrics: &Metrics) -> Insight {
    let spi = format_ratio(metrics.spi);
    match Severity::for_index(metrics.spi) {
        Severity::Critical => Insight::new(
            Category::Schedule,
            Severity::Critical,
            format!("Project is significantly behind schedule (SPI: {})", spi),
            "Re-sequence critical path work, add resources where possible, or \
             negotiate revised milestones.",
        ),
        Severity::Warning => Insight::new(
            Category::Schedule,
            Severity::Warning,
            format!("Project is slightly behind schedule (SPI: {})", spi),
            "Track upcoming milestones closely and remove blockers early.",
        ),
        Severity::Success => Insight::new(
            Category::Schedule,
            Severity::Success,
            format!("Project is on or ahead of schedule (SPI: {})", spi),
            "Maintain the current pace and keep the plan up to date.",
        ),
    }
}

fn forecast_insight(metrics: &Metrics, currency: &str) -> Option<Insight> {
    if metrics.vac >= 0 {
        return None;
    }

    let overrun = format_currency(metrics.vac.saturating_neg(), currency);
    let insight = if metrics.vac < thresholds::VAC_CRITICAL {
        Insight::new(
            Category::Forecast,
            Severity::Critical,
            format!("Projected to finish {} over budget", overrun),
            "Escalate to the project sponsor and prepare a recovery plan or \
             budget change request.",
        )
    } else {
        Insight::new(
            Category::Forecast,
            Severity::Warning,
            format!("Projected to finish {} over budget", overrun),
            "Identify scope or cost reductions to absorb the projected overrun.",
        )
    };
    Some(insight)
}

fn performance_insight(metrics: &Metrics, project: &Project) -> Option<Insight> {
    match metrics.tcpi.map(round_ratio) {
        Some(tcpi) if tcpi > thresholds::TCPI_CRITICAL => Some(Insight::new(
            Category::Performance,
            Severity::Critical,
            format!(
                "Remaining work must be done at {:.0}% efficiency to stay on budget (TCPI: {})",
                tcpi * 100.0,
                format_ratio(tcpi)
            ),
            "Meeting the original budget is unlikely; re-forecast the estimate at \
             completion and agree a new target.",
        )),
        Some(_) => None,
        // Budget fully spent: any outstanding work cannot be finished on budget.
        None if metrics.ev < project.budget.round() as i64 => Some(Insight::new(
            Category::Performance,
            Severity::Critical,
            "Budget is fully spent with work still remaining (TCPI: N/A)".to_string(),
            "Meeting the original budget is no longer possible; secure additional \
             funding or reduce the remaining scope.",
        )),
        None => None,
    }
}

fn task_insight(project: &Project) -> Option<Insight> {
    let cutoff = project.schedule_percent() - thresholds::TASK_LAG_TOLERANCE;
    let lagging: Vec<&str> = project
        .tasks
        .iter()
        .filter(|t| f64::from(t.complete) < cutoff)
        .map(|t| t.name.as_str())
        .collect();

    if lagging.is_empty() {
        return None;
    }

    Some(Insight::new(
        Category::Tasks,
        Severity::Warning,
        format!("Tasks behind schedule: {}", lagging.join(", ")),
        "Review the lagging tasks with their owners, reallocate resources, and \
         update their plans to recover the schedule.",
    ))
}
