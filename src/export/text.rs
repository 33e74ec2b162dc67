use std::fmt::Write;

use super::Report;
use crate::evm::format::{format_currency, format_optional_ratio, format_ratio};

/// Render a report as labelled plain-text sections.
pub fn render(report: &Report, currency: &str) -> String {
    let money = |amount: i64| format_currency(amount, currency);
    let project = &report.project;
    let m = &report.metrics;
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(out, "EVM ANALYSIS REPORT");
    let _ = writeln!(out, "===================");
    let _ = writeln!(out, "Project: {}", project.name);
    let _ = writeln!(
        out,
        "Generated: {}",
        report.generated_date.format("%Y-%m-%d %H:%M:%S UTC")
    );
    let _ = writeln!(out, "Budget: {}", money(project.budget.round() as i64));
    let _ = writeln!(
        out,
        "Schedule: period {} of {}",
        project.current_period, project.duration
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "KEY METRICS");
    let _ = writeln!(out, "-----------");
    let _ = writeln!(out, "Planned Value (PV):     {}", money(m.pv));
    let _ = writeln!(out, "Earned Value (EV):      {}", money(m.ev));
    let _ = writeln!(out, "Actual Cost (AC):       {}", money(m.ac));
    let _ = writeln!(out, "Cost Variance (CV):     {}", money(m.cv));
    let _ = writeln!(out, "Schedule Variance (SV): {}", money(m.sv));
    let _ = writeln!(out, "CPI:                    {}", format_ratio(m.cpi));
    let _ = writeln!(out, "SPI:                    {}", format_ratio(m.spi));
    let _ = writeln!(out, "EAC:                    {}", money(m.eac));
    let _ = writeln!(out, "ETC:                    {}", money(m.etc));
    let _ = writeln!(out, "VAC:                    {}", money(m.vac));
    let _ = writeln!(out, "TCPI:                   {}", format_optional_ratio(m.tcpi));
    let _ = writeln!(out, "Percent Complete:       {}%", m.percent_complete);
    let _ = writeln!(out, "Percent Schedule:       {}%", m.percent_schedule);
    let _ = writeln!(out);

    let _ = writeln!(out, "INSIGHTS");
    let _ = writeln!(out, "--------");
    if report.insights.is_empty() {
        let _ = writeln!(out, "(none)");
    }
    for insight in &report.insights {
        let _ = writeln!(
            out,
            "[{}] {}: {}",
            insight.severity.as_str().to_uppercase(),
            insight.category,
            insight.message
        );
        let _ = writeln!(out, "  Recommendation: {}", insight.recommendation);
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "TASKS");
    let _ = writeln!(out, "-----");
    for task in &report.tasks {
        let _ = writeln!(
            out,
            "{}. {} - planned {}, actual {}, {}% complete",
            task.id,
            task.name,
            money(task.planned.round() as i64),
            money(task.actual.round() as i64),
            task.complete
        );
    }

    out
}
