use csv::WriterBuilder;

use super::Report;
use crate::evm::format::format_ratio;
use crate::{Error, Result};

/// Render a report as flat CSV rows.
///
/// The first column names the section (`project`, `metric`, `insight`,
/// `task`). Sections have different widths, so the writer is flexible.
pub fn render(report: &Report) -> Result<String> {
    let mut wtr = WriterBuilder::new().flexible(true).from_writer(vec![]);

    wtr.write_record(["section", "field", "value"])?;

    let project = &report.project;
    wtr.write_record(["project", "name", project.name.as_str()])?;
    wtr.write_record(["project", "budget", &project.budget.to_string()])?;
    wtr.write_record(["project", "duration", &project.duration.to_string()])?;
    wtr.write_record([
        "project",
        "currentPeriod",
        &project.current_period.to_string(),
    ])?;
    wtr.write_record([
        "project",
        "generatedDate",
        &report.generated_date.to_rfc3339(),
    ])?;

    let m = &report.metrics;
    let metric_rows = [
        ("PV", m.pv.to_string()),
        ("EV", m.ev.to_string()),
        ("AC", m.ac.to_string()),
        ("CV", m.cv.to_string()),
        ("SV", m.sv.to_string()),
        ("CPI", format_ratio(m.cpi)),
        ("SPI", format_ratio(m.spi)),
        ("EAC", m.eac.to_string()),
        ("ETC", m.etc.to_string()),
        ("VAC", m.vac.to_string()),
        ("TCPI", m.tcpi.map(format_ratio).unwrap_or_default()),
        ("percentComplete", m.percent_complete.to_string()),
        ("percentSchedule", m.percent_schedule.to_string()),
    ];
    for (name, value) in &metric_rows {
        wtr.write_record(["metric", *name, value.as_str()])?;
    }

    wtr.write_record(["section", "category", "severity", "message", "recommendation"])?;
    for insight in &report.insights {
        wtr.write_record([
            "insight",
            insight.category.as_str(),
            insight.severity.as_str(),
            insight.message.as_str(),
            insight.recommendation.as_str(),
        ])?;
    }

    wtr.write_record(["section", "id", "name", "planned", "actual", "complete"])?;
    for task in &report.tasks {
        wtr.write_record([
            "task".to_string(),
            task.id.to_string(),
            task.name.clone(),
            task.planned.to_string(),
            task.actual.to_string(),
            task.complete.to_string(),
        ])?;
    }

    let data = wtr
        .into_inner()
        .map_err(|e| Error::Other(format!("CSV writer error: {}", e)))?;
    String::from_utf8(data).map_err(|e| Error::Other(format!("UTF-8 conversion error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evm::{compute_metrics, generate_insights};
    use crate::models::sample_project;
    use chrono::Utc;

    fn report() -> Report {
        let project = sample_project();
        let metrics = compute_metrics(&project);
        let insights = generate_insights(&metrics, &project);
        Report::from_parts(&project, metrics, insights, Utc::now())
    }

    #[test]
    fn test_csv_contains_every_metric() {
        let out = render(&report()).unwrap();
        for label in [
            "PV", "EV", "AC", "CV", "SV", "CPI", "SPI", "EAC", "ETC", "VAC", "TCPI",
        ] {
            assert!(
                out.lines().any(|l| l.starts_with(&format!("metric,{},", label))),
                "missing metric {}",
                label
            );
        }
        assert!(out.contains("metric,AC,55500"));
        assert!(out.contains("metric,CPI,0.90"));
    }

    #[test]
    fn test_csv_rows_parse_back() {
        let out = render(&report()).unwrap();
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(out.as_bytes());
        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();

        let insights: Vec<_> = rows.iter().filter(|r| &r[0] == "insight").collect();
        assert_eq!(insights.len(), 5);
        // Task names contain commas and ampersands; quoting must keep them intact
        assert_eq!(&insights[4][3], "Tasks behind schedule: Testing & QA, Deployment");

        let tasks: Vec<_> = rows.iter().filter(|r| &r[0] == "task").collect();
        assert_eq!(tasks.len(), 6);
        assert_eq!(&tasks[2][2], "Frontend Development");
        assert_eq!(&tasks[2][5], "75");
    }

    #[test]
    fn test_csv_undefined_tcpi_is_empty() {
        let mut r = report();
        r.metrics.tcpi = None;
        let out = render(&r).unwrap();
        assert!(out.lines().any(|l| l == "metric,TCPI,"));
    }
}
