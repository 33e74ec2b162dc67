//! Earned value metrics calculator.
//!
//! # Formulas
//!
//! | Metric | Formula |
//! |--------|---------|
//! | PV | budget × current_period / duration |
//! | EV | Σ planned × complete / 100 |
//! | AC | Σ actual |
//! | CV, SV | EV − AC, EV − PV |
//! | CPI, SPI | EV / AC, EV / PV (0 when the denominator is 0) |
//! | EAC | budget / CPI (budget when CPI is 0) |
//! | ETC, VAC | EAC − AC, budget − EAC |
//! | TCPI | (budget − EV) / (budget − AC), undefined when AC = budget |
//!
//! Intermediate values keep full precision; currency outputs are rounded to
//! whole units only when the [`Metrics`] record is assembled.
//!
//! # Example
//!
//! ```
//! use evm_analyzer::evm::compute_metrics;
//! use evm_analyzer::models::sample_project;
//!
//! let metrics = compute_metrics(&sample_project());
//! assert_eq!(metrics.pv, 50_000);
//! assert_eq!(metrics.ac, 55_500);
//! assert_eq!(metrics.cv, -5_500);
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::Project;

/// A point-in-time EVM snapshot of one project.
///
/// Currency figures are whole units. Ratios are kept at full precision and
/// rendered with two decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    /// Planned value
    pub pv: i64,
    /// Earned value
    pub ev: i64,
    /// Actual cost
    pub ac: i64,
    /// Cost variance
    pub cv: i64,
    /// Schedule variance
    pub sv: i64,
    /// Cost performance index
    pub cpi: f64,
    /// Schedule performance index
    pub spi: f64,
    /// Estimate at completion
    pub eac: i64,
    /// Estimate to complete
    pub etc: i64,
    /// Variance at completion
    pub vac: i64,
    /// To-complete performance index; `None` when the budget is fully spent
    pub tcpi: Option<f64>,
    /// Earned value as a percentage of budget
    pub percent_complete: i64,
    /// Elapsed periods as a percentage of duration
    pub percent_schedule: i64,
}

/// Compute the full metric set for a project.
///
/// The project is expected to have passed [`Project::validate`]; in
/// particular `duration` must be non-zero.
pub fn compute_metrics(project: &Project) -> Metrics {
    let budget = project.budget;

    let pv = budget * f64::from(project.current_period) / f64::from(project.duration);
    let ev: f64 = project.tasks.iter().map(|t| t.earned_value()).sum();
    let ac: f64 = project.tasks.iter().map(|t| t.actual).sum();

    let cv = ev - ac;
    let sv = ev - pv;

    let cpi = if ac > 0.0 { ev / ac } else { 0.0 };
    let spi = if pv > 0.0 { ev / pv } else { 0.0 };

    let eac = if cpi > 0.0 { budget / cpi } else { budget };
    let etc = eac - ac;
    let vac = budget - eac;

    let tcpi = to_complete_index(budget, ev, ac);

    let metrics = Metrics {
        pv: round_currency(pv),
        ev: round_currency(ev),
        ac: round_currency(ac),
        cv: round_currency(cv),
        sv: round_currency(sv),
        cpi,
        spi,
        eac: round_currency(eac),
        etc: round_currency(etc),
        vac: round_currency(vac),
        tcpi,
        percent_complete: (ev / budget * 100.0).round() as i64,
        percent_schedule: project.schedule_percent().round() as i64,
    };

    debug!(
        project = %project.name,
        pv = metrics.pv,
        ev = metrics.ev,
        ac = metrics.ac,
        cpi = metrics.cpi,
        spi = metrics.spi,
        "computed metrics"
    );

    metrics
}

/// Efficiency required on the remaining work to finish on budget.
///
/// Returns `None` when the actual cost equals the budget to the cent: there
/// is no remaining budget to divide the remaining work by. Summing
/// fractional costs leaves float residue, so the remainder is compared in
/// whole cents rather than exactly.
fn to_complete_index(budget: f64, ev: f64, ac: f64) -> Option<f64> {
    let remaining_budget = budget - ac;
    if (remaining_budget * 100.0).round() == 0.0 {
        warn!(budget, ac, "budget fully consumed, TCPI is undefined");
        return None;
    }
    Some((budget - ev) / remaining_budget)
}

fn round_currency(value: f64) -> i64 {
    value.round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Task, sample_project};

    fn project(budget: f64, duration: u32, current_period: u32, tasks: Vec<Task>) -> Project {
        Project {
            name: "Test".to_string(),
            budget,
            duration,
            current_period,
            tasks,
        }
    }

    #[test]
    fn test_sample_project_metrics() {
        let m = compute_metrics(&sample_project());
        assert_eq!(m.pv, 50_000);
        assert_eq!(m.ev, 50_000);
        assert_eq!(m.ac, 55_500);
        assert_eq!(m.cv, -5_500);
        assert_eq!(m.sv, 0);
        assert_eq!(format!("{:.2}", m.cpi), "0.90");
        assert_eq!(format!("{:.2}", m.spi), "1.00");
        assert_eq!(m.eac, 111_000);
        assert_eq!(m.etc, 55_500);
        assert_eq!(m.vac, -11_000);
        assert_eq!(m.percent_complete, 50);
        assert_eq!(m.percent_schedule, 50);
    }

    #[test]
    fn test_sample_project_tcpi() {
        let m = compute_metrics(&sample_project());
        let tcpi = m.tcpi.unwrap();
        // 50000 / 44500
        assert!((tcpi - 1.1236).abs() < 1e-4);
    }

    #[test]
    fn test_cpi_zero_when_no_actual_cost() {
        let p = project(1000.0, 10, 5, vec![Task::new(1, "A", 1000.0, 0.0, 40)]);
        let m = compute_metrics(&p);
        assert_eq!(m.ac, 0);
        assert_eq!(m.cpi, 0.0);
        // EAC falls back to budget when CPI is 0
        assert_eq!(m.eac, 1000);
        assert_eq!(m.vac, 0);
    }

    #[test]
    fn test_spi_zero_when_no_planned_value() {
        let p = project(1000.0, 10, 0, vec![Task::new(1, "A", 1000.0, 100.0, 10)]);
        let m = compute_metrics(&p);
        assert_eq!(m.pv, 0);
        assert_eq!(m.spi, 0.0);
        assert_eq!(m.percent_schedule, 0);
    }

    #[test]
    fn test_empty_project() {
        let p = project(5000.0, 5, 2, vec![]);
        let m = compute_metrics(&p);
        assert_eq!(m.ev, 0);
        assert_eq!(m.ac, 0);
        assert_eq!(m.cpi, 0.0);
        assert_eq!(m.spi, 0.0);
        assert_eq!(m.eac, 5000);
        assert_eq!(m.tcpi, Some(1.0));
    }

    #[test]
    fn test_fully_elapsed_project_pv_equals_budget() {
        let p = project(
            12_000.0,
            12,
            12,
            vec![Task::new(1, "A", 12_000.0, 12_500.0, 90)],
        );
        let m = compute_metrics(&p);
        assert_eq!(m.pv, 12_000);
        assert_eq!(m.percent_schedule, 100);
    }

    #[test]
    fn test_tcpi_undefined_when_actual_equals_budget() {
        let p = project(
            10_000.0,
            4,
            3,
            vec![
                Task::new(1, "A", 5_000.0, 6_000.0, 100),
                Task::new(2, "B", 5_000.0, 4_000.0, 20),
            ],
        );
        let m = compute_metrics(&p);
        assert_eq!(m.ac, 10_000);
        assert_eq!(m.tcpi, None);
    }

    #[test]
    fn test_tcpi_negative_when_over_budget() {
        let p = project(1000.0, 2, 1, vec![Task::new(1, "A", 1000.0, 1500.0, 50)]);
        let m = compute_metrics(&p);
        // (1000 - 500) / (1000 - 1500)
        assert_eq!(m.tcpi, Some(-1.0));
    }

    #[test]
    fn test_currency_rounding() {
        let p = project(
            1000.0,
            3,
            1,
            vec![Task::new(1, "A", 333.0, 100.4, 50), Task::new(2, "B", 1.0, 0.2, 50)],
        );
        let m = compute_metrics(&p);
        // PV = 333.33.., EV = 166.5 + 0.5 = 167, AC = 100.6
        assert_eq!(m.pv, 333);
        assert_eq!(m.ev, 167);
        assert_eq!(m.ac, 101);
    }

    #[test]
    fn test_ev_monotonic_in_complete_and_planned() {
        let mut last = -1.0;
        for complete in 0..=100u8 {
            let ev = Task::new(1, "A", 2500.0, 0.0, complete).earned_value();
            assert!(ev >= last);
            last = ev;
        }

        let mut last = -1.0;
        for planned in (0..10_000).step_by(250) {
            let ev = Task::new(1, "A", f64::from(planned), 0.0, 40).earned_value();
            assert!(ev >= last);
            last = ev;
        }
    }

    #[test]
    fn test_tcpi_undefined_when_cent_costs_sum_to_budget() {
        // 50.1 + 50.2 is not exactly 100.3 in binary floating point
        let p = project(
            100.3,
            10,
            5,
            vec![
                Task::new(1, "A", 50.1, 50.1, 100),
                Task::new(2, "B", 50.2, 50.2, 40),
            ],
        );
        let m = compute_metrics(&p);
        assert_eq!(m.tcpi, None);
        assert_eq!(m.ac, 100);
    }

    #[test]
    fn test_tcpi_defined_with_one_cent_left() {
        let p = project(100.0, 10, 5, vec![Task::new(1, "A", 100.0, 99.99, 50)]);
        let tcpi = compute_metrics(&p).tcpi.unwrap();
        assert!((tcpi - 5000.0).abs() < 1.0);
    }
}
