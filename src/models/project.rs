//! Project and task records consumed by the EVM engine.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A single unit of work with its budget, spend, and progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Identifier, unique within the owning project
    pub id: u32,

    /// Display name
    pub name: String,

    /// Budget allocated to this task
    pub planned: f64,

    /// Amount spent so far
    pub actual: f64,

    /// Percentage complete (0-100)
    pub complete: u8,
}

impl Task {
    /// Create a new task.
    pub fn new(id: u32, name: impl Into<String>, planned: f64, actual: f64, complete: u8) -> Self {
        Self {
            id,
            name: name.into(),
            planned,
            actual,
            complete,
        }
    }

    /// Budgeted cost of the work this task has completed.
    pub fn earned_value(&self) -> f64 {
        self.planned * f64::from(self.complete) / 100.0
    }
}

/// A project snapshot at one reporting period.
///
/// Projects are replaced wholesale whenever a new one is loaded; nothing
/// mutates a project after validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Project name
    pub name: String,

    /// Total approved budget (budget at completion)
    pub budget: f64,

    /// Planned duration in periods
    pub duration: u32,

    /// Periods elapsed so far (0..=duration)
    pub current_period: u32,

    /// Tasks in display order
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Project {
    /// Check the structural invariants the engine relies on.
    ///
    /// Every project source calls this before handing a project out, so the
    /// calculator never has to deal with a zero duration or a negative budget.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidInput("project name cannot be empty".to_string()));
        }
        if !self.budget.is_finite() || self.budget <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "budget must be a positive amount, got {}",
                self.budget
            )));
        }
        if self.duration == 0 {
            return Err(Error::InvalidInput(
                "duration must be at least one period".to_string(),
            ));
        }
        if self.current_period > self.duration {
            return Err(Error::InvalidInput(format!(
                "current period {} exceeds duration {}",
                self.current_period, self.duration
            )));
        }

        let mut seen = HashSet::new();
        for task in &self.tasks {
            if !seen.insert(task.id) {
                return Err(Error::InvalidInput(format!("duplicate task id {}", task.id)));
            }
            if !task.planned.is_finite() || task.planned < 0.0 {
                return Err(Error::InvalidInput(format!(
                    "task {} planned value must be non-negative, got {}",
                    task.id, task.planned
                )));
            }
            if !task.actual.is_finite() || task.actual < 0.0 {
                return Err(Error::InvalidInput(format!(
                    "task {} actual cost must be non-negative, got {}",
                    task.id, task.actual
                )));
            }
            if task.complete > 100 {
                return Err(Error::InvalidInput(format!(
                    "task {} completion must be 0-100, got {}",
                    task.id, task.complete
                )));
            }
        }

        Ok(())
    }

    /// Fraction of the schedule elapsed, as a percentage.
    pub fn schedule_percent(&self) -> f64 {
        f64::from(self.current_period) / f64::from(self.duration) * 100.0
    }

    /// Project summary without the task list.
    pub fn summary(&self) -> ProjectSummary {
        ProjectSummary {
            name: self.name.clone(),
            budget: self.budget,
            duration: self.duration,
            current_period: self.current_period,
            task_count: self.tasks.len(),
        }
    }
}

/// Header-level view of a project, used in reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub name: String,
    pub budget: f64,
    pub duration: u32,
    pub current_period: u32,
    pub task_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project() -> Project {
        Project {
            name: "Test".to_string(),
            budget: 1000.0,
            duration: 4,
            current_period: 2,
            tasks: vec![
                Task::new(1, "A", 500.0, 200.0, 50),
                Task::new(2, "B", 500.0, 0.0, 0),
            ],
        }
    }

    #[test]
    fn test_valid_project_passes() {
        assert!(project().validate().is_ok());
    }

    #[test]
    fn test_zero_budget_rejected() {
        let mut p = project();
        p.budget = 0.0;
        assert!(matches!(p.validate(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_nan_budget_rejected() {
        let mut p = project();
        p.budget = f64::NAN;
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_zero_duration_rejected() {
        let mut p = project();
        p.duration = 0;
        p.current_period = 0;
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_current_period_past_duration_rejected() {
        let mut p = project();
        p.current_period = 5;
        let err = p.validate().unwrap_err();
        assert!(err.to_string().contains("exceeds duration"));
    }

    #[test]
    fn test_current_period_equal_to_duration_allowed() {
        let mut p = project();
        p.current_period = 4;
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_duplicate_task_id_rejected() {
        let mut p = project();
        p.tasks[1].id = 1;
        let err = p.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate task id 1"));
    }

    #[test]
    fn test_negative_actual_rejected() {
        let mut p = project();
        p.tasks[0].actual = -1.0;
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_completion_over_100_rejected() {
        let mut p = project();
        p.tasks[0].complete = 101;
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_task_earned_value() {
        let task = Task::new(1, "A", 20000.0, 0.0, 75);
        assert_eq!(task.earned_value(), 15000.0);
    }

    #[test]
    fn test_project_json_uses_camel_case() {
        let json = serde_json::to_value(project()).unwrap();
        assert_eq!(json["currentPeriod"], 2);
        assert!(json.get("current_period").is_none());
    }
}
