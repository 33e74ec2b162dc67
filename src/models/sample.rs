//! Built-in sample project.

use super::{Project, Task};

/// Name of the built-in sample project.
pub const SAMPLE_PROJECT_NAME: &str = "Website Redesign Project";

/// A twelve-period software project halfway through its schedule.
///
/// Work is on schedule (SPI 1.00) but running over cost (CPI about 0.90),
/// with the last two phases not yet started.
pub fn sample_project() -> Project {
    Project {
        name: SAMPLE_PROJECT_NAME.to_string(),
        budget: 100_000.0,
        duration: 12,
        current_period: 6,
        tasks: vec![
            Task::new(1, "Requirements Analysis", 10_000.0, 9_500.0, 100),
            Task::new(2, "UI/UX Design", 15_000.0, 16_000.0, 100),
            Task::new(3, "Frontend Development", 20_000.0, 18_000.0, 75),
            Task::new(4, "Backend Development", 20_000.0, 12_000.0, 50),
            Task::new(5, "Testing & QA", 20_000.0, 0.0, 0),
            Task::new(6, "Deployment", 15_000.0, 0.0, 0),
        ],
    }
}
