//! Data models for the EVM analyzer.
//!
//! A [`Project`] is the only input to the engine. It is loaded once per
//! command from a [`crate::sources::ProjectSource`], validated, and then
//! treated as immutable.

mod project;
mod sample;

pub use project::{Project, ProjectSummary, Task};
pub use sample::{SAMPLE_PROJECT_NAME, sample_project};
