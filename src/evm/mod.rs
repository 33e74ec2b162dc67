//! Earned Value Management engine.
//!
//! Two pure functions make up the engine: [`compute_metrics`] derives a
//! [`Metrics`] snapshot from a project, and [`generate_insights`] grades that
//! snapshot into an ordered list of [`Insight`]s. Neither keeps state between
//! calls.

pub mod format;
pub mod insights;
pub mod metrics;

pub use insights::{Category, Insight, Severity, generate_insights, generate_insights_with_currency};
pub use metrics::{Metrics, compute_metrics};
