//! Where projects come from.
//!
//! Three sources exist:
//! - the built-in sample project
//! - a project description file (`.json` or `.toml`)
//! - a platform connector, which checks its credentials and then yields the
//!   sample project (no network access is made)
//!
//! Every source validates the project before returning it.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::models::{Project, sample_project};
use crate::{Error, Result};

/// Project management platforms the connector accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Platform {
    MsProject,
    Primavera,
    Jira,
    Asana,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::MsProject => "ms-project",
            Platform::Primavera => "primavera",
            Platform::Jira => "jira",
            Platform::Asana => "asana",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A place to load a project from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectSource {
    /// The built-in sample project
    Sample,
    /// A JSON or TOML project file
    File(PathBuf),
    /// A platform connection
    Connector { platform: Platform, api_key: String },
}

impl ProjectSource {
    /// Load and validate the project.
    pub fn load(&self) -> Result<Project> {
        let project = match self {
            ProjectSource::Sample => sample_project(),
            ProjectSource::File(path) => load_project_file(path)?,
            ProjectSource::Connector { platform, api_key } => connect(*platform, api_key)?,
        };
        project.validate()?;
        info!(source = %self, project = %project.name, tasks = project.tasks.len(), "loaded project");
        Ok(project)
    }
}

impl fmt::Display for ProjectSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectSource::Sample => write!(f, "sample"),
            ProjectSource::File(path) => write!(f, "file:{}", path.display()),
            ProjectSource::Connector { platform, .. } => write!(f, "connector:{}", platform),
        }
    }
}

/// Project file formats understood by [`load_project_file`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProjectFileFormat {
    Json,
    Toml,
}

impl ProjectFileFormat {
    fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "json" => Ok(ProjectFileFormat::Json),
            "toml" => Ok(ProjectFileFormat::Toml),
            "" => Err(Error::UnsupportedFormat(format!(
                "{} has no file extension (expected .json or .toml)",
                path.display()
            ))),
            other => Err(Error::UnsupportedFormat(format!(
                ".{} files are not supported (expected .json or .toml)",
                other
            ))),
        }
    }
}

/// Read a project description from disk.
///
/// The format is chosen by extension. The returned project is not yet
/// validated; use [`ProjectSource::load`] for that.
pub fn load_project_file(path: &Path) -> Result<Project> {
    let format = ProjectFileFormat::from_path(path)?;
    let content = fs::read_to_string(path)?;
    let project: Project = match format {
        ProjectFileFormat::Json => serde_json::from_str(&content)?,
        ProjectFileFormat::Toml => toml::from_str(&content)?,
    };
    Ok(project)
}

fn connect(platform: Platform, api_key: &str) -> Result<Project> {
    if api_key.trim().is_empty() {
        return Err(Error::InvalidInput(format!(
            "an API key is required to connect to {}",
            platform
        )));
    }
    info!(%platform, "connected to platform, using sample project data");
    Ok(sample_project())
}
