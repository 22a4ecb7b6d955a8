use std::fs;

use anyhow::Context as _;
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Identity and layout of a project, as read from a settings file.
///
/// ```json
/// { "name": "demo", "group": "com.example", "build-dir": "out" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ProjectSettings {
    /// Project name, also used as the artifact id.
    pub name: String,
    /// Project group, used as the group id.
    pub group: String,
    pub project_dir: Utf8PathBuf,
    /// Relative to `project_dir` unless absolute.
    pub build_dir: Utf8PathBuf,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            name: "project".into(),
            group: String::new(),
            project_dir: ".".into(),
            build_dir: "build".into(),
        }
    }
}

impl ProjectSettings {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Utf8Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("Couldn't read project settings from {path}"))?;

        Self::from_json(&json).with_context(|| format!("Invalid project settings in {path}"))
    }
}
