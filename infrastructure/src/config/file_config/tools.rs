//! Tool configuration from TOML (`[tools]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw tools configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileToolsConfig {
    /// Root that tool paths and directories are resolved against.
    /// Unset means the current working directory.
    pub project_root: Option<String>,
    /// Shell used as `<shell> -c <command>`
    pub shell: String,
}

impl Default for FileToolsConfig {
    fn default() -> Self {
        Self {
            project_root: None,
            shell: "bash".to_string(),
        }
    }
}

impl FileToolsConfig {
    /// Resolve the project root, falling back to `cwd`.
    pub fn resolve_project_root(&self, cwd: PathBuf) -> PathBuf {
        match &self.project_root {
            Some(root) if !root.is_empty() => cwd.join(root),
            _ => cwd,
        }
    }
}
