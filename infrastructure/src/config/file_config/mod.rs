//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly; every section has defaults so a partial
//! file (or none at all) is valid.

mod execution;
mod logging;
mod model;
mod tools;

pub use execution::FileExecutionConfig;
pub use logging::FileLoggingConfig;
pub use model::{DEFAULT_API_BASE, DEFAULT_MODEL, FileModelConfig};
pub use tools::FileToolsConfig;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("model.name cannot be empty")]
    EmptyModelName,

    #[error("tools.shell cannot be empty")]
    EmptyShell,

    #[error("execution.max_tool_rounds cannot be 0 (omit it for no limit)")]
    ZeroToolRounds,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Model client settings
    pub model: FileModelConfig,
    /// Tool settings
    pub tools: FileToolsConfig,
    /// Turn loop settings
    pub execution: FileExecutionConfig,
    /// Log and transcript destinations
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the configuration, reporting the first problem found.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.model.name.trim().is_empty() {
            return Err(ConfigValidationError::EmptyModelName);
        }
        if self.tools.shell.trim().is_empty() {
            return Err(ConfigValidationError::EmptyShell);
        }
        if self.execution.max_tool_rounds == Some(0) {
            return Err(ConfigValidationError::ZeroToolRounds);
        }
        Ok(())
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[model]
name = "gemini-1.5-pro"
system_prompt = "Be brief."

[tools]
project_root = "workspace"
shell = "sh"

[execution]
max_tool_rounds = 8

[logging]
conversation_log = "/tmp/toolchat.jsonl"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.model.name, "gemini-1.5-pro");
        assert_eq!(config.model.api_base, DEFAULT_API_BASE);
        assert_eq!(config.model.system_prompt.as_deref(), Some("Be brief."));
        assert_eq!(config.tools.project_root.as_deref(), Some("workspace"));
        assert_eq!(config.tools.shell, "sh");
        assert_eq!(config.execution.max_tool_rounds, Some(8));
        assert_eq!(
            config.logging.conversation_log.as_deref(),
            Some("/tmp/toolchat.jsonl")
        );
        assert!(config.logging.log_file.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: FileConfig = toml::from_str("[tools]\nshell = \"zsh\"\n").unwrap();
        assert_eq!(config.tools.shell, "zsh");
        // Defaults should apply
        assert_eq!(config.model.name, DEFAULT_MODEL);
        assert!(config.execution.max_tool_rounds.is_none());
        assert!(config.execution.to_execution_params().max_tool_rounds.is_none());
    }

    #[test]
    fn test_default_config() {
        let config = FileConfig::default();
        assert_eq!(config.model.name, "gemini-1.5-flash");
        assert_eq!(config.tools.shell, "bash");
        assert!(config.tools.project_root.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = FileConfig::default();
        config.model.name = "  ".to_string();
        assert_eq!(config.validate(), Err(ConfigValidationError::EmptyModelName));

        let mut config = FileConfig::default();
        config.tools.shell = String::new();
        assert_eq!(config.validate(), Err(ConfigValidationError::EmptyShell));

        let mut config = FileConfig::default();
        config.execution.max_tool_rounds = Some(0);
        assert_eq!(config.validate(), Err(ConfigValidationError::ZeroToolRounds));
    }

    #[test]
    fn test_to_toml_string_parses_back() {
        let mut config = FileConfig::default();
        config.execution.max_tool_rounds = Some(3);

        let rendered = config.to_toml_string().unwrap();
        assert!(rendered.contains("[model]"));
        assert!(rendered.contains("max_tool_rounds = 3"));

        let parsed: FileConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, config);
    }
}
