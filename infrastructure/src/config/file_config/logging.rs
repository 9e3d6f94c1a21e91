//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};

/// Raw logging configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL transcript of every turn (user text, tool calls, results, model text)
    pub conversation_log: Option<String>,
    /// Diagnostic log file; tracing output goes to stderr when unset
    pub log_file: Option<String>,
}
