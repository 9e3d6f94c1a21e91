//! Turn loop configuration from TOML (`[execution]` section)

use serde::{Deserialize, Serialize};
use toolchat_application::config::ExecutionParams;

/// Raw execution configuration from TOML
///
/// # Example
///
/// ```toml
/// [execution]
/// max_tool_rounds = 25   # omit for no limit
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExecutionConfig {
    pub max_tool_rounds: Option<usize>,
}

impl FileExecutionConfig {
    pub fn to_execution_params(&self) -> ExecutionParams {
        ExecutionParams {
            max_tool_rounds: self.max_tool_rounds,
        }
    }
}
