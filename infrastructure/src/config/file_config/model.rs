//! Model client configuration from TOML (`[model]` section)

use serde::{Deserialize, Serialize};

/// Model used when nothing else is configured
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Base URL of the Gemini REST API
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Raw model configuration from TOML
///
/// # Example
///
/// ```toml
/// [model]
/// name = "gemini-1.5-pro"
/// system_prompt = "You are a careful shell assistant."
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelConfig {
    /// Model identifier sent to the API
    pub name: String,
    /// API base URL (without the `/models/...` suffix)
    pub api_base: String,
    /// Optional system instruction sent with every request
    pub system_prompt: Option<String>,
}

impl Default for FileModelConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            system_prompt: None,
        }
    }
}
