//! Configuration file loading for toolchat
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment: `TOOLCHAT_<SECTION>__<KEY>` (e.g. `TOOLCHAT_MODEL__NAME`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./toolchat.toml` or `./.toolchat.toml`
//! 4. Global: `$XDG_CONFIG_HOME/toolchat/config.toml` (or `~/.config/toolchat/config.toml`)
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, DEFAULT_API_BASE, DEFAULT_MODEL, FileConfig, FileExecutionConfig,
    FileLoggingConfig, FileModelConfig, FileToolsConfig,
};
pub use loader::ConfigLoader;
