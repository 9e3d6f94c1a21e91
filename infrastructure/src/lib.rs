//! Infrastructure layer for toolchat
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the Gemini client, the built-in tools,
//! the conversation transcript, and configuration file loading.

pub mod config;
pub mod gemini;
pub mod logging;
pub mod tools;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileExecutionConfig, FileLoggingConfig,
    FileModelConfig, FileToolsConfig,
};
pub use gemini::{GeminiError, GeminiLlmGateway, GeminiSession};
pub use logging::JsonlConversationLogger;
pub use tools::{
    GeminiToolConverter, ProcessExecutor, ReadManyFilesTool, RunShellCommandTool, ToolRegistry,
    default_registry,
};
