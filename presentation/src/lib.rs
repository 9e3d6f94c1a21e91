//! Presentation layer for toolchat
//!
//! This crate contains the CLI definition, the interactive chat loop,
//! and console output for tool notices and model replies.

pub mod chat;
pub mod cli;
pub mod output;

// Re-export commonly used types
pub use chat::ChatRepl;
pub use cli::commands::Cli;
pub use output::console::{ConsoleFormatter, ConsoleProgress};
