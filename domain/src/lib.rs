//! Domain layer for toolchat
//!
//! This crate contains the core entities and value objects of the tool
//! invocation system. It has no dependencies on infrastructure or
//! presentation concerns.
//!
//! # Core Concepts
//!
//! - **Tool**: a named, schema-described capability the model can call
//! - **ToolCall / ToolResult**: the request/response pair exchanged between
//!   the model and tool dispatch
//! - **Turn**: one user input and every tool round-trip it causes, ending
//!   when the model answers with plain text

pub mod conversation;
pub mod process;
pub mod session;
pub mod tool;

// Re-export commonly used types
pub use conversation::{ConversationTurn, ToolRound, TurnOutcome};
pub use process::{CommandReport, ExitOutcome};
pub use session::response::{Candidate, CandidateContent, ContentPart, ModelResponse};
pub use tool::{
    entities::{ParamType, ToolCall, ToolDefinition, ToolParameter, ToolSpec},
    traits::{DefaultToolValidator, ToolValidator},
    value_objects::{ResultFields, ToolError, ToolOutcome, ToolResult},
};
