//! Tool domain module
//!
//! This module defines the core abstractions for the **Tool System** -
//! how the model asks for local actions (shell commands, file reads) and
//! how their outcomes are reported back.
//!
//! ```text
//! ┌────────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ ToolDefinition │───▶│ ToolCall     │───▶│ ToolResult   │
//! │ (declaration)  │    │ (invocation) │    │ (fields|err) │
//! └────────────────┘    └──────────────┘    └──────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`ToolSpec`]: the set of declared tools, keyed by name
//! - [`ToolDefinition`]: name, description, parameter and result schema
//! - [`ToolCall`]: a model-issued invocation with dynamically typed arguments
//! - [`ToolResult`]: exactly one of a field mapping or a [`ToolError`]
//! - [`ToolValidator`]: schema check applied before a tool runs
//!
//! Execution itself lives outside the domain: the application layer defines
//! the `Tool` and `ToolExecutorPort` traits, the infrastructure layer
//! implements them.

pub mod entities;
pub mod traits;
pub mod value_objects;

pub use entities::{ParamType, ToolCall, ToolDefinition, ToolParameter, ToolSpec};
pub use traits::{DefaultToolValidator, ToolValidator};
pub use value_objects::{ResultFields, ToolError, ToolOutcome, ToolResult};
