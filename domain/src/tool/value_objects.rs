//! Tool domain value objects: immutable result and error types
//!
//! These types form the **output side** of tool dispatch. Every dispatched
//! [`ToolCall`](super::entities::ToolCall) produces exactly one
//! [`ToolResult`], which is either a field mapping or a [`ToolError`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Field mapping returned by a successful tool execution.
pub type ResultFields = Map<String, Value>;

/// Error that occurred while dispatching or executing a tool.
///
/// | Code | Raised when |
/// |------|-------------|
/// | `INVALID_ARGUMENT` | Missing or mistyped argument |
/// | `NOT_FOUND` | Unknown tool name |
/// | `EXECUTION_FAILED` | Runtime failure (spawn error, I/O error) |
/// | `CANCELLED` | The operation's cancellation token fired |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("[{code}] {message}")]
pub struct ToolError {
    /// Error code (e.g., "NOT_FOUND", "INVALID_ARGUMENT")
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl ToolError {
    pub const INVALID_ARGUMENT: &'static str = "INVALID_ARGUMENT";
    pub const NOT_FOUND: &'static str = "NOT_FOUND";
    pub const EXECUTION_FAILED: &'static str = "EXECUTION_FAILED";
    pub const CANCELLED: &'static str = "CANCELLED";

    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(Self::INVALID_ARGUMENT, message)
    }

    /// Dispatch error for a name that is not in the registry
    pub fn unknown_tool(name: &str) -> Self {
        Self::new(Self::NOT_FOUND, format!("unknown tool: {}", name))
    }

    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::new(Self::EXECUTION_FAILED, message)
    }

    pub fn cancelled() -> Self {
        Self::new(Self::CANCELLED, "operation cancelled")
    }

    pub fn is_cancelled(&self) -> bool {
        self.code == Self::CANCELLED
    }
}

/// Outcome of a single tool call: exactly one of fields or error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolOutcome {
    Success(ResultFields),
    Failure(ToolError),
}

/// Result of a tool call, correlated to the call by tool name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Name of the tool that was called
    pub tool_name: String,
    pub outcome: ToolOutcome,
}

impl ToolResult {
    /// Create a successful result
    pub fn success(tool_name: impl Into<String>, fields: ResultFields) -> Self {
        Self {
            tool_name: tool_name.into(),
            outcome: ToolOutcome::Success(fields),
        }
    }

    /// Create a failed result
    pub fn failure(tool_name: impl Into<String>, error: ToolError) -> Self {
        Self {
            tool_name: tool_name.into(),
            outcome: ToolOutcome::Failure(error),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ToolOutcome::Success(_))
    }

    pub fn fields(&self) -> Option<&ResultFields> {
        match &self.outcome {
            ToolOutcome::Success(fields) => Some(fields),
            ToolOutcome::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ToolError> {
        match &self.outcome {
            ToolOutcome::Success(_) => None,
            ToolOutcome::Failure(e) => Some(e),
        }
    }

    /// The JSON object handed back to the model as the function response.
    ///
    /// Success yields the field mapping itself; failure yields
    /// `{"error": {"kind": <code>, "message": <message>}}`.
    pub fn to_response(&self) -> Value {
        match &self.outcome {
            ToolOutcome::Success(fields) => Value::Object(fields.clone()),
            ToolOutcome::Failure(e) => serde_json::json!({
                "error": {
                    "kind": e.code,
                    "message": e.message,
                }
            }),
        }
    }
}
