//! Tool ports
//!
//! [`Tool`] is a single capability (shell command, multi-file read);
//! [`ToolExecutorPort`] is the name-keyed dispatch table the orchestrator
//! consults. Implementations live in the infrastructure layer.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use toolchat_domain::tool::{
    entities::{ToolCall, ToolDefinition, ToolSpec},
    value_objects::{ResultFields, ToolError, ToolResult},
};

/// A capability the model can invoke.
///
/// Arguments have already been checked against [`Tool::definition`] when
/// `execute` is called through a registry, but tools still read them
/// defensively since the model's output is not statically guaranteed.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Calling convention published to the model
    fn definition(&self) -> &ToolDefinition;

    /// Run the tool. Cancellation surfaces as [`ToolError::cancelled`].
    async fn execute(
        &self,
        call: &ToolCall,
        cancel: &CancellationToken,
    ) -> Result<ResultFields, ToolError>;
}

/// Port for tool dispatch
#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    /// Get the specification of all available tools
    fn tool_spec(&self) -> &ToolSpec;

    /// Check if a tool is available
    fn has_tool(&self, name: &str) -> bool {
        self.tool_spec().contains(name)
    }

    /// Get the definition of a specific tool
    fn get_tool(&self, name: &str) -> Option<&ToolDefinition> {
        self.tool_spec().get(name)
    }

    /// Get names of all available tools
    fn available_tools(&self) -> Vec<&str> {
        self.tool_spec().names().collect()
    }

    /// Execute a tool call. Never fails: every problem becomes an error result.
    async fn execute(&self, call: &ToolCall, cancel: &CancellationToken) -> ToolResult;
}
