//! Tool Registry
//!
//! The [`ToolRegistry`] maps tool names to [`Tool`] implementations and
//! implements [`ToolExecutorPort`]. It is built once at startup and is
//! read-only afterwards, so it can be shared behind an `Arc`.
//!
//! # Usage
//!
//! ```ignore
//! use toolchat_infrastructure::tools::{ReadManyFilesTool, ToolRegistry};
//!
//! let registry = ToolRegistry::new().register(ReadManyFilesTool::new("."));
//!
//! assert!(registry.has_tool("read_many_files"));
//!
//! let call = ToolCall::new("read_many_files").with_arg("paths", json!(["README.md"]));
//! let result = registry.execute(&call, &CancellationToken::new()).await;
//! ```
//!
//! Every call is checked against the tool's declared parameters by a
//! [`ToolValidator`] before the tool runs; a rejected call never reaches
//! the tool.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use toolchat_application::ports::tool_executor::{Tool, ToolExecutorPort};
use toolchat_domain::tool::{
    entities::{ToolCall, ToolSpec},
    traits::{DefaultToolValidator, ToolValidator},
    value_objects::{ToolError, ToolResult},
};

/// Name-keyed table of tools
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    tool_spec: ToolSpec,
    validator: Arc<dyn ToolValidator + Send + Sync>,
}

impl ToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            tool_spec: ToolSpec::new(),
            validator: Arc::new(DefaultToolValidator),
        }
    }

    /// Register a tool. A later registration with the same name replaces
    /// the earlier one.
    pub fn register<T: Tool + 'static>(self, tool: T) -> Self {
        self.register_arc(Arc::new(tool))
    }

    /// Register a tool (Arc version)
    pub fn register_arc(mut self, tool: Arc<dyn Tool>) -> Self {
        let definition = tool.definition().clone();
        tracing::debug!(tool = %definition.name, "Registered tool");
        self.tools.insert(definition.name.clone(), tool);
        self.tool_spec = self.tool_spec.register(definition);
        self
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolExecutorPort for ToolRegistry {
    fn tool_spec(&self) -> &ToolSpec {
        &self.tool_spec
    }

    async fn execute(&self, call: &ToolCall, cancel: &CancellationToken) -> ToolResult {
        let Some(tool) = self.tools.get(&call.tool_name) else {
            return ToolResult::failure(&call.tool_name, ToolError::unknown_tool(&call.tool_name));
        };

        if let Err(message) = self.validator.validate(call, tool.definition()) {
            tracing::debug!(tool = %call.tool_name, "Rejected arguments: {}", message);
            return ToolResult::failure(&call.tool_name, ToolError::invalid_argument(message));
        }

        match tool.execute(call, cancel).await {
            Ok(fields) => ToolResult::success(&call.tool_name, fields),
            Err(e) => {
                tracing::debug!(tool = %call.tool_name, error = %e, "Tool failed");
                ToolResult::failure(&call.tool_name, e)
            }
        }
    }
}
