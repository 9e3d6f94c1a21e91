//! LLM Gateway port
//!
//! Defines the interface for communicating with the model client.

use async_trait::async_trait;
use thiserror::Error;
use toolchat_domain::{ModelResponse, ToolResult};

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,
}

/// Gateway for LLM communication
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Create a new chat session that offers the given tool declarations
    /// (provider-specific JSON, see `ToolSchemaPort`) to the model.
    async fn create_session(
        &self,
        tools: Vec<serde_json::Value>,
    ) -> Result<Box<dyn LlmSession>, GatewayError>;
}

/// An active chat session.
///
/// The session owns the conversation history; the orchestrator only sees
/// it as an opaque handle to send messages through.
#[async_trait]
pub trait LlmSession: Send + Sync {
    /// Identifier of the model behind this session
    fn model(&self) -> &str;

    /// Send user text and get the model's response
    async fn send_text(&self, content: &str) -> Result<ModelResponse, GatewayError>;

    /// Send a batch of tool results, in call order, and get the model's response
    async fn send_tool_results(
        &self,
        results: &[ToolResult],
    ) -> Result<ModelResponse, GatewayError>;
}
