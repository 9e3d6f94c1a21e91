//! Port for the conversation transcript.
//!
//! Separate from `tracing`: tracing carries diagnostics for humans, while
//! a [`ConversationLogger`] receives one [`ConversationEvent`] per step of a
//! turn so the exchange can be replayed or audited.

use serde_json::{Value, json};
use toolchat_domain::{ToolCall, ToolResult};

/// Step of a turn that produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationEventKind {
    UserMessage,
    ToolCall,
    ToolResult,
    ModelText,
}

impl ConversationEventKind {
    /// Stable identifier written to the transcript
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationEventKind::UserMessage => "user_message",
            ConversationEventKind::ToolCall => "tool_call",
            ConversationEventKind::ToolResult => "tool_result",
            ConversationEventKind::ModelText => "model_text",
        }
    }
}

/// A transcript entry: its kind plus event-specific JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationEvent {
    pub kind: ConversationEventKind,
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(kind: ConversationEventKind, payload: Value) -> Self {
        Self { kind, payload }
    }

    pub fn user_message(model: &str, text: &str) -> Self {
        Self::new(
            ConversationEventKind::UserMessage,
            json!({ "model": model, "bytes": text.len(), "text": text }),
        )
    }

    pub fn tool_call(call: &ToolCall) -> Self {
        Self::new(
            ConversationEventKind::ToolCall,
            json!({ "tool": call.tool_name, "args": call.arguments }),
        )
    }

    /// The payload carries exactly what is sent back to the model.
    pub fn tool_result(call: &ToolCall, result: &ToolResult, duration_ms: u64) -> Self {
        Self::new(
            ConversationEventKind::ToolResult,
            json!({
                "tool": call.tool_name,
                "success": result.is_success(),
                "duration_ms": duration_ms,
                "response": result.to_response(),
            }),
        )
    }

    pub fn model_text(text: &str) -> Self {
        Self::new(
            ConversationEventKind::ModelText,
            json!({ "bytes": text.len(), "text": text }),
        )
    }
}

/// Sink for transcript events.
///
/// `log` must not fail or block the turn; a sink that cannot write drops
/// the event.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// Discards every event.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
