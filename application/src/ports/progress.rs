//! Progress notification port
//!
//! Defines the callbacks the orchestrator fires while a turn is running.

use toolchat_domain::{ToolCall, ToolResult};

/// Callback for progress updates during a conversation turn
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console notices, status lines, etc.)
pub trait TurnProgressNotifier: Send + Sync {
    /// Called before a message is sent to the model. `round` is 0 for the
    /// user text and counts tool-result submissions after that.
    fn on_model_request(&self, _round: usize) {}

    /// Called right before a tool call is dispatched
    fn on_tool_call(&self, _call: &ToolCall) {}

    /// Called after a tool call produced its result
    fn on_tool_result(&self, _call: &ToolCall, _result: &ToolResult, _duration_ms: u64) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoTurnProgress;

impl TurnProgressNotifier for NoTurnProgress {}
