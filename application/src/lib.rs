//! Application layer for toolchat
//!
//! This crate contains the turn orchestrator, port definitions, and
//! application configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::ExecutionParams;
pub use ports::{
    conversation_logger::{
        ConversationEvent, ConversationEventKind, ConversationLogger, NoConversationLogger,
    },
    llm_gateway::{GatewayError, LlmGateway, LlmSession},
    progress::{NoTurnProgress, TurnProgressNotifier},
    tool_executor::{Tool, ToolExecutorPort},
    tool_schema::ToolSchemaPort,
};
pub use use_cases::run_turn::{RunTurnError, RunTurnInput, RunTurnUseCase};
pub use use_cases::tool_helpers::tool_args_preview;
