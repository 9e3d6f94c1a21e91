//! Run Turn use case.
//!
//! Drives one conversation turn: sends the user's text to the model, then
//! dispatches every function call the model requests and feeds the results
//! back, until the model answers with plain text.
//!
//! ```text
//! user text ──▶ model ──▶ calls? ──no──▶ Text / NoResponse
//!                 ▲          │yes
//!                 │          ▼
//!                 └── results ◀── dispatch (in order, one at a time)
//! ```

use crate::config::ExecutionParams;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::llm_gateway::{GatewayError, LlmSession};
use crate::ports::progress::TurnProgressNotifier;
use crate::ports::tool_executor::ToolExecutorPort;
use crate::use_cases::shared::{check_cancelled, send_cancellable};
use crate::use_cases::tool_helpers::{duration_ms, tool_args_preview, truncate_preview};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use toolchat_domain::{
    ConversationTurn, ToolCall, ToolError, ToolResult, ToolRound, TurnOutcome,
};
use tracing::{debug, info, warn};

/// Errors that abort a turn.
#[derive(Error, Debug)]
pub enum RunTurnError {
    #[error("Gateway error: {0}")]
    GatewayError(#[from] GatewayError),

    #[error("Turn cancelled")]
    Cancelled,

    #[error("Tool round limit reached ({0})")]
    ToolRoundLimit(usize),
}

impl RunTurnError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunTurnError::Cancelled)
    }
}

/// Input for the [`RunTurnUseCase`].
#[derive(Debug, Clone)]
pub struct RunTurnInput {
    /// Raw user text.
    pub text: String,
    /// Loop control.
    pub execution: ExecutionParams,
}

impl RunTurnInput {
    pub fn new(text: impl Into<String>, execution: ExecutionParams) -> Self {
        Self {
            text: text.into(),
            execution,
        }
    }
}

/// Use case for running a single conversation turn.
///
/// The session is borrowed per call; it carries the chat history across
/// turns and is owned by the caller.
pub struct RunTurnUseCase {
    tool_executor: Arc<dyn ToolExecutorPort>,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl Clone for RunTurnUseCase {
    fn clone(&self) -> Self {
        Self {
            tool_executor: self.tool_executor.clone(),
            conversation_logger: self.conversation_logger.clone(),
        }
    }
}

impl RunTurnUseCase {
    pub fn new(tool_executor: Arc<dyn ToolExecutorPort>) -> Self {
        Self {
            tool_executor,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    /// Create with a conversation logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Execute one turn with progress callbacks.
    ///
    /// Returns the full exchange on a normal end (text or no candidates).
    /// A transport failure, a cancellation or an exhausted round budget
    /// aborts the turn. What the session keeps of an aborted exchange is
    /// up to the session.
    pub async fn execute(
        &self,
        session: &dyn LlmSession,
        input: RunTurnInput,
        progress: &dyn TurnProgressNotifier,
        cancel: &CancellationToken,
    ) -> Result<ConversationTurn, RunTurnError> {
        info!(
            "Starting turn on {}: {}",
            session.model(),
            truncate_preview(&input.text, 100)
        );
        check_cancelled(cancel)?;

        self.conversation_logger
            .log(ConversationEvent::user_message(session.model(), &input.text));

        progress.on_model_request(0);
        let mut response = send_cancellable(cancel, session.send_text(&input.text)).await?;
        let mut rounds: Vec<ToolRound> = Vec::new();

        loop {
            let Some(candidate) = response.first_candidate() else {
                info!("Model returned no candidates after {} tool rounds", rounds.len());
                return Ok(ConversationTurn {
                    user_text: input.text,
                    rounds,
                    outcome: TurnOutcome::NoResponse,
                });
            };

            let content = candidate.split();
            if content.calls.is_empty() {
                info!("Turn completed in {} tool rounds", rounds.len());
                self.conversation_logger
                    .log(ConversationEvent::model_text(&content.text));
                return Ok(ConversationTurn {
                    user_text: input.text,
                    rounds,
                    outcome: TurnOutcome::Text(content.text),
                });
            }

            if input.execution.rounds_exhausted(rounds.len()) {
                let max = input.execution.max_tool_rounds.unwrap_or(rounds.len());
                warn!("Turn exceeded max_tool_rounds ({})", max);
                return Err(RunTurnError::ToolRoundLimit(max));
            }

            if !content.text.is_empty() {
                debug!(
                    "Discarding {} bytes of text alongside tool calls",
                    content.text.len()
                );
            }

            let results = self.dispatch_batch(&content.calls, progress, cancel).await?;

            debug!(
                "Tool round {}: sending {} tool results",
                rounds.len() + 1,
                results.len()
            );
            rounds.push(ToolRound {
                calls: content.calls,
                results,
            });

            progress.on_model_request(rounds.len());
            let batch = &rounds[rounds.len() - 1].results;
            response = send_cancellable(cancel, session.send_tool_results(batch)).await?;
        }
    }

    /// Dispatch every call in received order, one at a time.
    async fn dispatch_batch(
        &self,
        calls: &[ToolCall],
        progress: &dyn TurnProgressNotifier,
        cancel: &CancellationToken,
    ) -> Result<Vec<ToolResult>, RunTurnError> {
        let mut results = Vec::with_capacity(calls.len());

        for call in calls {
            check_cancelled(cancel)?;
            progress.on_tool_call(call);
            self.conversation_logger.log(ConversationEvent::tool_call(call));

            let started = Instant::now();
            let result = if self.tool_executor.has_tool(&call.tool_name) {
                debug!(
                    "Executing {} ({})",
                    call.tool_name,
                    tool_args_preview(call)
                );
                self.tool_executor.execute(call, cancel).await
            } else {
                warn!("Model requested unknown tool '{}'", call.tool_name);
                ToolResult::failure(&call.tool_name, ToolError::unknown_tool(&call.tool_name))
            };
            let duration_ms = duration_ms(started.elapsed());

            if result.error().is_some_and(ToolError::is_cancelled) {
                info!("Tool {} cancelled; aborting turn", call.tool_name);
                return Err(RunTurnError::Cancelled);
            }

            progress.on_tool_result(call, &result, duration_ms);
            self.conversation_logger
                .log(ConversationEvent::tool_result(call, &result, duration_ms));

            results.push(result);
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::conversation_logger::ConversationEventKind;
    use crate::ports::progress::NoTurnProgress;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use toolchat_domain::{
        ContentPart, ModelResponse, ResultFields, ToolDefinition, ToolSpec,
    };

    // ==================== Test Mocks ====================

    /// What the mock session saw, in order.
    #[derive(Debug, Clone, PartialEq)]
    enum Sent {
        Text(String),
        Results(Vec<ToolResult>),
    }

    struct MockSession {
        responses: Mutex<VecDeque<Result<ModelResponse, GatewayError>>>,
        sent: Mutex<Vec<Sent>>,
    }

    impl MockSession {
        fn new(responses: Vec<ModelResponse>) -> Self {
            Self::scripted(responses.into_iter().map(Ok).collect())
        }

        fn scripted(responses: Vec<Result<ModelResponse, GatewayError>>) -> Self {
            Self {
                responses: Mutex::new(VecDeque::from(responses)),
                sent: Mutex::new(Vec::new()),
            }
        }

        fn sent(&self) -> Vec<Sent> {
            self.sent.lock().unwrap().clone()
        }

        fn next(&self) -> Result<ModelResponse, GatewayError> {
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(GatewayError::InvalidResponse("No more responses".to_string())))
        }
    }

    #[async_trait]
    impl LlmSession for MockSession {
        fn model(&self) -> &str {
            "mock-model"
        }

        async fn send_text(&self, content: &str) -> Result<ModelResponse, GatewayError> {
            self.sent.lock().unwrap().push(Sent::Text(content.to_string()));
            self.next()
        }

        async fn send_tool_results(
            &self,
            results: &[ToolResult],
        ) -> Result<ModelResponse, GatewayError> {
            self.sent
                .lock()
                .unwrap()
                .push(Sent::Results(results.to_vec()));
            self.next()
        }
    }

    struct MockToolExecutor {
        spec: ToolSpec,
        executed: Mutex<Vec<ToolCall>>,
        cancel_on: Option<&'static str>,
    }

    impl MockToolExecutor {
        fn new() -> Self {
            Self {
                spec: ToolSpec::new()
                    .register(ToolDefinition::new("run_shell_command", "Run a command"))
                    .register(ToolDefinition::new("read_many_files", "Read files")),
                executed: Mutex::new(Vec::new()),
                cancel_on: None,
            }
        }

        fn cancelling(tool: &'static str) -> Self {
            Self {
                cancel_on: Some(tool),
                ..Self::new()
            }
        }

        fn executed(&self) -> Vec<String> {
            self.executed
                .lock()
                .unwrap()
                .iter()
                .map(|c| c.tool_name.clone())
                .collect()
        }
    }

    #[async_trait]
    impl ToolExecutorPort for MockToolExecutor {
        fn tool_spec(&self) -> &ToolSpec {
            &self.spec
        }

        async fn execute(&self, call: &ToolCall, _cancel: &CancellationToken) -> ToolResult {
            self.executed.lock().unwrap().push(call.clone());
            if self.cancel_on == Some(call.tool_name.as_str()) {
                return ToolResult::failure(&call.tool_name, ToolError::cancelled());
            }
            let mut fields = ResultFields::new();
            fields.insert("echo".to_string(), json!(call.tool_name));
            ToolResult::success(&call.tool_name, fields)
        }
    }

    #[derive(Default)]
    struct RecordingLogger {
        events: Mutex<Vec<ConversationEventKind>>,
    }

    impl ConversationLogger for RecordingLogger {
        fn log(&self, event: ConversationEvent) {
            self.events.lock().unwrap().push(event.kind);
        }
    }

    fn call_part(name: &str) -> ContentPart {
        ContentPart::FunctionCall {
            name: name.to_string(),
            args: Default::default(),
        }
    }

    fn input(text: &str) -> RunTurnInput {
        RunTurnInput::new(text, ExecutionParams::default())
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_text_only_response_single_round_trip() {
        let session = MockSession::new(vec![ModelResponse::from_text("hello there")]);
        let executor = Arc::new(MockToolExecutor::new());
        let use_case = RunTurnUseCase::new(executor.clone());

        let turn = use_case
            .execute(&session, input("hi"), &NoTurnProgress, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(turn.outcome, TurnOutcome::Text("hello there".to_string()));
        assert!(turn.rounds.is_empty());
        assert_eq!(session.sent(), vec![Sent::Text("hi".to_string())]);
        assert!(executor.executed().is_empty());
    }

    #[tokio::test]
    async fn test_two_calls_one_batch_in_order() {
        let session = MockSession::new(vec![
            ModelResponse::from_parts(vec![
                call_part("read_many_files"),
                ContentPart::Text("let me look".to_string()),
                call_part("run_shell_command"),
            ]),
            ModelResponse::from_text("done"),
        ]);
        let executor = Arc::new(MockToolExecutor::new());
        let use_case = RunTurnUseCase::new(executor.clone());

        let turn = use_case
            .execute(&session, input("go"), &NoTurnProgress, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(turn.outcome.text(), Some("done"));
        assert_eq!(turn.rounds.len(), 1);
        assert_eq!(
            executor.executed(),
            vec!["read_many_files", "run_shell_command"]
        );

        let sent = session.sent();
        assert_eq!(sent.len(), 2);
        let Sent::Results(batch) = &sent[1] else {
            panic!("expected a result batch, got {:?}", sent[1]);
        };
        let names: Vec<_> = batch.iter().map(|r| r.tool_name.as_str()).collect();
        assert_eq!(names, vec!["read_many_files", "run_shell_command"]);
        assert!(batch.iter().all(|r| r.is_success()));
    }

    #[tokio::test]
    async fn test_unknown_tool_yields_error_result() {
        let session = MockSession::new(vec![
            ModelResponse::from_parts(vec![call_part("frobnicate")]),
            ModelResponse::from_text("sorry"),
        ]);
        let executor = Arc::new(MockToolExecutor::new());
        let use_case = RunTurnUseCase::new(executor.clone());

        let turn = use_case
            .execute(&session, input("x"), &NoTurnProgress, &CancellationToken::new())
            .await
            .unwrap();

        assert!(executor.executed().is_empty());
        let result = &turn.rounds[0].results[0];
        let err = result.error().unwrap();
        assert_eq!(err.code, ToolError::NOT_FOUND);
        assert_eq!(err.message, "unknown tool: frobnicate");
        assert_eq!(turn.outcome.text(), Some("sorry"));
    }

    #[tokio::test]
    async fn test_empty_candidates_is_no_response() {
        let session = MockSession::new(vec![ModelResponse::empty()]);
        let use_case = RunTurnUseCase::new(Arc::new(MockToolExecutor::new()));

        let turn = use_case
            .execute(&session, input("x"), &NoTurnProgress, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(turn.outcome, TurnOutcome::NoResponse);
    }

    #[tokio::test]
    async fn test_empty_text_is_still_terminal() {
        let session = MockSession::new(vec![ModelResponse::from_parts(vec![])]);
        let use_case = RunTurnUseCase::new(Arc::new(MockToolExecutor::new()));

        let turn = use_case
            .execute(&session, input("x"), &NoTurnProgress, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(turn.outcome, TurnOutcome::Text(String::new()));
    }

    #[tokio::test]
    async fn test_submit_failure_aborts_turn() {
        let session = MockSession::scripted(vec![
            Ok(ModelResponse::from_parts(vec![call_part("run_shell_command")])),
            Err(GatewayError::RequestFailed("503".to_string())),
        ]);
        let executor = Arc::new(MockToolExecutor::new());
        let use_case = RunTurnUseCase::new(executor.clone());

        let err = use_case
            .execute(&session, input("x"), &NoTurnProgress, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RunTurnError::GatewayError(GatewayError::RequestFailed(_))
        ));
        // The tool still ran exactly once; no retry.
        assert_eq!(executor.executed(), vec!["run_shell_command"]);
        assert_eq!(session.sent().len(), 2);
    }

    #[tokio::test]
    async fn test_round_limit() {
        let session = MockSession::new(vec![
            ModelResponse::from_parts(vec![call_part("run_shell_command")]),
            ModelResponse::from_parts(vec![call_part("run_shell_command")]),
            ModelResponse::from_text("never reached"),
        ]);
        let executor = Arc::new(MockToolExecutor::new());
        let use_case = RunTurnUseCase::new(executor.clone());
        let params = ExecutionParams::default().with_max_tool_rounds(1);

        let err = use_case
            .execute(
                &session,
                RunTurnInput::new("x", params),
                &NoTurnProgress,
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, RunTurnError::ToolRoundLimit(1)));
        assert_eq!(executor.executed().len(), 1);
    }

    #[tokio::test]
    async fn test_cancelled_tool_aborts_without_submitting() {
        let session = MockSession::new(vec![ModelResponse::from_parts(vec![
            call_part("run_shell_command"),
            call_part("read_many_files"),
        ])]);
        let executor = Arc::new(MockToolExecutor::cancelling("run_shell_command"));
        let use_case = RunTurnUseCase::new(executor.clone());

        let err = use_case
            .execute(&session, input("x"), &NoTurnProgress, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(err.is_cancelled());
        assert_eq!(executor.executed(), vec!["run_shell_command"]);
        assert_eq!(session.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_pre_cancelled_token_sends_nothing() {
        let session = MockSession::new(vec![ModelResponse::from_text("unused")]);
        let use_case = RunTurnUseCase::new(Arc::new(MockToolExecutor::new()));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = use_case
            .execute(&session, input("x"), &NoTurnProgress, &cancel)
            .await
            .unwrap_err();

        assert!(err.is_cancelled());
        assert!(session.sent().is_empty());
    }

    #[tokio::test]
    async fn test_transcript_events() {
        let session = MockSession::new(vec![
            ModelResponse::from_parts(vec![call_part("run_shell_command")]),
            ModelResponse::from_text("ok"),
        ]);
        let logger = Arc::new(RecordingLogger::default());
        let use_case = RunTurnUseCase::new(Arc::new(MockToolExecutor::new()))
            .with_conversation_logger(logger.clone());

        use_case
            .execute(&session, input("x"), &NoTurnProgress, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(
            *logger.events.lock().unwrap(),
            vec![
                ConversationEventKind::UserMessage,
                ConversationEventKind::ToolCall,
                ConversationEventKind::ToolResult,
                ConversationEventKind::ModelText,
            ]
        );
    }
}
