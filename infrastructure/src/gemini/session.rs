//! Gemini chat session
//!
//! Implements `LlmSession` over the stateless `generateContent` endpoint by
//! keeping the conversation history locally and resending it each call.

use super::error::{GeminiError, Result};
use super::protocol::{
    ApiErrorBody, Content, GenerateContentRequest, GenerateContentResponse, ToolBlock,
};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use toolchat_application::ports::llm_gateway::{GatewayError, LlmSession};
use toolchat_domain::{ModelResponse, ToolResult};
use tracing::debug;

/// HTTP connection details shared by every session of a gateway
#[derive(Debug)]
pub struct GeminiClient {
    pub(super) http: reqwest::Client,
    pub(super) api_base: String,
    pub(super) api_key: String,
}

impl GeminiClient {
    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            model
        )
    }

    async fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest<'_>,
    ) -> Result<GenerateContentResponse> {
        let response = self
            .http
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let raw = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&raw)
                .map(|body| match body.error.status {
                    Some(code) => format!("{}: {}", code, body.error.message),
                    None => body.error.message,
                })
                .unwrap_or(raw);
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&raw).map_err(|e| GeminiError::ParseError {
            error: e.to_string(),
            raw,
        })
    }
}

/// Conversation history with a commit point.
///
/// A turn that ends in text is committed. A turn that is abandoned midway
/// (transport error, cancellation) is discarded before the next user text
/// so the history never ends in an unanswered function call.
#[derive(Debug, Default)]
struct History {
    contents: Vec<Content>,
    committed: usize,
}

impl History {
    fn begin_turn(&mut self) {
        self.contents.truncate(self.committed);
    }

    fn push(&mut self, content: Content) {
        self.contents.push(content);
    }

    fn rollback_to(&mut self, len: usize) {
        self.contents.truncate(len);
    }

    fn commit(&mut self) {
        self.committed = self.contents.len();
    }
}

pub struct GeminiSession {
    client: Arc<GeminiClient>,
    model: String,
    system_prompt: Option<String>,
    tools: Vec<ToolBlock>,
    /// Conversation history (stateless API requires full history each call)
    history: Mutex<History>,
}

impl GeminiSession {
    pub fn new(
        client: Arc<GeminiClient>,
        model: String,
        system_prompt: Option<String>,
        function_declarations: Vec<serde_json::Value>,
    ) -> Self {
        let tools = if function_declarations.is_empty() {
            Vec::new()
        } else {
            vec![ToolBlock {
                function_declarations,
            }]
        };
        Self {
            client,
            model,
            system_prompt,
            tools,
            history: Mutex::new(History::default()),
        }
    }

    /// Append `content`, call the API, and record the model's reply.
    async fn exchange(&self, content: Content) -> Result<ModelResponse> {
        let mut history = self.history.lock().await;
        let before = history.contents.len();
        history.push(content);

        let request = GenerateContentRequest {
            contents: &history.contents,
            system_instruction: self
                .system_prompt
                .as_deref()
                .filter(|p| !p.is_empty())
                .map(Content::system),
            tools: self.tools.clone(),
        };

        debug!(
            model = %self.model,
            contents = history.contents.len(),
            "Calling Gemini generateContent"
        );

        let response = match self.client.generate(&self.model, &request).await {
            Ok(r) => r,
            Err(e) => {
                history.rollback_to(before);
                return Err(e);
            }
        };

        match response.first_content() {
            Some(reply) => {
                let wants_tools = reply.has_function_call();
                history.push(reply);
                if !wants_tools {
                    history.commit();
                }
            }
            // Nothing to answer; the turn ends here.
            None => history.commit(),
        }

        Ok(response.to_model_response())
    }
}

#[async_trait]
impl LlmSession for GeminiSession {
    fn model(&self) -> &str {
        &self.model
    }

    async fn send_text(&self, content: &str) -> std::result::Result<ModelResponse, GatewayError> {
        self.history.lock().await.begin_turn();
        Ok(self.exchange(Content::user_text(content)).await?)
    }

    async fn send_tool_results(
        &self,
        results: &[ToolResult],
    ) -> std::result::Result<ModelResponse, GatewayError> {
        Ok(self.exchange(Content::function_responses(results)).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::protocol::{FunctionCall, Part, ROLE_MODEL};

    fn call_content() -> Content {
        Content::new(
            ROLE_MODEL,
            vec![Part {
                function_call: Some(FunctionCall {
                    name: "run_shell_command".to_string(),
                    args: Default::default(),
                }),
                ..Part::default()
            }],
        )
    }

    #[test]
    fn test_history_discards_abandoned_turn() {
        let mut history = History::default();

        history.begin_turn();
        history.push(Content::user_text("first"));
        history.push(Content::new(ROLE_MODEL, vec![Part::text("answer")]));
        history.commit();

        // Second turn stops after the model asked for a tool.
        history.begin_turn();
        history.push(Content::user_text("second"));
        history.push(call_content());

        history.begin_turn();
        assert_eq!(history.contents.len(), 2);
        assert_eq!(history.contents[1].parts[0].text.as_deref(), Some("answer"));
    }

    #[test]
    fn test_history_rollback_after_failed_request() {
        let mut history = History::default();
        history.push(Content::user_text("x"));
        history.rollback_to(0);
        assert!(history.contents.is_empty());
    }

    #[test]
    fn test_endpoint() {
        let client = GeminiClient {
            http: reqwest::Client::new(),
            api_base: "https://example.test/v1beta/".to_string(),
            api_key: "k".to_string(),
        };
        assert_eq!(
            client.endpoint("gemini-1.5-flash"),
            "https://example.test/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn test_session_wraps_declarations_in_one_block() {
        let client = Arc::new(GeminiClient {
            http: reqwest::Client::new(),
            api_base: "https://example.test".to_string(),
            api_key: "k".to_string(),
        });
        let session = GeminiSession::new(
            client.clone(),
            "m".to_string(),
            None,
            vec![serde_json::json!({"name": "a"}), serde_json::json!({"name": "b"})],
        );
        assert_eq!(session.tools.len(), 1);
        assert_eq!(session.tools[0].function_declarations.len(), 2);
        assert_eq!(session.model(), "m");

        let bare = GeminiSession::new(client, "m".to_string(), None, Vec::new());
        assert!(bare.tools.is_empty());
    }

    mod exchange {
        use super::*;
        use serde_json::json;
        use wiremock::matchers::{header, method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        const ENDPOINT: &str = "/models/m:generateContent";

        async fn stub(response: ResponseTemplate) -> MockServer {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path(ENDPOINT))
                .and(header("x-goog-api-key", "k"))
                .respond_with(response)
                .mount(&server)
                .await;
            server
        }

        fn session(server: &MockServer) -> GeminiSession {
            let client = Arc::new(GeminiClient {
                http: reqwest::Client::new(),
                api_base: server.uri(),
                api_key: "k".to_string(),
            });
            GeminiSession::new(client, "m".to_string(), None, Vec::new())
        }

        fn reply(parts: serde_json::Value) -> ResponseTemplate {
            ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"role": "model", "parts": parts}}]
            }))
        }

        #[tokio::test]
        async fn test_text_reply_commits() {
            let server = stub(reply(json!([{"text": "hi"}]))).await;
            let session = session(&server);

            let response = session.send_text("hello").await.unwrap();

            assert_eq!(response.first_candidate().unwrap().split().text, "hi");
            let history = session.history.lock().await;
            assert_eq!(history.contents.len(), 2);
            assert_eq!(history.committed, 2);
        }

        #[tokio::test]
        async fn test_failed_request_rolls_back() {
            let server = stub(ResponseTemplate::new(500).set_body_json(json!({
                "error": {"code": 500, "message": "boom", "status": "INTERNAL"}
            })))
            .await;
            let session = session(&server);

            let err = session.exchange(Content::user_text("hello")).await.unwrap_err();

            match err {
                GeminiError::Api { status, message } => {
                    assert_eq!(status, 500);
                    assert_eq!(message, "INTERNAL: boom");
                }
                other => panic!("unexpected error: {:?}", other),
            }
            let history = session.history.lock().await;
            assert!(history.contents.is_empty());
            assert_eq!(history.committed, 0);
        }

        #[tokio::test]
        async fn test_function_call_reply_stays_uncommitted() {
            let server = stub(reply(json!([
                {"functionCall": {"name": "run_shell_command", "args": {"command": "ls"}}}
            ])))
            .await;
            let session = session(&server);

            session.send_text("first").await.unwrap();
            {
                let history = session.history.lock().await;
                assert_eq!(history.contents.len(), 2);
                assert!(history.contents[1].has_function_call());
                assert_eq!(history.committed, 0);
            }

            // The unanswered call is dropped when the next turn starts.
            session.send_text("second").await.unwrap();
            let history = session.history.lock().await;
            assert_eq!(history.contents.len(), 2);
            assert_eq!(history.contents[0].parts[0].text.as_deref(), Some("second"));
            assert_eq!(history.committed, 0);
        }

        #[tokio::test]
        async fn test_no_candidates_commits() {
            let server = stub(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"promptFeedback": {"blockReason": "SAFETY"}})),
            )
            .await;
            let session = session(&server);

            let response = session.send_text("hello").await.unwrap();

            assert!(!response.has_candidates());
            let history = session.history.lock().await;
            assert_eq!(history.contents.len(), 1);
            assert_eq!(history.committed, 1);
        }
    }
}
