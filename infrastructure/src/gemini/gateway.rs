//! Gemini LLM Gateway implementation

use super::error::{GeminiError, Result};
use super::session::{GeminiClient, GeminiSession};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use toolchat_application::ports::llm_gateway::{GatewayError, LlmGateway, LlmSession};
use tracing::info;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// LLM Gateway backed by the Gemini REST API
pub struct GeminiLlmGateway {
    client: Arc<GeminiClient>,
    model: String,
    system_prompt: Option<String>,
}

impl GeminiLlmGateway {
    /// Create a gateway for `model`. Fails if `api_key` is empty.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        api_base: impl Into<String>,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(GeminiError::MissingApiKey);
        }

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(GeminiError::ClientBuild)?;

        let model = model.into();
        info!(model = %model, "GeminiLlmGateway initialized");

        Ok(Self {
            client: Arc::new(GeminiClient {
                http,
                api_base: api_base.into(),
                api_key,
            }),
            model,
            system_prompt: None,
        })
    }

    /// Send `prompt` as the system instruction of every session
    pub fn with_system_prompt(mut self, prompt: Option<String>) -> Self {
        self.system_prompt = prompt.filter(|p| !p.trim().is_empty());
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl LlmGateway for GeminiLlmGateway {
    async fn create_session(
        &self,
        tools: Vec<serde_json::Value>,
    ) -> std::result::Result<Box<dyn LlmSession>, GatewayError> {
        Ok(Box::new(GeminiSession::new(
            Arc::clone(&self.client),
            self.model.clone(),
            self.system_prompt.clone(),
            tools,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_api_key_rejected() {
        let result = GeminiLlmGateway::new("  ", "gemini-1.5-flash", "https://example.test");
        assert!(matches!(result, Err(GeminiError::MissingApiKey)));
    }

    #[tokio::test]
    async fn test_create_session_uses_configured_model() {
        let gateway = GeminiLlmGateway::new("key", "gemini-1.5-pro", "https://example.test")
            .unwrap()
            .with_system_prompt(Some(String::new()));
        assert!(gateway.system_prompt.is_none());

        let session = gateway.create_session(Vec::new()).await.unwrap();
        assert_eq!(session.model(), "gemini-1.5-pro");
    }
}
