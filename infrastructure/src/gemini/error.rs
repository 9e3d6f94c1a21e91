//! Error types for the Gemini adapter

use thiserror::Error;
use toolchat_application::ports::llm_gateway::GatewayError;

/// Result type alias for Gemini operations
pub type Result<T> = std::result::Result<T, GeminiError>;

/// Errors that can occur when talking to the Gemini REST API
#[derive(Error, Debug)]
pub enum GeminiError {
    #[error("API key is empty")]
    MissingApiKey,

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse response: {error}\nRaw response: {raw}")]
    ParseError { error: String, raw: String },
}

impl From<GeminiError> for GatewayError {
    fn from(err: GeminiError) -> Self {
        match err {
            GeminiError::MissingApiKey | GeminiError::ClientBuild(_) => {
                GatewayError::ConnectionError(err.to_string())
            }
            GeminiError::Http(ref e) if e.is_timeout() => GatewayError::Timeout,
            GeminiError::Http(ref e) if e.is_connect() => {
                GatewayError::ConnectionError(err.to_string())
            }
            GeminiError::Http(_) | GeminiError::Api { .. } => {
                GatewayError::RequestFailed(err.to_string())
            }
            GeminiError::ParseError { .. } => GatewayError::InvalidResponse(err.to_string()),
        }
    }
}
