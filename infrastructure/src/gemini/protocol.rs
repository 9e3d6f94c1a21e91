//! Gemini `generateContent` wire types
//!
//! Only the fields this adapter reads or writes are modelled; everything
//! else in a response is ignored.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use toolchat_domain::{Candidate, ContentPart, ModelResponse, ToolResult};

pub const ROLE_USER: &str = "user";
pub const ROLE_MODEL: &str = "model";

/// Request body for `models/{model}:generateContent`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest<'a> {
    pub contents: &'a [Content],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolBlock>,
}

/// One `tools` entry carrying function declarations
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolBlock {
    pub function_declarations: Vec<Value>,
}

/// A turn in the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn new(role: &str, parts: Vec<Part>) -> Self {
        Self {
            role: Some(role.to_string()),
            parts,
        }
    }

    pub fn user_text(text: &str) -> Self {
        Self::new(ROLE_USER, vec![Part::text(text)])
    }

    /// System instruction (the API ignores the role here)
    pub fn system(text: &str) -> Self {
        Self {
            role: None,
            parts: vec![Part::text(text)],
        }
    }

    /// Tool results go back as a user turn of `functionResponse` parts,
    /// in call order.
    pub fn function_responses(results: &[ToolResult]) -> Self {
        Self::new(
            ROLE_USER,
            results
                .iter()
                .map(|r| Part {
                    function_response: Some(FunctionResponse {
                        name: r.tool_name.clone(),
                        response: r.to_response(),
                    }),
                    ..Part::default()
                })
                .collect(),
        )
    }

    pub fn has_function_call(&self) -> bool {
        self.parts.iter().any(|p| p.function_call.is_some())
    }

    /// Domain view of this content's parts. Parts this adapter does not
    /// understand are dropped.
    pub fn to_content_parts(&self) -> Vec<ContentPart> {
        self.parts.iter().filter_map(Part::to_content_part).collect()
    }
}

/// A single content part; exactly one field is expected to be set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_response: Option<FunctionResponse>,
}

impl Part {
    pub fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            ..Self::default()
        }
    }

    fn to_content_part(&self) -> Option<ContentPart> {
        if let Some(call) = &self.function_call {
            return Some(ContentPart::FunctionCall {
                name: call.name.clone(),
                args: call.args.clone().into_iter().collect(),
            });
        }
        if let Some(response) = &self.function_response {
            return Some(ContentPart::FunctionResponse {
                name: response.name.clone(),
                response: response.response.clone(),
            });
        }
        self.text.as_ref().map(|t| ContentPart::Text(t.clone()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub args: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionResponse {
    pub name: String,
    pub response: Value,
}

/// Response body of `generateContent`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<ResponseCandidate>,
    #[serde(default)]
    pub model_version: Option<String>,
    #[serde(default)]
    pub prompt_feedback: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseCandidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Content of the first candidate, as recorded in history
    pub fn first_content(&self) -> Option<Content> {
        self.candidates.first().map(|c| Content {
            role: Some(ROLE_MODEL.to_string()),
            parts: c.content.as_ref().map(|c| c.parts.clone()).unwrap_or_default(),
        })
    }

    pub fn to_model_response(&self) -> ModelResponse {
        ModelResponse {
            candidates: self
                .candidates
                .iter()
                .map(|c| {
                    Candidate::new(
                        c.content
                            .as_ref()
                            .map(Content::to_content_parts)
                            .unwrap_or_default(),
                    )
                })
                .collect(),
            model: self.model_version.clone(),
        }
    }
}

/// Error envelope returned with non-2xx statuses
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}
