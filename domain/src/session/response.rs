//! Model response types.
//!
//! A [`ModelResponse`] carries zero or more [`Candidate`]s; each candidate is
//! an ordered list of [`ContentPart`]s mixing plain text, function-call
//! requests and (when echoed back) function responses.
//!
//! ```text
//! ModelResponse
//!   └─ candidates[0]            (first candidate, by convention)
//!        ├─ Text("Let me look")
//!        ├─ FunctionCall { name: "read_many_files", args }
//!        └─ Text(" first.")
//! ```

use crate::tool::entities::ToolCall;
use serde_json::Value;
use std::collections::HashMap;

/// A single part of a candidate's content.
///
/// # Examples
///
/// ```
/// use toolchat_domain::session::response::ContentPart;
///
/// let text = ContentPart::Text("Let me run that.".to_string());
/// assert_eq!(text.as_text(), Some("Let me run that."));
///
/// let call = ContentPart::FunctionCall {
///     name: "run_shell_command".to_string(),
///     args: [("command".to_string(), serde_json::json!("ls"))]
///         .into_iter().collect(),
/// };
/// assert!(call.as_text().is_none());
/// assert!(call.to_tool_call().is_some());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum ContentPart {
    /// Plain text from the model.
    Text(String),

    /// A request to call a tool.
    FunctionCall {
        name: String,
        args: HashMap<String, Value>,
    },

    /// A function response echoed in the content (never dispatched).
    FunctionResponse { name: String, response: Value },
}

impl ContentPart {
    /// Returns the text content if this is a `Text` part.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentPart::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Converts a `FunctionCall` part into a [`ToolCall`].
    pub fn to_tool_call(&self) -> Option<ToolCall> {
        match self {
            ContentPart::FunctionCall { name, args } => {
                Some(ToolCall::with_arguments(name.clone(), args.clone()))
            }
            _ => None,
        }
    }
}

/// One candidate continuation returned by the model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Candidate {
    pub parts: Vec<ContentPart>,
}

/// Content of a candidate separated into function calls and text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateContent {
    /// Function calls in the order they were encountered.
    pub calls: Vec<ToolCall>,
    /// Text of all text parts, concatenated in order.
    pub text: String,
}

impl Candidate {
    pub fn new(parts: Vec<ContentPart>) -> Self {
        Self { parts }
    }

    /// Separate the parts into function calls and accumulated text.
    ///
    /// Function-response echoes are neither dispatched nor shown.
    pub fn split(&self) -> CandidateContent {
        let mut content = CandidateContent::default();
        for part in &self.parts {
            match part {
                ContentPart::Text(text) => content.text.push_str(text),
                ContentPart::FunctionCall { .. } => {
                    if let Some(call) = part.to_tool_call() {
                        content.calls.push(call);
                    }
                }
                ContentPart::FunctionResponse { .. } => {}
            }
        }
        content
    }
}

/// A response from the model client.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelResponse {
    pub candidates: Vec<Candidate>,
    /// Model identifier (if returned by the API).
    pub model: Option<String>,
}

impl ModelResponse {
    /// A single-candidate, text-only response.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::from_parts(vec![ContentPart::Text(text.into())])
    }

    /// A single-candidate response with the given parts.
    pub fn from_parts(parts: Vec<ContentPart>) -> Self {
        Self {
            candidates: vec![Candidate::new(parts)],
            model: None,
        }
    }

    /// A response with no candidates at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The candidate the conversation follows.
    pub fn first_candidate(&self) -> Option<&Candidate> {
        self.candidates.first()
    }

    pub fn has_candidates(&self) -> bool {
        !self.candidates.is_empty()
    }
}
