//! Tool domain traits
//!
//! Contains pure domain logic traits for tool validation.
//! The async `Tool` and `ToolExecutorPort` traits are defined in the
//! application layer (ports).

use super::entities::{ToolCall, ToolDefinition};

/// Validator for tool calls
///
/// This is a pure domain trait that validates tool calls
/// against their definitions without any I/O operations.
pub trait ToolValidator {
    /// Validate a tool call against its definition
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), String>;
}

/// Default implementation of ToolValidator
///
/// Required parameters must be present and non-null; every declared
/// parameter that is present must match its declared type. Arguments
/// the definition does not declare are left for the tool to ignore.
#[derive(Debug, Clone, Default)]
pub struct DefaultToolValidator;

impl ToolValidator for DefaultToolValidator {
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), String> {
        for param in &definition.parameters {
            match call.arguments.get(&param.name) {
                None | Some(serde_json::Value::Null) if param.required => {
                    return Err(format!(
                        "missing or invalid '{}' argument for tool '{}'",
                        param.name, definition.name
                    ));
                }
                None | Some(serde_json::Value::Null) => {}
                Some(value) => {
                    if !param.param_type.accepts(value) {
                        return Err(format!(
                            "invalid '{}' argument for tool '{}': expected {}",
                            param.name, definition.name, param.param_type
                        ));
                    }
                }
            }
        }

        Ok(())
    }
}
