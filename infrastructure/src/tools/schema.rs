//! Gemini function-declaration converter.
//!
//! Default implementation of [`ToolSchemaPort`] that turns domain tool
//! definitions into the `functionDeclarations` entries the Gemini API
//! accepts (an OpenAPI schema subset with upper-case type names).

use serde_json::{Map, Value, json};
use toolchat_application::ports::tool_schema::ToolSchemaPort;
use toolchat_domain::tool::entities::{ParamType, ToolDefinition, ToolParameter};

/// Converts [`ToolDefinition`]s into Gemini function declarations.
///
/// Type mapping:
/// - `String` → `STRING`, `Number` → `NUMBER`, `Integer` → `INTEGER`,
///   `Boolean` → `BOOLEAN`
/// - `Array { items }` → `ARRAY` with a nested `items` schema
/// - `Object { properties }` → `OBJECT` with nested `properties`
pub struct GeminiToolConverter;

impl GeminiToolConverter {
    fn type_schema(param_type: &ParamType) -> Map<String, Value> {
        let mut schema = Map::new();
        match param_type {
            ParamType::String => {
                schema.insert("type".into(), json!("STRING"));
            }
            ParamType::Number => {
                schema.insert("type".into(), json!("NUMBER"));
            }
            ParamType::Integer => {
                schema.insert("type".into(), json!("INTEGER"));
            }
            ParamType::Boolean => {
                schema.insert("type".into(), json!("BOOLEAN"));
            }
            ParamType::Array { items } => {
                schema.insert("type".into(), json!("ARRAY"));
                schema.insert("items".into(), Value::Object(Self::type_schema(items)));
            }
            ParamType::Object { properties } => {
                return Self::object_schema(properties);
            }
        }
        schema
    }

    fn param_schema(param: &ToolParameter) -> Value {
        let mut schema = Self::type_schema(&param.param_type);
        if !param.description.is_empty() {
            schema.insert("description".into(), json!(param.description));
        }
        Value::Object(schema)
    }

    fn object_schema(params: &[ToolParameter]) -> Map<String, Value> {
        let properties: Map<String, Value> = params
            .iter()
            .map(|p| (p.name.clone(), Self::param_schema(p)))
            .collect();
        let required: Vec<&str> = params
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect();

        let mut schema = Map::new();
        schema.insert("type".into(), json!("OBJECT"));
        schema.insert("properties".into(), Value::Object(properties));
        if !required.is_empty() {
            schema.insert("required".into(), json!(required));
        }
        schema
    }
}

impl ToolSchemaPort for GeminiToolConverter {
    fn tool_to_schema(&self, tool: &ToolDefinition) -> Value {
        let mut declaration = Map::new();
        declaration.insert("name".into(), json!(tool.name));
        declaration.insert("description".into(), json!(tool.description));
        declaration.insert(
            "parameters".into(),
            Value::Object(Self::object_schema(&tool.parameters)),
        );
        if !tool.response.is_empty() {
            declaration.insert(
                "response".into(),
                Value::Object(Self::object_schema(&tool.response)),
            );
        }
        Value::Object(declaration)
    }
}
