//! Request parameter types for the capability methods.

use serde::Deserialize;
use serde_json::Value;

use mcp_dispatch::schema::json_type_name;
use mcp_dispatch::{Arguments, SchemaType, ValidationError};

#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallParams {
    pub name: String,
    #[serde(default)]
    pub arguments: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResourceReadParams {
    pub uri: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PromptGetParams {
    pub name: String,
    #[serde(default)]
    pub arguments: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelledParams {
    pub request_id: Value,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Turn the raw `arguments` member into an argument mapping.
///
/// Absent and `null` both mean "no arguments". Anything other than an
/// object is a type mismatch at the root.
pub fn into_arguments(raw: Option<Value>) -> Result<Option<Arguments>, ValidationError> {
    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(other) => Err(ValidationError::TypeMismatch {
            path: "arguments".to_string(),
            expected: SchemaType::Object,
            found: json_type_name(&other),
        }),
    }
}
