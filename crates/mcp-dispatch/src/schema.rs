//! Declarative input schemas for capabilities.
//!
//! A [`SchemaNode`] is the subset of JSON Schema that the validator
//! understands: `type`, `properties`, `required`, `enum`, `default`,
//! `items`, and `additionalProperties`. It round-trips through serde so the
//! same node is advertised in `tools/list` and used for validation.
//!
//! ```
//! use mcp_dispatch::schema::SchemaNode;
//!
//! let schema = SchemaNode::object()
//!     .property("a", SchemaNode::number().describe("First operand"))
//!     .property("b", SchemaNode::number().describe("Second operand"))
//!     .require(["a", "b"]);
//! assert_eq!(schema.required, vec!["a".to_string(), "b".to_string()]);
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON value types a schema node may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
    Null,
}

impl SchemaType {
    /// Whether `value` has this runtime type. `integer` only accepts
    /// integral numbers; `number` accepts any number.
    pub fn matches(self, value: &Value) -> bool {
        match self {
            SchemaType::String => value.is_string(),
            SchemaType::Number => value.is_number(),
            SchemaType::Integer => match value {
                Value::Number(n) => {
                    n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0)
                }
                _ => false,
            },
            SchemaType::Boolean => value.is_boolean(),
            SchemaType::Array => value.is_array(),
            SchemaType::Object => value.is_object(),
            SchemaType::Null => value.is_null(),
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SchemaType::String => "string",
            SchemaType::Number => "number",
            SchemaType::Integer => "integer",
            SchemaType::Boolean => "boolean",
            SchemaType::Array => "array",
            SchemaType::Object => "object",
            SchemaType::Null => "null",
        };
        f.write_str(name)
    }
}

/// Name of the runtime JSON type of `value`, as used in error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A recursive schema description. Used only for validation, never executed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaNode {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, SchemaNode>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaNode>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<bool>,
}

impl SchemaNode {
    pub fn of_type(schema_type: SchemaType) -> Self {
        Self {
            schema_type: Some(schema_type),
            ..Self::default()
        }
    }

    pub fn object() -> Self {
        Self::of_type(SchemaType::Object)
    }

    pub fn string() -> Self {
        Self::of_type(SchemaType::String)
    }

    pub fn number() -> Self {
        Self::of_type(SchemaType::Number)
    }

    pub fn integer() -> Self {
        Self::of_type(SchemaType::Integer)
    }

    pub fn boolean() -> Self {
        Self::of_type(SchemaType::Boolean)
    }

    pub fn array(items: SchemaNode) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::of_type(SchemaType::Array)
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn property(mut self, name: impl Into<String>, schema: SchemaNode) -> Self {
        self.properties.insert(name.into(), schema);
        self
    }

    /// Mark keys as required. Duplicates are ignored.
    pub fn require<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let name = name.into();
            if !self.required.contains(&name) {
                self.required.push(name);
            }
        }
        self
    }

    pub fn one_of<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn closed(mut self) -> Self {
        self.additional_properties = Some(false);
        self
    }

    /// Parse a JSON Schema object. Unknown `type` names are rejected.
    pub fn from_json(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }

    /// Whether keys not listed in `properties` are allowed.
    pub fn allows_additional(&self) -> bool {
        self.additional_properties.unwrap_or(true)
    }
}
