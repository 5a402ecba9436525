//! Structural argument validation against a [`SchemaNode`].
//!
//! Validation never runs handler logic and never mutates the arguments.
//! Absent arguments are validated as an empty mapping.

use serde_json::{Map, Value};

use crate::error::ValidationError;
use crate::schema::{json_type_name, SchemaNode, SchemaType};
use crate::types::Arguments;

const ROOT: &str = "arguments";

/// Validate a request's arguments against a capability's input schema.
pub fn validate(schema: &SchemaNode, arguments: Option<&Arguments>) -> Result<(), ValidationError> {
    let empty = Map::new();
    let arguments = arguments.unwrap_or(&empty);

    if let Some(expected) = schema.schema_type {
        if expected != SchemaType::Object {
            return Err(ValidationError::TypeMismatch {
                path: ROOT.to_string(),
                expected,
                found: "object",
            });
        }
    }

    check_object(schema, arguments, "")
}

fn check_value(schema: &SchemaNode, value: &Value, path: &str) -> Result<(), ValidationError> {
    if let Some(expected) = schema.schema_type {
        if !expected.matches(value) {
            return Err(ValidationError::TypeMismatch {
                path: display_path(path),
                expected,
                found: json_type_name(value),
            });
        }
    }

    if let Some(allowed) = &schema.enum_values {
        if !allowed.contains(value) {
            return Err(ValidationError::NotAllowedEnum {
                path: display_path(path),
                allowed: render_allowed(allowed),
            });
        }
    }

    match value {
        Value::Object(map) => check_object(schema, map, path),
        Value::Array(items) => match &schema.items {
            Some(item_schema) => items
                .iter()
                .enumerate()
                .try_for_each(|(i, item)| check_value(item_schema, item, &format!("{path}[{i}]"))),
            None => Ok(()),
        },
        _ => Ok(()),
    }
}

fn check_object(
    schema: &SchemaNode,
    map: &Map<String, Value>,
    path: &str,
) -> Result<(), ValidationError> {
    for name in &schema.required {
        if !map.contains_key(name) {
            return Err(ValidationError::MissingRequired {
                path: join(path, name),
            });
        }
    }

    for (name, property) in &schema.properties {
        if let Some(value) = map.get(name) {
            check_value(property, value, &join(path, name))?;
        }
    }

    if !schema.allows_additional() {
        let mut extra: Vec<&String> = map
            .keys()
            .filter(|k| !schema.properties.contains_key(*k))
            .collect();
        extra.sort();
        if let Some(name) = extra.first() {
            return Err(ValidationError::UnexpectedProperty {
                path: join(path, name),
            });
        }
    }

    Ok(())
}

fn join(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{path}.{name}")
    }
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        ROOT.to_string()
    } else {
        path.to_string()
    }
}

fn render_allowed(allowed: &[Value]) -> String {
    let items: Vec<String> = allowed.iter().map(Value::to_string).collect();
    format!("[{}]", items.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> Arguments {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn add_schema() -> SchemaNode {
        SchemaNode::object()
            .property("a", SchemaNode::number())
            .property("b", SchemaNode::number())
            .require(["a", "b"])
    }

    #[test]
    fn test_conforming_arguments_pass() {
        let a = args(json!({ "a": 2, "b": 3.5 }));
        assert_eq!(validate(&add_schema(), Some(&a)), Ok(()));
    }

    #[test]
    fn test_missing_required() {
        let a = args(json!({ "a": 2 }));
        let err = validate(&add_schema(), Some(&a)).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingRequired {
                path: "b".to_string()
            }
        );
    }

    #[test]
    fn test_required_checked_in_schema_order() {
        let err = validate(&add_schema(), None).unwrap_err();
        assert_eq!(err.path(), "a");
    }

    #[test]
    fn test_absent_arguments_ok_without_required_keys() {
        let schema = SchemaNode::object().property("format", SchemaNode::string());
        assert_eq!(validate(&schema, None), Ok(()));
    }

    #[test]
    fn test_type_mismatch() {
        let a = args(json!({ "a": "2", "b": 3 }));
        let err = validate(&add_schema(), Some(&a)).unwrap_err();
        assert_eq!(
            err,
            ValidationError::TypeMismatch {
                path: "a".to_string(),
                expected: SchemaType::Number,
                found: "string",
            }
        );
        assert_eq!(err.to_string(), "argument `a` must be of type number, got string");
    }

    #[test]
    fn test_null_is_not_a_number() {
        let a = args(json!({ "a": null, "b": 3 }));
        let err = validate(&add_schema(), Some(&a)).unwrap_err();
        assert!(matches!(err, ValidationError::TypeMismatch { found: "null", .. }));
    }

    #[test]
    fn test_enum_rejects_unlisted_value() {
        let schema = SchemaNode::object().property(
            "format",
            SchemaNode::string().one_of(["iso", "japanese"]).with_default("iso"),
        );
        let a = args(json!({ "format": "rfc2822" }));
        let err = validate(&schema, Some(&a)).unwrap_err();
        assert_eq!(
            err,
            ValidationError::NotAllowedEnum {
                path: "format".to_string(),
                allowed: r#"["iso", "japanese"]"#.to_string(),
            }
        );

        let ok = args(json!({ "format": "japanese" }));
        assert_eq!(validate(&schema, Some(&ok)), Ok(()));
    }

    #[test]
    fn test_closed_schema_rejects_extra_keys() {
        let schema = SchemaNode::object().closed();
        let a = args(json!({ "zeta": 1, "alpha": 2 }));
        let err = validate(&schema, Some(&a)).unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnexpectedProperty {
                path: "alpha".to_string()
            }
        );
    }

    #[test]
    fn test_open_schema_ignores_extra_keys() {
        let a = args(json!({ "a": 1, "b": 2, "c": "anything" }));
        assert_eq!(validate(&add_schema(), Some(&a)), Ok(()));
    }

    #[test]
    fn test_nested_paths() {
        let schema = SchemaNode::object().property(
            "filter",
            SchemaNode::object()
                .property("tags", SchemaNode::array(SchemaNode::string()))
                .require(["tags"]),
        );

        let missing = args(json!({ "filter": {} }));
        assert_eq!(
            validate(&schema, Some(&missing)).unwrap_err().path(),
            "filter.tags"
        );

        let bad_item = args(json!({ "filter": { "tags": ["ok", 7] } }));
        let err = validate(&schema, Some(&bad_item)).unwrap_err();
        assert_eq!(err.path(), "filter.tags[1]");
    }

    #[test]
    fn test_validation_does_not_mutate() {
        let a = args(json!({ "a": 1, "b": 2 }));
        let before = a.clone();
        let _ = validate(&add_schema(), Some(&a));
        assert_eq!(a, before);
    }

    #[test]
    fn test_non_object_root_schema() {
        let schema = SchemaNode::string();
        let err = validate(&schema, None).unwrap_err();
        assert_eq!(err.path(), "arguments");
    }
}
