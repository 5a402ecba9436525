//! Tool: add

use serde::Deserialize;
use serde_json::Value;

use mcp_dispatch::{Arguments, CapabilityDescriptor, ContentItem, HandlerResult, SchemaNode};

#[derive(Debug, Deserialize)]
struct AddParams {
    a: f64,
    b: f64,
}

pub fn definition() -> CapabilityDescriptor {
    CapabilityDescriptor::new(
        "add",
        "Add two numbers",
        SchemaNode::object()
            .property("a", SchemaNode::number().describe("First number"))
            .property("b", SchemaNode::number().describe("Second number"))
            .require(["a", "b"]),
    )
}

pub async fn execute(args: Arguments) -> HandlerResult {
    let AddParams { a, b } = serde_json::from_value(Value::Object(args))?;
    Ok(vec![ContentItem::text(format!("{a} + {b} = {}", a + b))])
}
