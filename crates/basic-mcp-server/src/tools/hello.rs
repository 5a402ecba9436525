//! Tool: hello

use serde::Deserialize;
use serde_json::Value;

use mcp_dispatch::{Arguments, CapabilityDescriptor, ContentItem, HandlerResult, SchemaNode};

#[derive(Debug, Deserialize)]
struct HelloParams {
    name: String,
}

pub fn definition() -> CapabilityDescriptor {
    CapabilityDescriptor::new(
        "hello",
        "Greet someone by name",
        SchemaNode::object()
            .property("name", SchemaNode::string().describe("Name of the person to greet"))
            .require(["name"]),
    )
}

pub async fn execute(args: Arguments) -> HandlerResult {
    let params: HelloParams = serde_json::from_value(Value::Object(args))?;
    Ok(vec![ContentItem::text(format!(
        "Hello, {}! Greetings from the basic MCP server.",
        params.name
    ))])
}
