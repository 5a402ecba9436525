//! Tool: echo. Returns the message unchanged.

use serde::Deserialize;
use serde_json::Value;

use mcp_dispatch::{Arguments, CapabilityDescriptor, ContentItem, HandlerResult, SchemaNode};

#[derive(Debug, Deserialize)]
struct EchoParams {
    message: String,
}

pub fn definition() -> CapabilityDescriptor {
    CapabilityDescriptor::new(
        "echo",
        "Return the given message unchanged",
        SchemaNode::object()
            .property("message", SchemaNode::string().describe("Message to echo back"))
            .require(["message"]),
    )
}

pub async fn execute(args: Arguments) -> HandlerResult {
    let params: EchoParams = serde_json::from_value(Value::Object(args))?;
    Ok(vec![ContentItem::text(params.message)])
}
