//! Resource: text://welcome

use mcp_dispatch::{Arguments, CapabilityDescriptor, ContentItem, HandlerResult, SchemaNode};

pub const URI: &str = "text://welcome";
const MIME_TYPE: &str = "text/plain";

const WELCOME: &str = "Welcome to the basic MCP server!\n\
\n\
This server demonstrates the three MCP capability types:\n\
- tools: echo, add, hello, calculate, current_time\n\
- resources: text://welcome, json://server_info\n\
- prompts: greeting\n";

pub fn definition() -> CapabilityDescriptor {
    CapabilityDescriptor::new(URI, "Introductory text for new clients", SchemaNode::object())
        .with_title("Welcome message")
        .with_mime_type(MIME_TYPE)
}

pub async fn read(_args: Arguments) -> HandlerResult {
    Ok(vec![ContentItem::text_with_mime(WELCOME, MIME_TYPE)])
}
