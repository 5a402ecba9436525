//! Resource: json://server_info, runtime metadata as JSON.

use std::sync::Arc;

use chrono::{DateTime, Local};
use serde_json::json;

use mcp_dispatch::{
    Arguments, CapabilityDescriptor, CapabilityHandler, ContentItem, FnHandler, HandlerError, SchemaNode,
};

use crate::config::ServerConfig;

pub const URI: &str = "json://server_info";
const MIME_TYPE: &str = "application/json";

pub fn definition() -> CapabilityDescriptor {
    CapabilityDescriptor::new(URI, "Server name, version, and enabled capabilities", SchemaNode::object())
        .with_title("Server information")
        .with_mime_type(MIME_TYPE)
}

/// Handler bound to the resolved configuration. `created_at` is the moment
/// the handler was built, i.e. server start.
pub fn handler(config: Arc<ServerConfig>) -> impl CapabilityHandler {
    let started: DateTime<Local> = Local::now();
    FnHandler::new(move |_args: Arguments| {
        let config = Arc::clone(&config);
        async move {
            let body = render(&config, &started)?;
            Ok::<_, HandlerError>(vec![ContentItem::text_with_mime(body, MIME_TYPE)])
        }
    })
}

fn render(config: &ServerConfig, started: &DateTime<Local>) -> Result<String, HandlerError> {
    let capabilities: Vec<&str> = config.capabilities.iter().map(|c| c.plural()).collect();
    let info = json!({
        "name": config.name,
        "version": config.version,
        "description": config.instructions,
        "capabilities": capabilities,
        "created_at": started.to_rfc3339(),
    });
    Ok(serde_json::to_string_pretty(&info)?)
}
