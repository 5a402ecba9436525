//! Basic MCP server: demonstration tools, resources, and prompts over stdio.

pub mod config;
pub mod prompts;
pub mod protocol;
pub mod repl;
pub mod resources;
pub mod session;
pub mod tools;
pub mod transport;
pub mod types;

use std::sync::Arc;

use mcp_dispatch::{Dispatcher, RegistryError};

pub use config::ServerConfig;
pub use protocol::ProtocolHandler;
pub use session::SessionManager;
pub use transport::StdioTransport;

use prompts::PromptRegistry;
use resources::ResourceRegistry;
use tools::ToolRegistry;

/// Register every built-in capability. Disabled categories are still
/// registered; the protocol layer decides what is served.
pub fn build_dispatcher(config: &Arc<ServerConfig>) -> Result<Dispatcher, RegistryError> {
    let builder = Dispatcher::builder();
    let builder = ToolRegistry::register(builder)?;
    let builder = ResourceRegistry::register(builder, config)?;
    let builder = PromptRegistry::register(builder)?;
    builder.build()
}

/// Build a protocol handler over the built-in catalog.
pub fn build_handler(config: ServerConfig) -> Result<ProtocolHandler, RegistryError> {
    let config = Arc::new(config);
    let dispatcher = Arc::new(build_dispatcher(&config)?);
    Ok(ProtocolHandler::new(dispatcher, config))
}
