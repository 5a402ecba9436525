//! Tool registration.

use mcp_dispatch::{DispatcherBuilder, FnHandler, RegistryError};

use super::{add, calculate, current_time, echo, hello};

pub struct ToolRegistry;

impl ToolRegistry {
    /// Register every built-in tool, in listing order.
    pub fn register(builder: DispatcherBuilder) -> Result<DispatcherBuilder, RegistryError> {
        builder
            .tool(echo::definition(), FnHandler::new(echo::execute))?
            .tool(add::definition(), FnHandler::new(add::execute))?
            .tool(hello::definition(), FnHandler::new(hello::execute))?
            .tool(calculate::definition(), FnHandler::new(calculate::execute))?
            .tool(current_time::definition(), FnHandler::new(current_time::execute))
    }
}
