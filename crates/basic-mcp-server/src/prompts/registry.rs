//! Prompt registration.

use mcp_dispatch::{DispatcherBuilder, FnHandler, RegistryError};

use super::greeting;

pub struct PromptRegistry;

impl PromptRegistry {
    pub fn register(builder: DispatcherBuilder) -> Result<DispatcherBuilder, RegistryError> {
        builder.prompt(greeting::definition(), FnHandler::new(greeting::expand))
    }
}
