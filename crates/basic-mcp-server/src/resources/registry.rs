//! Resource registration. Descriptor names are the resource URIs.

use std::sync::Arc;

use mcp_dispatch::{DispatcherBuilder, FnHandler, RegistryError};

use crate::config::ServerConfig;

use super::{server_info, welcome};

pub struct ResourceRegistry;

impl ResourceRegistry {
    pub fn register(
        builder: DispatcherBuilder,
        config: &Arc<ServerConfig>,
    ) -> Result<DispatcherBuilder, RegistryError> {
        builder
            .resource(welcome::definition(), FnHandler::new(welcome::read))?
            .resource(server_info::definition(), server_info::handler(Arc::clone(config)))
    }
}
