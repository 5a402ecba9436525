//! Capability registry, argument validation and request dispatch for MCP
//! servers.

pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod registry;
pub mod schema;
pub mod types;
pub mod validator;

pub use dispatcher::{Dispatcher, DispatcherBuilder};
pub use error::{DispatchError, DispatchResult, ErrorKind, HandlerError, RegistryError, ValidationError};
pub use handler::{CapabilityHandler, FnHandler, HandlerResult, HandlerTable};
pub use registry::CapabilityRegistry;
pub use schema::{SchemaNode, SchemaType};
pub use types::*;
pub use validator::validate;
