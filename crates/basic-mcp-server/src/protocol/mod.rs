//! MCP protocol handling: handshake, routing, and wire mapping.

pub mod handler;
pub mod negotiation;
pub mod validator;

pub use handler::ProtocolHandler;
