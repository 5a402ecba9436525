//! Built-in resources.

pub mod registry;
pub mod server_info;
pub mod welcome;

pub use registry::ResourceRegistry;
