//! Built-in tools.

pub mod add;
pub mod calculate;
pub mod current_time;
pub mod echo;
pub mod expression;
pub mod hello;
pub mod registry;

pub use registry::ToolRegistry;
