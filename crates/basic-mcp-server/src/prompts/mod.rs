//! Built-in prompts.

pub mod greeting;
pub mod registry;

pub use registry::PromptRegistry;
