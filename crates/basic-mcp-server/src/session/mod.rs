//! Session lifecycle.

pub mod manager;

pub use manager::{Session, SessionManager, SessionState};
