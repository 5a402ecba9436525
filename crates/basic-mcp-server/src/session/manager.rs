//! Connection state: one handshake, then ready for the life of the process.

use std::sync::OnceLock;

use crate::config::CategorySet;
use crate::types::{ClientCapabilities, Implementation, McpError, McpResult};

/// The agreed terms of a connection. Fixed once the handshake succeeds.
#[derive(Debug, Clone)]
pub struct Session {
    pub protocol_version: String,
    pub client_info: Implementation,
    pub client_capabilities: ClientCapabilities,
    /// Categories advertised in the handshake reply.
    pub negotiated_capabilities: CategorySet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Ready,
}

/// Holds the session. `Uninitialized -> Ready` happens at most once and
/// never reverses.
#[derive(Debug, Default)]
pub struct SessionManager {
    session: OnceLock<Session>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        if self.session.get().is_some() {
            SessionState::Ready
        } else {
            SessionState::Uninitialized
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.get()
    }

    /// The session, or `NotInitialized` before the handshake.
    pub fn require_ready(&self) -> McpResult<&Session> {
        self.session.get().ok_or(McpError::NotInitialized)
    }

    /// Record a completed handshake. A second handshake is rejected and
    /// leaves the first session untouched.
    pub fn establish(&self, session: Session) -> McpResult<&Session> {
        let client = format!("{} v{}", session.client_info.name, session.client_info.version);
        let version = session.protocol_version.clone();
        self.session
            .set(session)
            .map_err(|_| McpError::InvalidRequest("session already initialized".to_string()))?;

        tracing::info!("Session ready: client {client}, protocol {version}");
        self.require_ready()
    }
}
