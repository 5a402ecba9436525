//! Handshake negotiation: protocol revision and advertised capabilities.

use crate::config::ServerConfig;
use crate::session::Session;
use crate::types::{
    Implementation, InitializeParams, InitializeResult, ServerCapabilities, LATEST_PROTOCOL_VERSION,
    SUPPORTED_PROTOCOL_VERSIONS,
};

/// Echo the client's revision when supported, otherwise offer our latest.
pub fn negotiate_version(requested: &str) -> &'static str {
    match SUPPORTED_PROTOCOL_VERSIONS
        .iter()
        .copied()
        .find(|v| *v == requested)
    {
        Some(v) => v,
        None => {
            tracing::warn!(
                "Client requested protocol version {requested}, which is not supported. \
                 Offering {LATEST_PROTOCOL_VERSION}."
            );
            LATEST_PROTOCOL_VERSION
        }
    }
}

/// Build the session and the reply for an `initialize` request.
pub fn negotiate(params: InitializeParams, config: &ServerConfig) -> (Session, InitializeResult) {
    let protocol_version = negotiate_version(&params.protocol_version).to_string();

    let result = InitializeResult {
        protocol_version: protocol_version.clone(),
        capabilities: ServerCapabilities::advertise(config.capabilities),
        server_info: Implementation {
            name: config.name.clone(),
            version: config.version.clone(),
        },
        instructions: config.instructions.clone(),
    };

    let session = Session {
        protocol_version,
        client_info: params.client_info,
        client_capabilities: params.capabilities,
        negotiated_capabilities: config.capabilities,
    };

    (session, result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CategorySet;
    use crate::types::ClientCapabilities;

    fn params(version: &str) -> InitializeParams {
        InitializeParams {
            protocol_version: version.to_string(),
            capabilities: ClientCapabilities::default(),
            client_info: Implementation {
                name: "client".into(),
                version: "0.1".into(),
            },
        }
    }

    #[test]
    fn test_supported_version_is_echoed() {
        assert_eq!(negotiate_version("2024-11-05"), "2024-11-05");
        assert_eq!(negotiate_version("2025-03-26"), "2025-03-26");
    }

    #[test]
    fn test_unknown_version_gets_latest() {
        assert_eq!(negotiate_version("1999-01-01"), LATEST_PROTOCOL_VERSION);
        assert_eq!(negotiate_version(""), LATEST_PROTOCOL_VERSION);
    }

    #[test]
    fn test_result_reflects_config() {
        let config = ServerConfig {
            name: "renamed".into(),
            capabilities: CategorySet::all().without(mcp_dispatch::Category::Prompt),
            ..ServerConfig::default()
        };
        let (session, result) = negotiate(params("2025-06-18"), &config);

        assert_eq!(result.server_info.name, "renamed");
        assert_eq!(result.protocol_version, "2025-06-18");
        assert!(result.capabilities.prompts.is_none());
        assert!(result.capabilities.tools.is_some());
        assert_eq!(session.client_info.name, "client");
        assert!(!session.negotiated_capabilities.prompts);
    }
}
