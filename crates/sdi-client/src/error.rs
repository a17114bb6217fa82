//! Unified error type for the SDI client.

use sdi_protocol::ProtocolError;
use sdi_transport::TransportError;
use sdi_world::RegistryError;

/// Top-level error that wraps every crate-specific error.
///
/// The `#[from]` variants let `?` lift protocol, transport and registry
/// errors without conversion code at the call site.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The byte stream or a decoded field was malformed.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The connection failed or was closed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A packet referenced an entity id the registry cannot hold.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// A JSON config document could not be parsed.
    #[error("invalid config: {0}")]
    ConfigFormat(#[from] serde_json::Error),

    /// A config value is out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("could not read config file {path}: {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not start network runtime: {0}")]
    Runtime(#[source] std::io::Error),

    /// The session ended with a fatal fault.
    #[error("session faulted: {0}")]
    Faulted(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_protocol_error() {
        let err: ClientError = ProtocolError::UnknownOpcode(99).into();
        assert!(matches!(err, ClientError::Protocol(_)));
        assert_eq!(err.to_string(), "unknown opcode 99");
    }

    #[test]
    fn test_from_transport_error() {
        let err: ClientError = TransportError::ConnectionClosed.into();
        assert!(matches!(err, ClientError::Transport(_)));
        assert_eq!(err.to_string(), "connection closed by server");
    }

    #[test]
    fn test_from_registry_error() {
        let err: ClientError = RegistryError::IdOutOfRange {
            id: 4096,
            capacity: 2048,
        }
        .into();
        assert!(matches!(err, ClientError::Registry(_)));
        assert!(err.to_string().contains("4096"));
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: ClientError = json_err.into();
        assert!(err.to_string().starts_with("invalid config: "));
    }
}
