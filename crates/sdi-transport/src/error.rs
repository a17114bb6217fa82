use sdi_protocol::ProtocolError;

/// Errors that end a transport session.
///
/// Every variant is fatal: the session reports it once through its
/// [`FatalHandler`](crate::FatalHandler) and stops doing I/O.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The host name did not resolve to any address.
    #[error("could not resolve {0}")]
    Unresolved(String),

    /// Establishing the TCP connection failed.
    #[error("could not connect to {target}: {source}")]
    ConnectFailed {
        target: String,
        #[source]
        source: std::io::Error,
    },

    /// Reading from the socket failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),

    /// Writing or flushing the socket failed.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    /// The server closed the stream.
    #[error("connection closed by server")]
    ConnectionClosed,

    /// The inbound stream violated the wire format.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
