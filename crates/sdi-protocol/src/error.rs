//! Error types for the protocol layer.
//!
//! A `ProtocolError` always means the byte stream (or a packet carried by
//! it) disagrees with the wire format. None of these are recoverable: the
//! session that produced one is torn down.

use crate::InboundKind;

/// Errors that can occur while framing or interpreting packets.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// The opcode byte does not name any inbound packet kind.
    ///
    /// The stream carries no length prefixes, so there is no way to skip
    /// past the unknown frame.
    #[error("unknown opcode {0}")]
    UnknownOpcode(u8),

    /// A payload did not have the fixed length its kind requires.
    #[error("{kind} payload must be {expected} bytes, got {actual}")]
    PayloadSize {
        kind: InboundKind,
        expected: usize,
        actual: usize,
    },

    /// The packet framed correctly but one of its fields is out of range,
    /// e.g. a facing direction ordinal above 3.
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// The decoder was asked for more frames after it had already failed.
    #[error("frame decoder is faulted")]
    DecoderFaulted,
}
