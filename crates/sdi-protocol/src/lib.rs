//! Wire protocol for the SDI game client.
//!
//! This crate defines the bytes that travel between the client and the
//! game server:
//!
//! - **Catalog** ([`InboundKind`]): the eight server → client packet kinds,
//!   each with a fixed opcode and a fixed payload length.
//! - **Packets** ([`InboundPacket`], [`InboundMessage`], [`OutboundPacket`]) -
//!   framed payloads and their typed field views.
//! - **Codec** ([`FrameDecoder`], [`encode`]): incremental framing of the
//!   inbound byte stream and serialization of outbound intents.
//! - **Errors** ([`ProtocolError`]): everything that can be wrong with the
//!   stream itself.
//!
//! # Wire format
//!
//! Every frame is a single opcode byte followed by a payload whose length is
//! implied by the opcode. There is no length prefix, no checksum, and no
//! resynchronization marker: a single unknown opcode makes the rest of the
//! stream meaningless. All multi-byte numbers are big-endian.
//!
//! ```text
//! Transport (bytes) → FrameDecoder (InboundPacket) → dispatcher (InboundMessage)
//! ```

// ---------------------------------------------------------------------------
// Module declarations
// ---------------------------------------------------------------------------

mod catalog;
mod codec;
mod error;
mod inbound;
mod outbound;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use catalog::{InboundKind, kind_for_opcode};
pub use codec::{FrameDecoder, Frames, encode, encode_to_bytes};
pub use error::ProtocolError;
pub use inbound::{HudValues, InboundMessage, InboundPacket, POWERUP_SLOTS};
pub use outbound::{MovementKeys, OutboundPacket};
