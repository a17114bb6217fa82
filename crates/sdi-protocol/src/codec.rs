//! Frame codec: incremental decoding of the inbound stream and encoding of
//! outbound packets.
//!
//! The inbound stream arrives in arbitrary chunks. The connection appends
//! each chunk to one `BytesMut` and hands it to the [`FrameDecoder`], which
//! consumes whole frames from the front and leaves any trailing partial frame
//! in place for the next call. The decoder remembers whether it has already
//! consumed the opcode of the partial frame, so a frame split between the
//! opcode byte and its payload resumes correctly.

use bytes::{Buf, Bytes, BytesMut};

use crate::{InboundKind, InboundPacket, OutboundPacket, ProtocolError};

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Appends the opcode byte and payload of `packet` to `dst`.
pub fn encode(packet: &OutboundPacket, dst: &mut BytesMut) {
    dst.reserve(1 + packet.payload_len());
    dst.extend_from_slice(&[packet.opcode()]);
    packet.write_payload(dst);
}

/// Encodes a single packet into its own buffer.
pub fn encode_to_bytes(packet: &OutboundPacket) -> Bytes {
    let mut buf = BytesMut::with_capacity(1 + packet.payload_len());
    encode(packet, &mut buf);
    buf.freeze()
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum DecodeState {
    #[default]
    AwaitingOpcode,
    AwaitingPayload(InboundKind),
    /// An unknown opcode was seen. Nothing after it can be framed.
    Faulted,
}

/// Per-connection framing state machine.
///
/// One decoder belongs to exactly one connection and is created fresh for
/// it. It never resynchronizes: after the first error every further call
/// returns [`ProtocolError::DecoderFaulted`].
#[derive(Debug, Default)]
pub struct FrameDecoder {
    state: DecodeState,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tries to take one complete frame off the front of `src`.
    ///
    /// Returns `Ok(None)` when `src` does not yet hold a complete frame; any
    /// bytes already consumed (a lone opcode) are remembered in the decoder,
    /// and the rest stay in `src`.
    ///
    /// # Errors
    /// [`ProtocolError::UnknownOpcode`] when the next opcode byte is not in
    /// the catalog; [`ProtocolError::DecoderFaulted`] on any call after that.
    pub fn decode(&mut self, src: &mut BytesMut) -> Result<Option<InboundPacket>, ProtocolError> {
        loop {
            match self.state {
                DecodeState::AwaitingOpcode => {
                    if !src.has_remaining() {
                        return Ok(None);
                    }
                    let opcode = src.get_u8();
                    match InboundKind::from_opcode(opcode) {
                        Some(kind) => {
                            tracing::trace!(%kind, opcode, "opcode read, awaiting payload");
                            self.state = DecodeState::AwaitingPayload(kind);
                        }
                        None => {
                            tracing::debug!(opcode, "unknown opcode, stream is corrupt");
                            self.state = DecodeState::Faulted;
                            return Err(ProtocolError::UnknownOpcode(opcode));
                        }
                    }
                }
                DecodeState::AwaitingPayload(kind) => {
                    let size = kind.payload_size();
                    if src.len() < size {
                        return Ok(None);
                    }
                    let payload = src.split_to(size).freeze();
                    self.state = DecodeState::AwaitingOpcode;
                    return InboundPacket::new(kind, payload).map(Some);
                }
                DecodeState::Faulted => return Err(ProtocolError::DecoderFaulted),
            }
        }
    }

    /// Iterates over every complete frame currently in `src`.
    ///
    /// The iterator is lazy: frames are cut from `src` only as it is
    /// advanced. It ends when `src` runs dry, and after yielding an error.
    pub fn frames<'a>(&'a mut self, src: &'a mut BytesMut) -> Frames<'a> {
        Frames {
            decoder: self,
            src,
            done: false,
        }
    }

    /// Whether an opcode has been consumed and its payload is still pending.
    pub fn is_mid_frame(&self) -> bool {
        matches!(self.state, DecodeState::AwaitingPayload(_))
    }

    /// Whether the decoder has hit a framing error.
    pub fn is_faulted(&self) -> bool {
        self.state == DecodeState::Faulted
    }
}

/// Iterator returned by [`FrameDecoder::frames`].
pub struct Frames<'a> {
    decoder: &'a mut FrameDecoder,
    src: &'a mut BytesMut,
    done: bool,
}

impl Iterator for Frames<'_> {
    type Item = Result<InboundPacket, ProtocolError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.decoder.decode(self.src) {
            Ok(Some(packet)) => Some(Ok(packet)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
