//! Outbound packets: local player intents bound for the server.

use bitflags::bitflags;
use bytes::BufMut;

bitflags! {
    /// Movement keys held this tick, one bit per direction.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MovementKeys: u8 {
        const LEFT = 1 << 0;
        const RIGHT = 1 << 1;
        const UP = 1 << 2;
        const DOWN = 1 << 3;
    }
}

/// A client → server packet.
///
/// Outbound payloads have a fixed length per opcode, known to both ends, so
/// they are written without a length prefix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutboundPacket {
    /// Which movement keys are held. Opcode 1, 1-byte bitmask.
    Movement(MovementKeys),
    /// Attack towards a point in world coordinates. Opcode 2, two `f64`.
    Attack { target_x: f64, target_y: f64 },
    /// Start flying. Opcode 3, empty payload.
    Fly,
}

impl OutboundPacket {
    pub const MOVEMENT_OPCODE: u8 = 1;
    pub const ATTACK_OPCODE: u8 = 2;
    pub const FLY_OPCODE: u8 = 3;

    pub fn opcode(&self) -> u8 {
        match self {
            Self::Movement(_) => Self::MOVEMENT_OPCODE,
            Self::Attack { .. } => Self::ATTACK_OPCODE,
            Self::Fly => Self::FLY_OPCODE,
        }
    }

    /// Length of the payload written by [`write_payload`](Self::write_payload).
    pub fn payload_len(&self) -> usize {
        match self {
            Self::Movement(_) => 1,
            Self::Attack { .. } => 16,
            Self::Fly => 0,
        }
    }

    /// Writes this packet's payload (not the opcode) to `dst`.
    pub fn write_payload(&self, dst: &mut impl BufMut) {
        match *self {
            Self::Movement(keys) => dst.put_u8(keys.bits()),
            Self::Attack { target_x, target_y } => {
                dst.put_f64(target_x);
                dst.put_f64(target_y);
            }
            Self::Fly => {}
        }
    }
}
