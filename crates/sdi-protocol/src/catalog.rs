//! The packet catalog: every inbound packet kind and its fixed layout.

use std::fmt;

/// A server → client packet kind.
///
/// The discriminant is the opcode byte on the wire. Each kind has a payload
/// of fixed length, so the opcode alone tells the decoder how many bytes
/// belong to the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum InboundKind {
    /// `players: u8` still needed before the round starts.
    Waiting = 1,
    /// `entity_id: u32` of the local player; the round has started.
    Start = 2,
    /// `id: u32, x: f64, y: f64, direction: u8, texture: u32`.
    Create = 3,
    /// `id: u32`.
    Destroy = 4,
    /// `id: u32, x: f64, y: f64`.
    Position = 5,
    /// `id: u32, direction: u8`.
    Direction = 6,
    /// `id: u32, texture: u32`.
    Texture = 7,
    /// `health: f32, flight_charge: f32, powerup_charges: [f32; 5]`.
    Interface = 8,
}

impl InboundKind {
    /// All kinds, in opcode order.
    pub const ALL: [InboundKind; 8] = [
        InboundKind::Waiting,
        InboundKind::Start,
        InboundKind::Create,
        InboundKind::Destroy,
        InboundKind::Position,
        InboundKind::Direction,
        InboundKind::Texture,
        InboundKind::Interface,
    ];

    /// Looks up the kind for an opcode byte.
    pub const fn from_opcode(opcode: u8) -> Option<Self> {
        match opcode {
            1 => Some(Self::Waiting),
            2 => Some(Self::Start),
            3 => Some(Self::Create),
            4 => Some(Self::Destroy),
            5 => Some(Self::Position),
            6 => Some(Self::Direction),
            7 => Some(Self::Texture),
            8 => Some(Self::Interface),
            _ => None,
        }
    }

    /// The opcode byte that introduces this kind on the wire.
    pub const fn opcode(self) -> u8 {
        self as u8
    }

    /// Length of the payload that follows the opcode, in bytes.
    pub const fn payload_size(self) -> usize {
        match self {
            Self::Waiting => 1,
            Self::Start => 4,
            Self::Create => 25,
            Self::Destroy => 4,
            Self::Position => 20,
            Self::Direction => 5,
            Self::Texture => 8,
            Self::Interface => 28,
        }
    }

    /// Upper-case name used in logs and error messages.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Waiting => "WAITING",
            Self::Start => "START",
            Self::Create => "CREATE",
            Self::Destroy => "DESTROY",
            Self::Position => "POSITION",
            Self::Direction => "DIRECTION",
            Self::Texture => "TEXTURE",
            Self::Interface => "INTERFACE",
        }
    }
}

impl fmt::Display for InboundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolves an opcode byte to its packet kind, or `None` if the byte is not
/// a known opcode.
pub fn kind_for_opcode(byte: u8) -> Option<InboundKind> {
    InboundKind::from_opcode(byte)
}
