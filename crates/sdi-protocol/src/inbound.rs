//! Inbound packets: a framed payload, and the typed view of its fields.
//!
//! The decoder produces [`InboundPacket`]s, which are just `(kind, bytes)`.
//! The consumer turns each one into an [`InboundMessage`] exactly once;
//! [`InboundPacket::into_message`] takes the packet by value, so the payload
//! buffer is released as soon as its fields have been read.

use bytes::{Buf, Bytes};

use crate::{InboundKind, ProtocolError};

/// Number of powerup charge slots in an INTERFACE packet.
pub const POWERUP_SLOTS: usize = 5;

/// One complete frame received from the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundPacket {
    kind: InboundKind,
    payload: Bytes,
}

impl InboundPacket {
    /// Wraps a payload, checking it is exactly as long as `kind` requires.
    ///
    /// # Errors
    /// Returns [`ProtocolError::PayloadSize`] on a length mismatch.
    pub fn new(kind: InboundKind, payload: Bytes) -> Result<Self, ProtocolError> {
        if payload.len() != kind.payload_size() {
            return Err(ProtocolError::PayloadSize {
                kind,
                expected: kind.payload_size(),
                actual: payload.len(),
            });
        }
        Ok(Self { kind, payload })
    }

    pub fn kind(&self) -> InboundKind {
        self.kind
    }

    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Reads the payload fields in wire order, consuming the packet.
    ///
    /// Field reads cannot run short: the payload length was checked against
    /// the kind when the packet was built.
    pub fn into_message(self) -> InboundMessage {
        let mut buf = self.payload;

        match self.kind {
            InboundKind::Waiting => InboundMessage::Waiting {
                players: buf.get_u8(),
            },
            InboundKind::Start => InboundMessage::Start {
                entity_id: buf.get_u32(),
            },
            InboundKind::Create => InboundMessage::Create {
                id: buf.get_u32(),
                x: buf.get_f64(),
                y: buf.get_f64(),
                direction: buf.get_u8(),
                texture: buf.get_u32(),
            },
            InboundKind::Destroy => InboundMessage::Destroy { id: buf.get_u32() },
            InboundKind::Position => InboundMessage::Position {
                id: buf.get_u32(),
                x: buf.get_f64(),
                y: buf.get_f64(),
            },
            InboundKind::Direction => InboundMessage::Direction {
                id: buf.get_u32(),
                direction: buf.get_u8(),
            },
            InboundKind::Texture => InboundMessage::Texture {
                id: buf.get_u32(),
                texture: buf.get_u32(),
            },
            InboundKind::Interface => {
                let health = buf.get_f32();
                let flight_charge = buf.get_f32();
                let mut powerup_charges = [0.0; POWERUP_SLOTS];
                for charge in &mut powerup_charges {
                    *charge = buf.get_f32();
                }
                InboundMessage::Interface(HudValues {
                    health,
                    flight_charge,
                    powerup_charges,
                })
            }
        }
    }
}

/// HUD values carried by an INTERFACE packet.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HudValues {
    pub health: f32,
    pub flight_charge: f32,
    pub powerup_charges: [f32; POWERUP_SLOTS],
}

/// The decoded fields of an inbound packet.
///
/// Directions are left as the raw ordinal byte; mapping them onto a facing
/// (and rejecting bad ordinals) belongs to whoever owns the entity model.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    Waiting {
        players: u8,
    },
    Start {
        entity_id: u32,
    },
    Create {
        id: u32,
        x: f64,
        y: f64,
        direction: u8,
        texture: u32,
    },
    Destroy {
        id: u32,
    },
    Position {
        id: u32,
        x: f64,
        y: f64,
    },
    Direction {
        id: u32,
        direction: u8,
    },
    Texture {
        id: u32,
        texture: u32,
    },
    Interface(HudValues),
}
