//! Applies inbound packets to the entity registry and the session view.
//!
//! The dispatcher is the only writer of world state. It takes each packet by
//! value, decodes its fields, applies the effect and drops the payload
//! buffer before returning.
//!
//! | Packet    | Effect                                              |
//! |-----------|-----------------------------------------------------|
//! | WAITING   | status line "Waiting for N more player(s)"          |
//! | START     | assign the local player id, switch to game screen   |
//! | CREATE    | `registry.create`                                   |
//! | DESTROY   | `registry.destroy`                                  |
//! | POSITION  | `registry.update_position`                          |
//! | DIRECTION | `registry.update_direction`                         |
//! | TEXTURE   | `registry.update_texture`                           |
//! | INTERFACE | replace the HUD snapshot                            |
//!
//! Updates and destroys for in-range ids that hold no entity are dropped.
//! Any packet naming an id outside the registry, or a direction ordinal
//! above 3, is an error and the caller treats it as fatal.

use sdi_protocol::{InboundMessage, InboundPacket, ProtocolError};
use sdi_world::{Direction, EntityRegistry};

use crate::{ClientError, SessionView};

/// Stateless packet applier.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProtocolDispatcher;

impl ProtocolDispatcher {
    pub fn new() -> Self {
        Self
    }

    /// Applies one packet. The packet and its payload are consumed.
    pub fn apply(
        &self,
        packet: InboundPacket,
        registry: &mut EntityRegistry,
        session: &mut SessionView,
    ) -> Result<(), ClientError> {
        match packet.into_message() {
            InboundMessage::Waiting { players } => {
                tracing::debug!(players, "waiting for players");
                session.set_waiting(players);
            }
            InboundMessage::Start { entity_id } => self.start(entity_id, registry, session)?,
            InboundMessage::Create {
                id,
                x,
                y,
                direction,
                texture,
            } => {
                let direction = direction_from_wire(direction)?;
                registry.create(id, x, y, direction, texture)?;
            }
            InboundMessage::Destroy { id } => {
                if registry.destroy(id)?.is_none() {
                    tracing::trace!(id, "destroy for unknown entity");
                }
            }
            InboundMessage::Position { id, x, y } => {
                if !registry.update_position(id, x, y)? {
                    tracing::trace!(id, "position for unknown entity dropped");
                }
            }
            InboundMessage::Direction { id, direction } => {
                let direction = direction_from_wire(direction)?;
                if !registry.update_direction(id, direction)? {
                    tracing::trace!(id, "direction for unknown entity dropped");
                }
            }
            InboundMessage::Texture { id, texture } => {
                if !registry.update_texture(id, texture)? {
                    tracing::trace!(id, "texture for unknown entity dropped");
                }
            }
            InboundMessage::Interface(values) => session.set_hud(values),
        }
        Ok(())
    }

    fn start(
        &self,
        entity_id: u32,
        registry: &mut EntityRegistry,
        session: &mut SessionView,
    ) -> Result<(), ClientError> {
        if let Some(current) = registry.local_player() {
            if current != entity_id {
                tracing::warn!(current, requested = entity_id, "repeated START ignored");
                return Ok(());
            }
        }
        registry.set_local_player(entity_id)?;
        tracing::info!(local_player = entity_id, "game started");
        session.start_game(entity_id);
        Ok(())
    }
}

fn direction_from_wire(ordinal: u8) -> Result<Direction, ProtocolError> {
    Direction::from_ordinal(ordinal).ok_or_else(|| {
        ProtocolError::InvalidMessage(format!("direction ordinal {ordinal} is out of range"))
    })
}
