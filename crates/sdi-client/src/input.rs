//! Local player input, turned into outbound intents once per tick.
//!
//! Presentation forwards raw key and pointer events here as they happen;
//! [`InputState::collect`] is then called once per tick and returns the
//! packets for that tick, always in the order Movement, Fly, Attack.
//!
//! - Movement keys are level-triggered: a Movement packet goes out every
//!   tick while at least one is held.
//! - Fly is edge-triggered: one press produces exactly one Fly packet.
//! - Attack is level-triggered on the primary pointer: an Attack packet goes
//!   out every tick while it is held, aimed at the last known target.

use sdi_protocol::{MovementKeys, OutboundPacket};

/// Keys the game reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Fly,
}

impl Key {
    fn movement(self) -> Option<MovementKeys> {
        match self {
            Self::Left => Some(MovementKeys::LEFT),
            Self::Right => Some(MovementKeys::RIGHT),
            Self::Up => Some(MovementKeys::UP),
            Self::Down => Some(MovementKeys::DOWN),
            Self::Fly => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

/// Held keys, pending fly request and attack target.
///
/// Pointer positions are world coordinates; unprojecting from the screen is
/// the caller's job.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: MovementKeys,
    fly: bool,
    attacking: bool,
    target: (f64, f64),
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        match key.movement() {
            Some(bit) => self.held.insert(bit),
            None => self.fly = true,
        }
    }

    pub fn key_up(&mut self, key: Key) {
        if let Some(bit) = key.movement() {
            self.held.remove(bit);
        }
    }

    pub fn pointer_down(&mut self, button: PointerButton, x: f64, y: f64) {
        if button == PointerButton::Primary {
            self.target = (x, y);
            self.attacking = true;
        }
    }

    /// Moves the attack target. Applies whether or not attack is armed.
    pub fn pointer_dragged(&mut self, x: f64, y: f64) {
        self.target = (x, y);
    }

    pub fn pointer_up(&mut self, button: PointerButton) {
        if button == PointerButton::Primary {
            self.attacking = false;
        }
    }

    pub fn held(&self) -> MovementKeys {
        self.held
    }

    /// The packets for this tick. Clears the fly latch.
    pub fn collect(&mut self) -> Vec<OutboundPacket> {
        let mut packets = Vec::with_capacity(3);
        if !self.held.is_empty() {
            packets.push(OutboundPacket::Movement(self.held));
        }
        if std::mem::take(&mut self.fly) {
            packets.push(OutboundPacket::Fly);
        }
        if self.attacking {
            let (target_x, target_y) = self.target;
            packets.push(OutboundPacket::Attack { target_x, target_y });
        }
        packets
    }

    /// Forgets every held key and pending request.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_produces_nothing() {
        let mut input = InputState::new();
        assert!(input.collect().is_empty());
    }

    #[test]
    fn test_movement_repeats_while_held() {
        let mut input = InputState::new();
        input.key_down(Key::Left);
        input.key_down(Key::Up);

        let expected = OutboundPacket::Movement(MovementKeys::LEFT | MovementKeys::UP);
        assert_eq!(input.collect(), vec![expected]);
        assert_eq!(input.collect(), vec![expected]);

        input.key_up(Key::Left);
        assert_eq!(input.collect(), vec![OutboundPacket::Movement(MovementKeys::UP)]);

        input.key_up(Key::Up);
        assert!(input.collect().is_empty());
    }

    #[test]
    fn test_fly_is_sent_once_per_press() {
        let mut input = InputState::new();
        input.key_down(Key::Fly);
        assert_eq!(input.collect(), vec![OutboundPacket::Fly]);
        assert!(input.collect().is_empty());

        input.key_up(Key::Fly);
        assert!(input.collect().is_empty());
    }

    #[test]
    fn test_attack_repeats_until_release() {
        let mut input = InputState::new();
        input.pointer_down(PointerButton::Primary, 12.5, -3.25);

        let attack = OutboundPacket::Attack {
            target_x: 12.5,
            target_y: -3.25,
        };
        assert_eq!(input.collect(), vec![attack]);
        assert_eq!(input.collect(), vec![attack]);

        input.pointer_up(PointerButton::Primary);
        assert!(input.collect().is_empty());
    }

    #[test]
    fn test_drag_moves_target() {
        let mut input = InputState::new();
        input.pointer_dragged(5.0, 5.0);
        assert!(input.collect().is_empty());

        input.pointer_down(PointerButton::Primary, 1.0, 1.0);
        input.pointer_dragged(2.0, 3.0);
        assert_eq!(
            input.collect(),
            vec![OutboundPacket::Attack {
                target_x: 2.0,
                target_y: 3.0
            }]
        );
    }

    #[test]
    fn test_secondary_button_does_not_attack() {
        let mut input = InputState::new();
        input.pointer_down(PointerButton::Secondary, 1.0, 1.0);
        assert!(input.collect().is_empty());
    }

    #[test]
    fn test_order_is_movement_fly_attack() {
        let mut input = InputState::new();
        input.pointer_down(PointerButton::Primary, 0.0, 0.0);
        input.key_down(Key::Fly);
        input.key_down(Key::Down);

        let kinds: Vec<u8> = input.collect().iter().map(OutboundPacket::opcode).collect();
        assert_eq!(
            kinds,
            vec![
                OutboundPacket::MOVEMENT_OPCODE,
                OutboundPacket::FLY_OPCODE,
                OutboundPacket::ATTACK_OPCODE
            ]
        );
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut input = InputState::new();
        input.key_down(Key::Right);
        input.key_down(Key::Fly);
        input.pointer_down(PointerButton::Primary, 1.0, 1.0);
        input.reset();
        assert!(input.collect().is_empty());
        assert!(input.held().is_empty());
    }
}
