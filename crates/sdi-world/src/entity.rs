//! Entity state as replicated from the server.

use std::fmt;

/// The way an entity faces. The discriminant is the wire ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Direction {
    #[default]
    Down = 0,
    Up = 1,
    Left = 2,
    Right = 3,
}

impl Direction {
    /// Maps a wire ordinal onto a facing. Ordinals above 3 have no facing.
    pub const fn from_ordinal(ordinal: u8) -> Option<Self> {
        match ordinal {
            0 => Some(Self::Down),
            1 => Some(Self::Up),
            2 => Some(Self::Left),
            3 => Some(Self::Right),
            _ => None,
        }
    }

    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    /// Lower-case name, as used for animation sheet rows.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Down => "down",
            Self::Up => "up",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One synchronized game object.
///
/// `id` is assigned by the server and doubles as the registry slot. The
/// other fields are overwritten in place by position, direction and texture
/// updates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entity {
    pub id: u32,
    pub x: f64,
    pub y: f64,
    pub direction: Direction,
    /// Index into the texture set table.
    pub texture: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinals_round_trip() {
        for ordinal in 0..4 {
            let direction = Direction::from_ordinal(ordinal).unwrap();
            assert_eq!(direction.ordinal(), ordinal);
        }
    }

    #[test]
    fn test_ordinal_order_is_down_up_left_right() {
        assert_eq!(Direction::from_ordinal(0), Some(Direction::Down));
        assert_eq!(Direction::from_ordinal(1), Some(Direction::Up));
        assert_eq!(Direction::from_ordinal(2), Some(Direction::Left));
        assert_eq!(Direction::from_ordinal(3), Some(Direction::Right));
    }

    #[test]
    fn test_out_of_range_ordinal() {
        assert_eq!(Direction::from_ordinal(4), None);
        assert_eq!(Direction::from_ordinal(255), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Direction::Left.to_string(), "left");
    }
}
