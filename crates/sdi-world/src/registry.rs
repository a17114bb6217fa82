//! The entity registry: a fixed-capacity arena addressed by entity id.
//!
//! Entity ids are small integers handed out by the server, so the registry
//! is a plain slot array rather than a map. Every accessor is bounds checked
//! against the capacity chosen at construction.
//!
//! # Write rules
//!
//! - An id outside the capacity is an error for every write. It means the
//!   server's id space and ours disagree.
//! - `create` is the only way a slot becomes occupied. An id that is
//!   already occupied is overwritten.
//! - `destroy` and the `update_*` calls on an empty in-range slot (the
//!   entity was never created, or was destroyed while the update was in
//!   flight) do nothing and report `None`/`false`.

use crate::{Direction, Entity, RegistryError};

/// Capacity used by the game client.
pub const DEFAULT_CAPACITY: usize = 2048;

/// Dense, id-indexed store of live entities.
#[derive(Debug)]
pub struct EntityRegistry {
    slots: Box<[Option<Entity>]>,
    live: usize,
    /// Entity id of the local player, assigned once per session.
    local_player: Option<u32>,
}

impl EntityRegistry {
    /// Creates an empty registry accepting ids `0..capacity`.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity].into_boxed_slice(),
            live: 0,
            local_player: None,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    fn index(&self, id: u32) -> Option<usize> {
        usize::try_from(id).ok().filter(|&i| i < self.slots.len())
    }

    fn checked_index(&self, id: u32) -> Result<usize, RegistryError> {
        self.index(id).ok_or(RegistryError::IdOutOfRange {
            id,
            capacity: self.capacity(),
        })
    }

    /// The live entity in slot `id`, or `None` for an empty in-range slot.
    fn slot_mut(&mut self, id: u32) -> Result<Option<&mut Entity>, RegistryError> {
        let index = self.checked_index(id)?;
        Ok(self.slots[index].as_mut())
    }

    /// Puts an entity in slot `id`, returning whatever it replaced.
    ///
    /// # Errors
    /// [`RegistryError::IdOutOfRange`] if `id >= capacity`. The registry is
    /// left untouched.
    pub fn create(
        &mut self,
        id: u32,
        x: f64,
        y: f64,
        direction: Direction,
        texture: u32,
    ) -> Result<Option<Entity>, RegistryError> {
        let index = self.checked_index(id)?;

        let replaced = self.slots[index].replace(Entity {
            id,
            x,
            y,
            direction,
            texture,
        });
        if replaced.is_none() {
            self.live += 1;
        } else {
            tracing::debug!(id, "entity recreated over a live slot");
        }
        Ok(replaced)
    }

    /// Removes and returns the entity in slot `id`, if there is one.
    ///
    /// # Errors
    /// [`RegistryError::IdOutOfRange`] if `id >= capacity`.
    pub fn destroy(&mut self, id: u32) -> Result<Option<Entity>, RegistryError> {
        let index = self.checked_index(id)?;
        let removed = self.slots[index].take();
        if removed.is_some() {
            self.live -= 1;
        }
        Ok(removed)
    }

    pub fn get(&self, id: u32) -> Option<&Entity> {
        self.slots.get(self.index(id)?)?.as_ref()
    }

    pub fn contains(&self, id: u32) -> bool {
        self.get(id).is_some()
    }

    /// Moves entity `id`. Returns `Ok(false)` if the slot is empty.
    ///
    /// # Errors
    /// [`RegistryError::IdOutOfRange`] if `id >= capacity`.
    pub fn update_position(&mut self, id: u32, x: f64, y: f64) -> Result<bool, RegistryError> {
        Ok(match self.slot_mut(id)? {
            Some(entity) => {
                entity.x = x;
                entity.y = y;
                true
            }
            None => false,
        })
    }

    /// Turns entity `id`. Returns `Ok(false)` if the slot is empty.
    ///
    /// # Errors
    /// [`RegistryError::IdOutOfRange`] if `id >= capacity`.
    pub fn update_direction(
        &mut self,
        id: u32,
        direction: Direction,
    ) -> Result<bool, RegistryError> {
        Ok(match self.slot_mut(id)? {
            Some(entity) => {
                entity.direction = direction;
                true
            }
            None => false,
        })
    }

    /// Changes the texture of entity `id`. Returns `Ok(false)` if the slot
    /// is empty.
    ///
    /// # Errors
    /// [`RegistryError::IdOutOfRange`] if `id >= capacity`.
    pub fn update_texture(&mut self, id: u32, texture: u32) -> Result<bool, RegistryError> {
        Ok(match self.slot_mut(id)? {
            Some(entity) => {
                entity.texture = texture;
                true
            }
            None => false,
        })
    }

    /// All live entities in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.slots.iter().filter_map(Option::as_ref)
    }

    /// Records which entity is the local player.
    ///
    /// Assigning the same id again is accepted.
    ///
    /// # Errors
    /// [`RegistryError::IdOutOfRange`] if `id >= capacity`;
    /// [`RegistryError::LocalPlayerAlreadySet`] if a different id was
    /// assigned earlier.
    pub fn set_local_player(&mut self, id: u32) -> Result<(), RegistryError> {
        self.checked_index(id)?;
        match self.local_player {
            Some(current) if current != id => Err(RegistryError::LocalPlayerAlreadySet {
                current,
                requested: id,
            }),
            _ => {
                self.local_player = Some(id);
                Ok(())
            }
        }
    }

    pub fn local_player(&self) -> Option<u32> {
        self.local_player
    }

    /// The local player's entity, once it has been assigned and created.
    pub fn local_player_entity(&self) -> Option<&Entity> {
        self.get(self.local_player?)
    }
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl<'a> IntoIterator for &'a EntityRegistry {
    type Item = &'a Entity;
    type IntoIter = Box<dyn Iterator<Item = &'a Entity> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}
