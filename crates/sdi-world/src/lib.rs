//! Client-side mirror of the server's entity state.
//!
//! The server owns the simulation; this crate only stores what it last said
//! about each entity. The [`EntityRegistry`] is written by the protocol
//! dispatcher and read by whatever draws the world. It is owned by the
//! simulation thread and is not `Sync`-shared with the network side.
//!
//! # Key types
//!
//! - [`Entity`]: position, facing and texture selector of one object
//! - [`Direction`]: the four facings, by wire ordinal
//! - [`EntityRegistry`]: fixed-capacity slot array indexed by entity id
//! - [`RegistryError`]: id-space violations

mod entity;
mod error;
mod registry;

pub use entity::{Direction, Entity};
pub use error::RegistryError;
pub use registry::{DEFAULT_CAPACITY, EntityRegistry};
