//! Error types for the entity registry.

/// Errors raised by [`EntityRegistry`](crate::EntityRegistry) operations.
///
/// Updates and destroys for ids that hold no entity are not errors; they
/// are silently dropped. These variants cover the cases where the server
/// and the client disagree about the id space itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The id does not fit in the registry's fixed capacity.
    #[error("entity id {id} is outside registry capacity {capacity}")]
    IdOutOfRange { id: u32, capacity: usize },

    /// The local player id was already assigned for this session.
    #[error("local player already assigned to entity {current}, refusing {requested}")]
    LocalPlayerAlreadySet { current: u32, requested: u32 },
}
