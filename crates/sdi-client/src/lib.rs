//! # SDI client
//!
//! Protocol engine for the Super Duck Invaders multiplayer client.
//!
//! The client is a passive mirror of server state. Each frame, the engine
//! applies whatever the server sent since the last frame to an entity
//! registry and a small session view, then sends the local player's intents
//! back in one batch.
//!
//! ```text
//! server bytes → sdi-transport → InboundQueue ─┐
//!                                              ├─ GameClient::tick ─→ EntityRegistry, SessionView
//! InputState ──────────────────→ OutboundQueue ┘                  ─→ one flush per tick
//! ```
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use sdi_client::prelude::*;
//!
//! # fn run(runtime: &tokio::runtime::Runtime) {
//! let config = ClientConfig::new("127.0.0.1");
//! let mut client = GameClient::connect(&config, runtime.handle());
//! let mut clock = FrameClock::new(config.tick_rate_hz);
//! while !client.is_faulted() {
//!     clock.wait();
//!     client.tick();
//!     for entity in client.registry().iter() {
//!         // draw entity
//!         let _ = entity;
//!     }
//! }
//! # }
//! ```

mod client;
mod clock;
mod config;
mod dispatcher;
mod error;
mod input;
mod session;

pub use client::GameClient;
pub use clock::{FrameClock, FrameTick};
pub use config::{ClientConfig, DEFAULT_PORT, DEFAULT_TICK_RATE_HZ};
pub use dispatcher::ProtocolDispatcher;
pub use error::ClientError;
pub use input::{InputState, Key, PointerButton};
pub use session::{
    CONNECTING_MESSAGE, HudSnapshot, MessageStyle, Screen, SessionPhase, SessionView,
    StatusMessage, waiting_message,
};

/// Convenience re-exports for client code.
///
/// ```rust
/// use sdi_client::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        ClientConfig, ClientError, FrameClock, FrameTick, GameClient, HudSnapshot, InputState,
        Key, MessageStyle, PointerButton, Screen, SessionPhase, SessionView,
    };
    pub use sdi_protocol::{MovementKeys, OutboundPacket};
    pub use sdi_world::{Direction, Entity, EntityRegistry};
}
