//! Network side of the SDI game client.
//!
//! This crate owns everything that touches the socket:
//!
//! - [`TransportSession`]: one connection to the game server, driven by a
//!   tokio task.
//! - Queues ([`inbound_queue`], [`outbound_queue`]): the only state shared
//!   between the network task and the simulation thread. Whole packets
//!   cross them; nothing else does.
//! - [`OutboundWriter`]: batches all packets queued since the last flush
//!   into one write and one flush.
//! - [`FatalHandler`]: reports the session's fault to its owner, once.
//!
//! # How it fits in the stack
//!
//! ```text
//! Client engine (above)  ← drains inbound packets, queues outbound intents
//!     ↕
//! Transport (this crate) ← socket I/O, framing, fault reporting
//!     ↕
//! Protocol (below)       ← packet catalog, frame codec
//! ```

mod error;
mod fatal;
mod queue;
mod session;
mod writer;

pub use error::TransportError;
pub use fatal::FatalHandler;
pub use queue::{
    InboundQueue, InboundSender, OutboundQueue, OutboundReceiver, inbound_queue, outbound_queue,
};
pub use session::TransportSession;
pub use writer::OutboundWriter;
