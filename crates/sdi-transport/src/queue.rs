//! The two queues that cross the network/simulation thread boundary.
//!
//! Both are unbounded tokio mpsc channels. Every operation the simulation
//! thread performs on them (`push` of outbound intents, `drain` of inbound
//! packets) is synchronous and never blocks, so the tick loop does not need
//! to run inside the runtime.
//!
//! ```text
//!   network task                         simulation thread
//!   InboundSender   ──InboundPacket──→   InboundQueue::drain()
//!   OutboundReceiver ←─OutboundPacket──  OutboundQueue::push()
//! ```

use sdi_protocol::{InboundPacket, OutboundPacket};
use tokio::sync::mpsc;

// ---------------------------------------------------------------------------
// Inbound
// ---------------------------------------------------------------------------

/// Creates the inbound queue: the network side sends, the tick loop drains.
pub fn inbound_queue() -> (InboundSender, InboundQueue) {
    let (tx, rx) = mpsc::unbounded_channel();
    (InboundSender(tx), InboundQueue(rx))
}

/// Network-side handle of the inbound queue.
#[derive(Debug, Clone)]
pub struct InboundSender(mpsc::UnboundedSender<InboundPacket>);

impl InboundSender {
    /// Hands a decoded packet to the simulation thread.
    ///
    /// Returns `false` once the [`InboundQueue`] has been dropped.
    pub fn push(&self, packet: InboundPacket) -> bool {
        self.0.send(packet).is_ok()
    }
}

/// Simulation-side handle of the inbound queue.
#[derive(Debug)]
pub struct InboundQueue(mpsc::UnboundedReceiver<InboundPacket>);

impl InboundQueue {
    /// Takes the oldest queued packet, if any, without waiting.
    pub fn pop(&mut self) -> Option<InboundPacket> {
        self.0.try_recv().ok()
    }

    /// Iterates over queued packets in arrival order until the queue is
    /// empty. Ownership of each packet passes to the caller.
    pub fn drain(&mut self) -> impl Iterator<Item = InboundPacket> + '_ {
        std::iter::from_fn(move || self.pop())
    }

    /// Drops every queued packet without looking at it. Returns how many
    /// were dropped.
    pub fn discard(&mut self) -> usize {
        self.drain().count()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Outbound
// ---------------------------------------------------------------------------

/// Creates the outbound queue: the tick loop pushes, the network side drains
/// on flush.
pub fn outbound_queue() -> (OutboundQueue, OutboundReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (OutboundQueue(tx), OutboundReceiver(rx))
}

/// Simulation-side handle of the outbound queue. Cheap to clone.
#[derive(Debug, Clone)]
pub struct OutboundQueue(mpsc::UnboundedSender<OutboundPacket>);

impl OutboundQueue {
    /// Queues a packet for the next flush. Nothing is encoded yet.
    ///
    /// Returns `false` once the network side is gone, in which case the
    /// packet is dropped.
    pub fn push(&self, packet: OutboundPacket) -> bool {
        self.0.send(packet).is_ok()
    }

    /// Whether the network side has stopped draining this queue.
    pub fn is_closed(&self) -> bool {
        self.0.is_closed()
    }
}

/// Network-side handle of the outbound queue.
#[derive(Debug)]
pub struct OutboundReceiver(mpsc::UnboundedReceiver<OutboundPacket>);

impl OutboundReceiver {
    /// Iterates over packets queued so far, oldest first.
    pub fn drain(&mut self) -> impl Iterator<Item = OutboundPacket> + '_ {
        std::iter::from_fn(move || self.0.try_recv().ok())
    }
}
