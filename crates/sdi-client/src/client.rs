//! The client engine: one connection plus the world it mirrors.
//!
//! [`GameClient`] lives on the simulation thread. Its [`tick`] is the whole
//! per-frame protocol step:
//!
//! 1. Check for a fatal fault reported by the network task.
//! 2. Drain the inbound queue and dispatch every packet, in arrival order.
//! 3. Turn this tick's input into outbound packets and queue them.
//! 4. Ask the network task to flush the outbound queue.
//!
//! # Faults
//!
//! The network task reports at most one [`TransportError`] through its
//! [`FatalHandler`], which forwards it over a oneshot channel. The tick
//! picks it up as a [`ClientError::Transport`]; a packet the dispatcher
//! cannot apply becomes the fault directly. Either way the first fault
//! wins: the tick discards whatever inbound packets are still queued, shuts
//! the transport down, keeps the typed error and puts the session view into
//! its faulted state. From then on `tick` does nothing.
//!
//! [`tick`]: GameClient::tick

use sdi_protocol::OutboundPacket;
use sdi_transport::{
    FatalHandler, InboundQueue, InboundSender, TransportError, TransportSession, inbound_queue,
};
use sdi_world::EntityRegistry;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::runtime::Handle;
use tokio::sync::oneshot;

use crate::{ClientConfig, ClientError, InputState, ProtocolDispatcher, SessionView};

#[derive(Debug)]
pub struct GameClient {
    transport: TransportSession,
    inbound: InboundQueue,
    /// Receives the transport's fault, if it reports one.
    network_fault: Option<oneshot::Receiver<TransportError>>,
    /// The error that ended the session.
    fault: Option<ClientError>,
    dispatcher: ProtocolDispatcher,
    registry: EntityRegistry,
    session: SessionView,
    input: InputState,
}

impl GameClient {
    /// Starts connecting to the server named in `config`.
    ///
    /// Returns immediately; network I/O runs on `runtime`. A connect
    /// failure shows up as a fault on a later [`tick`](Self::tick).
    pub fn connect(config: &ClientConfig, runtime: &Handle) -> Self {
        Self::assemble(config.entity_capacity, |inbound, fatal| {
            TransportSession::connect(runtime, config.addr(), inbound, fatal)
        })
    }

    /// Runs a client over an already-open stream.
    pub fn from_stream<S>(runtime: &Handle, stream: S, entity_capacity: usize) -> Self
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        Self::assemble(entity_capacity, |inbound, fatal| {
            TransportSession::from_stream(runtime, stream, inbound, fatal)
        })
    }

    fn assemble(
        entity_capacity: usize,
        open: impl FnOnce(InboundSender, FatalHandler) -> TransportSession,
    ) -> Self {
        let (fault_tx, fault_rx) = oneshot::channel();
        let fatal = FatalHandler::new(move |error| {
            // The receiver is gone only if the client was dropped.
            let _ = fault_tx.send(error);
        });
        let (inbound_tx, inbound) = inbound_queue();
        let transport = open(inbound_tx, fatal);

        Self {
            transport,
            inbound,
            network_fault: Some(fault_rx),
            fault: None,
            dispatcher: ProtocolDispatcher::new(),
            registry: EntityRegistry::new(entity_capacity),
            session: SessionView::new(),
            input: InputState::new(),
        }
    }

    /// Runs one protocol step. Does nothing once the session has faulted.
    pub fn tick(&mut self) {
        if self.fault.is_some() {
            return;
        }
        if let Some(error) = self.poll_network_fault() {
            self.enter_fault(error.into());
            return;
        }

        while let Some(packet) = self.inbound.pop() {
            let kind = packet.kind();
            if let Err(e) = self
                .dispatcher
                .apply(packet, &mut self.registry, &mut self.session)
            {
                tracing::warn!(%kind, error = %e, "packet could not be applied");
                self.enter_fault(e);
                return;
            }
        }

        for packet in self.input.collect() {
            self.transport.enqueue(packet);
        }
        self.transport.flush_outbound();
    }

    fn poll_network_fault(&mut self) -> Option<TransportError> {
        let receiver = self.network_fault.as_mut()?;
        match receiver.try_recv() {
            Ok(error) => {
                self.network_fault = None;
                Some(error)
            }
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => {
                self.network_fault = None;
                None
            }
        }
    }

    /// Records the session's one fault and stops all network activity.
    fn enter_fault(&mut self, error: ClientError) {
        self.network_fault = None;
        self.transport.shutdown();
        let dropped = self.inbound.discard();
        self.input.reset();
        tracing::error!(%error, dropped, "session faulted");
        self.session.fault(error.to_string());
        self.fault = Some(error);
    }

    /// Queues a packet for the next flush. Returns `false` after a fault.
    pub fn enqueue(&self, packet: OutboundPacket) -> bool {
        self.fault.is_none() && self.transport.enqueue(packet)
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn session(&self) -> &SessionView {
        &self.session
    }

    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    pub fn is_faulted(&self) -> bool {
        self.fault.is_some()
    }

    /// The error that ended the session, if it has faulted.
    pub fn fault(&self) -> Option<&ClientError> {
        self.fault.as_ref()
    }

    /// The fault message, once the session has faulted.
    pub fn fault_message(&self) -> Option<&str> {
        self.is_faulted()
            .then(|| self.session.status().text.as_str())
    }
}
