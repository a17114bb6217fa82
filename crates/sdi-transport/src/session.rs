//! The transport session: one TCP connection to the game server.
//!
//! A session owns a single network task. The task connects, then loops
//! over two events:
//!
//! - bytes arriving from the server, which go through the connection's own
//!   [`FrameDecoder`] and out onto the inbound queue, and
//! - a flush request from the simulation thread, which drains the outbound
//!   queue through an [`OutboundWriter`].
//!
//! Any fault (connect failure, read or write error, framing error, the
//! server closing the stream) ends the task. The fault is reported once
//! through the [`FatalHandler`], the socket is dropped with the task, and
//! the session never does I/O again. There is no reconnect.

use std::net::SocketAddr;
use std::sync::Arc;

use bytes::BytesMut;
use sdi_protocol::{FrameDecoder, OutboundPacket};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};
use tokio::net::{TcpSocket, TcpStream};
use tokio::runtime::Handle;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::{
    FatalHandler, InboundSender, OutboundQueue, OutboundReceiver, OutboundWriter, TransportError,
    outbound_queue,
};

/// Bytes reserved in the read buffer before each socket read.
const READ_CHUNK: usize = 4096;

/// Handle to a running connection, held by the simulation thread.
///
/// Dropping the session aborts the network task and closes the socket.
#[derive(Debug)]
pub struct TransportSession {
    outbound: OutboundQueue,
    flush: Arc<Notify>,
    fatal: FatalHandler,
    task: JoinHandle<()>,
}

impl TransportSession {
    /// Starts connecting to `target` (`host:port`) on `runtime`.
    ///
    /// Returns immediately. Decoded packets are pushed to `inbound`; a
    /// failure to connect is reported through `fatal` like any other fault.
    pub fn connect(
        runtime: &Handle,
        target: impl Into<String>,
        inbound: InboundSender,
        fatal: FatalHandler,
    ) -> Self {
        let target = target.into();
        let (outbound, outbound_rx) = outbound_queue();
        let flush = Arc::new(Notify::new());

        let task = {
            let flush = Arc::clone(&flush);
            let fatal = fatal.clone();
            runtime.spawn(async move {
                tracing::info!(%target, "connecting to server");
                let stream = match open_stream(&target).await {
                    Ok(stream) => stream,
                    Err(e) => {
                        tracing::warn!(error = %e, "connect failed");
                        fatal.fire(e);
                        return;
                    }
                };
                tracing::info!(%target, "connected");
                drive(stream, inbound, outbound_rx, flush, fatal).await;
            })
        };

        Self {
            outbound,
            flush,
            fatal,
            task,
        }
    }

    /// Runs a session over an already-open stream.
    pub fn from_stream<S>(
        runtime: &Handle,
        stream: S,
        inbound: InboundSender,
        fatal: FatalHandler,
    ) -> Self
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (outbound, outbound_rx) = outbound_queue();
        let flush = Arc::new(Notify::new());

        let task = {
            let flush = Arc::clone(&flush);
            let fatal = fatal.clone();
            runtime.spawn(drive(stream, inbound, outbound_rx, flush, fatal))
        };

        Self {
            outbound,
            flush,
            fatal,
            task,
        }
    }

    /// The simulation-side handle of this session's outbound queue.
    pub fn outbound(&self) -> &OutboundQueue {
        &self.outbound
    }

    /// Queues a packet for the next [`flush_outbound`](Self::flush_outbound).
    pub fn enqueue(&self, packet: OutboundPacket) -> bool {
        self.outbound.push(packet)
    }

    /// Asks the network task to write everything queued so far in one batch.
    ///
    /// Does not block. After a fault this is a no-op.
    pub fn flush_outbound(&self) {
        if !self.task.is_finished() {
            self.flush.notify_one();
        }
    }

    /// Whether the network task has ended (faulted or shut down).
    pub fn is_terminated(&self) -> bool {
        self.task.is_finished()
    }

    /// Whether a fault has been reported for this session.
    pub fn has_faulted(&self) -> bool {
        self.fatal.has_fired()
    }

    /// Stops the network task and closes the connection without reporting
    /// a fault.
    pub fn shutdown(&self) {
        self.task.abort();
    }
}

impl Drop for TransportSession {
    fn drop(&mut self) {
        self.task.abort();
    }
}

// ---------------------------------------------------------------------------
// Network task
// ---------------------------------------------------------------------------

async fn open_stream(target: &str) -> Result<TcpStream, TransportError> {
    let addrs: Vec<SocketAddr> = tokio::net::lookup_host(target)
        .await
        .map_err(|source| TransportError::ConnectFailed {
            target: target.to_string(),
            source,
        })?
        .collect();

    let mut last_error = None;
    for addr in addrs {
        match connect_keepalive(addr).await {
            Ok(stream) => return Ok(stream),
            Err(source) => {
                tracing::debug!(%addr, error = %source, "address refused connection");
                last_error = Some(source);
            }
        }
    }

    match last_error {
        Some(source) => Err(TransportError::ConnectFailed {
            target: target.to_string(),
            source,
        }),
        None => Err(TransportError::Unresolved(target.to_string())),
    }
}

async fn connect_keepalive(addr: SocketAddr) -> std::io::Result<TcpStream> {
    let socket = if addr.is_ipv4() {
        TcpSocket::new_v4()?
    } else {
        TcpSocket::new_v6()?
    };
    socket.set_keepalive(true)?;
    let stream = socket.connect(addr).await?;
    stream.set_nodelay(true)?;
    Ok(stream)
}

async fn drive<S>(
    stream: S,
    inbound: InboundSender,
    outbound: OutboundReceiver,
    flush: Arc<Notify>,
    fatal: FatalHandler,
) where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    match run_connection(stream, inbound, outbound, flush).await {
        Ok(()) => tracing::debug!("inbound consumer gone, connection task finished"),
        Err(e) => {
            tracing::warn!(error = %e, "connection fault");
            fatal.fire(e);
        }
    }
}

/// Pumps one connection until it faults or the inbound consumer goes away.
async fn run_connection<S>(
    stream: S,
    inbound: InboundSender,
    mut outbound: OutboundReceiver,
    flush: Arc<Notify>,
) -> Result<(), TransportError>
where
    S: AsyncRead + AsyncWrite,
{
    let (mut reader, writer) = tokio::io::split(stream);
    let mut writer = OutboundWriter::new(writer);
    let mut decoder = FrameDecoder::new();
    let mut buf = BytesMut::with_capacity(READ_CHUNK);

    loop {
        buf.reserve(READ_CHUNK);
        tokio::select! {
            read = reader.read_buf(&mut buf) => {
                let n = read.map_err(TransportError::ReceiveFailed)?;
                if n == 0 {
                    return Err(TransportError::ConnectionClosed);
                }
                tracing::trace!(bytes = n, buffered = buf.len(), "read from server");
                for packet in decoder.frames(&mut buf) {
                    let packet = packet?;
                    tracing::debug!(kind = %packet.kind(), "inbound packet");
                    if !inbound.push(packet) {
                        return Ok(());
                    }
                }
            }
            () = flush.notified() => {
                writer.flush_pending(&mut outbound).await?;
            }
        }
    }
}
