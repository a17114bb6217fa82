//! Batched outbound writes.

use bytes::BytesMut;
use sdi_protocol::encode;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::{OutboundReceiver, TransportError};

/// Encodes queued packets and writes them as one batch.
///
/// Packets sit unencoded in the outbound queue until a flush is requested.
/// [`flush_pending`](Self::flush_pending) then encodes all of them into a
/// single buffer, writes it, and flushes the sink once.
#[derive(Debug)]
pub struct OutboundWriter<W> {
    sink: W,
    buf: BytesMut,
}

impl<W: AsyncWrite + Unpin> OutboundWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            buf: BytesMut::with_capacity(256),
        }
    }

    /// Drains `queue`, writes every packet in enqueue order, and flushes.
    ///
    /// Returns the number of packets written. An empty queue causes no I/O.
    ///
    /// # Errors
    /// [`TransportError::SendFailed`] if the write or the flush fails.
    pub async fn flush_pending(
        &mut self,
        queue: &mut OutboundReceiver,
    ) -> Result<usize, TransportError> {
        let mut count = 0;
        for packet in queue.drain() {
            encode(&packet, &mut self.buf);
            count += 1;
        }
        if count == 0 {
            return Ok(0);
        }

        let bytes = self.buf.len();
        self.sink
            .write_all(&self.buf)
            .await
            .map_err(TransportError::SendFailed)?;
        self.sink
            .flush()
            .await
            .map_err(TransportError::SendFailed)?;
        self.buf.clear();

        tracing::debug!(packets = count, bytes, "outbound batch flushed");
        Ok(count)
    }

    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}
