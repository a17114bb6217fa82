//! Integration tests for the transport session.
//!
//! These run a real session against a loopback TCP listener (or an in-memory
//! duplex pipe) playing the part of the game server.

use std::time::Duration;

use sdi_protocol::{InboundKind, InboundPacket, MovementKeys, OutboundPacket, encode_to_bytes};
use sdi_transport::{FatalHandler, InboundQueue, TransportSession, inbound_queue};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::runtime::Handle;
use tokio::sync::oneshot;

// =========================================================================
// Helpers
// =========================================================================

async fn bind_server() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("should bind");
    let addr = listener.local_addr().unwrap().to_string();
    (listener, addr)
}

fn fatal_channel() -> (FatalHandler, oneshot::Receiver<String>) {
    let (tx, rx) = oneshot::channel();
    let handler = FatalHandler::new(move |err| {
        let _ = tx.send(err.to_string());
    });
    (handler, rx)
}

async fn expect_fault(rx: oneshot::Receiver<String>) -> String {
    tokio::time::timeout(Duration::from_secs(5), rx)
        .await
        .expect("fault should be reported")
        .expect("handler should fire, not be dropped")
}

/// Polls the inbound queue until `n` packets have arrived.
async fn collect_packets(queue: &mut InboundQueue, n: usize) -> Vec<InboundPacket> {
    let mut packets = Vec::new();
    tokio::time::timeout(Duration::from_secs(5), async {
        while packets.len() < n {
            packets.extend(queue.drain());
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("packets should arrive");
    packets
}

fn create_frame(id: u32, x: f64, y: f64, direction: u8, texture: u32) -> Vec<u8> {
    let mut frame = vec![InboundKind::Create.opcode()];
    frame.extend_from_slice(&id.to_be_bytes());
    frame.extend_from_slice(&x.to_be_bytes());
    frame.extend_from_slice(&y.to_be_bytes());
    frame.push(direction);
    frame.extend_from_slice(&texture.to_be_bytes());
    frame
}

// =========================================================================
// Inbound
// =========================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_inbound_packets_survive_split_writes() {
    let (listener, addr) = bind_server().await;
    let (tx, mut inbound) = inbound_queue();
    let (fatal, _fatal_rx) = fatal_channel();
    let _session = TransportSession::connect(&Handle::current(), addr, tx, fatal);

    let (mut server, _) = listener.accept().await.unwrap();

    let mut stream = vec![1u8, 2];
    stream.extend(create_frame(7, 1.0, 2.0, 3, 0));
    // Cut mid-opcode-payload and mid-field.
    for chunk in [&stream[..1], &stream[1..3], &stream[3..10], &stream[10..]] {
        server.write_all(chunk).await.unwrap();
        server.flush().await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let packets = collect_packets(&mut inbound, 2).await;
    assert_eq!(packets.len(), 2);
    assert_eq!(packets[0].kind(), InboundKind::Waiting);
    assert_eq!(packets[0].payload().as_ref(), &[2]);
    assert_eq!(packets[1].kind(), InboundKind::Create);
    assert_eq!(packets[1].payload().as_ref(), &stream[3..]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_session_over_duplex_stream() {
    let (client, mut server) = tokio::io::duplex(64);
    let (tx, mut inbound) = inbound_queue();
    let (fatal, _fatal_rx) = fatal_channel();
    let _session = TransportSession::from_stream(&Handle::current(), client, tx, fatal);

    server.write_all(&[4, 0, 0, 0, 9, 1, 3]).await.unwrap();

    let packets = collect_packets(&mut inbound, 2).await;
    assert_eq!(packets[0].kind(), InboundKind::Destroy);
    assert_eq!(packets[1].kind(), InboundKind::Waiting);
}

// =========================================================================
// Outbound
// =========================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_flush_outbound_writes_queued_packets_in_order() {
    let (listener, addr) = bind_server().await;
    let (tx, _inbound) = inbound_queue();
    let (fatal, _fatal_rx) = fatal_channel();
    let session = TransportSession::connect(&Handle::current(), addr, tx, fatal);
    let (mut server, _) = listener.accept().await.unwrap();

    let packets = [
        OutboundPacket::Movement(MovementKeys::RIGHT | MovementKeys::UP),
        OutboundPacket::Attack {
            target_x: 12.5,
            target_y: -3.25,
        },
        OutboundPacket::Fly,
    ];
    for p in packets {
        assert!(session.enqueue(p));
    }
    session.flush_outbound();

    let expected: Vec<u8> = packets
        .iter()
        .flat_map(|p| encode_to_bytes(p).to_vec())
        .collect();
    let mut received = vec![0u8; expected.len()];
    tokio::time::timeout(Duration::from_secs(5), server.read_exact(&mut received))
        .await
        .expect("bytes should arrive")
        .unwrap();
    assert_eq!(received, expected);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_nothing_is_sent_before_flush() {
    let (client, mut server) = tokio::io::duplex(64);
    let (tx, _inbound) = inbound_queue();
    let (fatal, _fatal_rx) = fatal_channel();
    let session = TransportSession::from_stream(&Handle::current(), client, tx, fatal);

    session.enqueue(OutboundPacket::Fly);
    let mut byte = [0u8; 1];
    let early = tokio::time::timeout(Duration::from_millis(100), server.read_exact(&mut byte)).await;
    assert!(early.is_err(), "packet must wait for flush_outbound");

    session.flush_outbound();
    server.read_exact(&mut byte).await.unwrap();
    assert_eq!(byte, [OutboundPacket::FLY_OPCODE]);
}

// =========================================================================
// Faults
// =========================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_unknown_opcode_is_a_single_fault_with_no_packets() {
    let (listener, addr) = bind_server().await;
    let (tx, mut inbound) = inbound_queue();
    let (fatal, fatal_rx) = fatal_channel();
    let session = TransportSession::connect(&Handle::current(), addr, tx, fatal);
    let (mut server, _) = listener.accept().await.unwrap();

    server.write_all(&[99, 1, 2, 3]).await.unwrap();

    let message = expect_fault(fatal_rx).await;
    assert_eq!(message, "unknown opcode 99");
    assert!(session.has_faulted());
    assert!(inbound.drain().next().is_none());

    tokio::time::timeout(Duration::from_secs(5), async {
        while !session.is_terminated() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("task should end after a fault");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_connect_refused_is_reported() {
    let (listener, addr) = bind_server().await;
    drop(listener);

    let (tx, _inbound) = inbound_queue();
    let (fatal, fatal_rx) = fatal_channel();
    let _session = TransportSession::connect(&Handle::current(), addr.clone(), tx, fatal);

    let message = expect_fault(fatal_rx).await;
    assert!(
        message.starts_with(&format!("could not connect to {addr}")),
        "unexpected message: {message}"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_server_closing_stream_is_reported() {
    let (listener, addr) = bind_server().await;
    let (tx, _inbound) = inbound_queue();
    let (fatal, fatal_rx) = fatal_channel();
    let _session = TransportSession::connect(&Handle::current(), addr, tx, fatal);

    let (server, _) = listener.accept().await.unwrap();
    drop(server);

    assert_eq!(expect_fault(fatal_rx).await, "connection closed by server");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_flush_after_fault_does_nothing() {
    let (client, mut server) = tokio::io::duplex(64);
    let (tx, _inbound) = inbound_queue();
    let (fatal, fatal_rx) = fatal_channel();
    let session = TransportSession::from_stream(&Handle::current(), client, tx, fatal);

    server.write_all(&[0]).await.unwrap();
    expect_fault(fatal_rx).await;

    tokio::time::timeout(Duration::from_secs(5), async {
        while !session.is_terminated() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("task should end after a fault");

    assert!(session.outbound().is_closed());
    assert!(!session.enqueue(OutboundPacket::Fly));
    session.flush_outbound();
}
