//! Tests for the in-memory transport

use tictactoe_client::network::{memory_transport, Channel, Connector};
use tictactoe_client::protocol::{Request, Response};
use tictactoe_client::ClientError;

#[test]
fn test_packets_keep_boundaries() {
    let (mut connector, server) = memory_transport();
    let mut channel = connector.open("127.0.0.1", 9999).unwrap();

    server.push(vec![6, 0, 0, 0]);
    server.push(vec![10, 0, 0, 0, 42, 0, 0, 0]);

    let mut buffer = [0u8; 64];
    assert_eq!(channel.receive(&mut buffer).unwrap(), 4);
    assert_eq!(channel.receive(&mut buffer).unwrap(), 8);
    assert_eq!(&buffer[4..8], &[42, 0, 0, 0]);
    assert_eq!(channel.receive(&mut buffer).unwrap(), 0);
}

#[test]
fn test_oversized_packet_reported() {
    let (mut connector, server) = memory_transport();
    let mut channel = connector.open("127.0.0.1", 9999).unwrap();

    server.push(vec![1u8; 48]);
    server.push(vec![6, 0, 0, 0]);

    let mut buffer = [0u8; 44];
    assert!(matches!(
        channel.receive(&mut buffer),
        Err(ClientError::Transport(_))
    ));
    // The oversized packet is consumed; the next one is intact
    assert_eq!(channel.receive(&mut buffer).unwrap(), 4);
}

#[test]
fn test_packet_filling_buffer_exactly() {
    let (mut connector, server) = memory_transport();
    let mut channel = connector.open("127.0.0.1", 9999).unwrap();

    server.push(vec![1u8; 44]);

    let mut buffer = [0u8; 44];
    assert_eq!(channel.receive(&mut buffer).unwrap(), 44);
}

#[test]
fn test_close_discards_pending_packets() {
    let (mut connector, server) = memory_transport();
    let channel = connector.open("127.0.0.1", 9999).unwrap();

    server.push_response(&Response::Ok);
    server.push_response(&Response::Kick);
    channel.close();

    let mut reopened = connector.open("127.0.0.1", 9999).unwrap();
    let mut buffer = [0u8; 64];
    assert_eq!(reopened.receive(&mut buffer).unwrap(), 0);

    server.push_response(&Response::Ok);
    assert_eq!(reopened.receive(&mut buffer).unwrap(), 4);
}

#[test]
fn test_sent_packets_reach_server() {
    let (mut connector, server) = memory_transport();
    let mut channel = connector.open("127.0.0.1", 9999).unwrap();

    channel.send(&[3, 0, 0, 0, 0, 0, 0, 0]).unwrap();

    assert_eq!(server.received_requests().unwrap(), vec![Request::Quit]);
    assert!(server.received().is_empty());
}

#[test]
fn test_push_response_encodes() {
    let (mut connector, server) = memory_transport();
    let mut channel = connector.open("127.0.0.1", 9999).unwrap();

    server.push_response(&Response::Kick);

    let mut buffer = [0u8; 64];
    let n = channel.receive(&mut buffer).unwrap();
    assert_eq!(&buffer[..n], &11u32.to_le_bytes());
}

#[test]
fn test_open_close_bookkeeping() {
    let (mut connector, server) = memory_transport();

    let first = connector.open("a", 1).unwrap();
    let second = connector.open("b", 2).unwrap();
    first.close();

    assert_eq!(server.opens(), 2);
    assert_eq!(server.closes(), 1);
    assert_eq!(server.last_target(), Some(("b".to_string(), 2)));

    second.close();
    assert_eq!(server.closes(), 2);
}

#[test]
fn test_refused_open() {
    let (mut connector, server) = memory_transport();
    server.refuse_open(true);

    assert!(matches!(
        connector.open("127.0.0.1", 9999),
        Err(ClientError::Transport(_))
    ));
    assert_eq!(server.opens(), 0);

    server.refuse_open(false);
    assert!(connector.open("127.0.0.1", 9999).is_ok());
}

#[test]
fn test_send_after_server_dropped_fails() {
    let (mut connector, server) = memory_transport();
    let mut channel = connector.open("127.0.0.1", 9999).unwrap();
    drop(server);

    let mut buffer = [0u8; 8];
    assert_eq!(channel.receive(&mut buffer).unwrap(), 0);
    assert!(matches!(channel.send(&[0; 8]), Err(ClientError::Transport(_))));
}
