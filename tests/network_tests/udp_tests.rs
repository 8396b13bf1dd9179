//! Tests for the UDP transport over loopback

use std::net::UdpSocket;
use std::time::Duration;

use tictactoe_client::network::{UdpConnector, Connector, Channel};
use tictactoe_client::protocol::{
    decode_request, encode_response, receive_response, Request, Response,
};
use tictactoe_client::{ClientConfig, ClientError, ClientSession, ClientState};

fn bind_server() -> (UdpSocket, u16) {
    let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
    socket
        .set_read_timeout(Some(Duration::from_secs(2)))
        .unwrap();
    let port = socket.local_addr().unwrap().port();
    (socket, port)
}

#[test]
fn test_udp_round_trip() {
    let (server, port) = bind_server();
    let mut connector = UdpConnector::new(2000);
    let mut channel = connector.open("127.0.0.1", port).unwrap();

    channel.send(&[3, 0, 0, 0, 0, 0, 0, 0]).unwrap();

    let mut buffer = [0u8; 64];
    let (n, client_addr) = server.recv_from(&mut buffer).unwrap();
    assert_eq!(decode_request(&buffer[..n]).unwrap(), Request::Quit);

    server
        .send_to(&encode_response(&Response::Ok), client_addr)
        .unwrap();

    let n = channel.receive(&mut buffer).unwrap();
    assert_eq!(&buffer[..n], &6u32.to_le_bytes());
}

#[test]
fn test_udp_nonblocking_receive_is_empty() {
    let (_server, port) = bind_server();
    let mut connector = UdpConnector::new(0);
    let mut channel = connector.open("127.0.0.1", port).unwrap();

    let mut buffer = [0u8; 64];
    assert_eq!(channel.receive(&mut buffer).unwrap(), 0);
}

#[test]
fn test_connector_from_config_uses_recv_timeout() {
    let (server, port) = bind_server();
    let config = ClientConfig::builder().recv_timeout_ms(1500).build();
    let mut connector = UdpConnector::from_config(&config);
    let mut channel = connector.open("127.0.0.1", port).unwrap();

    // A timed read waits for a late reply instead of returning at once
    channel.send(&[3, 0, 0, 0, 0, 0, 0, 0]).unwrap();
    let mut buffer = [0u8; 64];
    let (_, client_addr) = server.recv_from(&mut buffer).unwrap();
    let replier = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(200));
        server
            .send_to(&encode_response(&Response::Ok), client_addr)
            .unwrap();
    });

    assert_eq!(channel.receive(&mut buffer).unwrap(), 4);
    replier.join().unwrap();
}

#[test]
fn test_overlong_datagram_fails_framing() {
    let (server, port) = bind_server();
    let mut connector = UdpConnector::new(2000);
    let mut channel = connector.open("127.0.0.1", port).unwrap();

    channel.send(&[3, 0, 0, 0, 0, 0, 0, 0]).unwrap();
    let mut buffer = [0u8; 64];
    let (_, client_addr) = server.recv_from(&mut buffer).unwrap();

    let mut overlong = encode_response(&Response::AnnounceRoom {
        room_ids: [1, 2, 3, 4, 5, 6, 7, 8, 9, 10],
    });
    overlong.extend_from_slice(&[0xAA; 4]);
    server.send_to(&overlong, client_addr).unwrap();

    let mut buffer = [0u8; 45];
    let result = receive_response(&mut channel, ClientState::WaitingRoom, &mut buffer);
    // Unix hands back the first 45 bytes, Windows reports the overflow
    assert!(matches!(
        result,
        Err(ClientError::Unrecognized { length: 45, .. }) | Err(ClientError::Io(_))
    ));
}

#[test]
fn test_session_join_over_udp() {
    let (server, port) = bind_server();
    let config = ClientConfig::builder()
        .server_address("127.0.0.1")
        .server_port(port)
        .recv_timeout_ms(2000)
        .build();
    let connector = UdpConnector::from_config(&config);
    let mut session = ClientSession::new(config, connector).unwrap();

    session.request_join("carol").unwrap();

    let mut buffer = [0u8; 64];
    let (n, client_addr) = server.recv_from(&mut buffer).unwrap();
    assert_eq!(n, 25);
    match decode_request(&buffer[..n]).unwrap() {
        Request::Join { name } => assert_eq!(name.as_str(), "carol"),
        other => panic!("Expected JOIN, got {:?}", other),
    }

    server
        .send_to(&encode_response(&Response::Ok), client_addr)
        .unwrap();
    session.tick();

    assert_eq!(session.state(), ClientState::WaitingRoom);
}
