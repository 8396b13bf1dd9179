//! UDP transport
//!
//! The game server speaks UDP, so each datagram is exactly one packet and
//! the codec never has to reassemble anything.

use std::io::ErrorKind;
use std::net::UdpSocket;
use std::time::Duration;

use super::{Channel, Connector};
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};

/// Opens connected UDP sockets
#[derive(Debug, Clone, Default)]
pub struct UdpConnector {
    /// Receive timeout (milliseconds), 0 means non-blocking
    recv_timeout_ms: u64,
}

impl UdpConnector {
    pub fn new(recv_timeout_ms: u64) -> Self {
        Self { recv_timeout_ms }
    }

    /// Create a connector using the receive timeout of `config`
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.recv_timeout_ms)
    }
}

impl Connector for UdpConnector {
    type Channel = UdpChannel;

    fn open(&mut self, address: &str, port: u16) -> Result<UdpChannel> {
        UdpChannel::connect(address, port, self.recv_timeout_ms)
    }
}

/// A UDP socket connected to the game server
pub struct UdpChannel {
    socket: UdpSocket,

    /// Peer address for logging
    peer_addr: String,
}

impl UdpChannel {
    /// Bind an ephemeral local port and connect it to `address:port`
    pub fn connect(address: &str, port: u16, recv_timeout_ms: u64) -> Result<Self> {
        let socket = UdpSocket::bind(("0.0.0.0", 0))?;
        socket
            .connect((address, port))
            .map_err(|e| ClientError::Transport(format!("connect to {}:{}: {}", address, port, e)))?;

        if recv_timeout_ms > 0 {
            socket.set_read_timeout(Some(Duration::from_millis(recv_timeout_ms)))?;
        } else {
            socket.set_nonblocking(true)?;
        }

        let peer_addr = socket
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| format!("{}:{}", address, port));

        tracing::debug!("UDP channel open to {}", peer_addr);

        Ok(Self { socket, peer_addr })
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

impl Channel for UdpChannel {
    fn send(&mut self, packet: &[u8]) -> Result<()> {
        let sent = self.socket.send(packet)?;
        if sent != packet.len() {
            return Err(ClientError::Transport(format!(
                "short send to {}: {} of {} bytes",
                self.peer_addr,
                sent,
                packet.len()
            )));
        }
        Ok(())
    }

    /// Receive one datagram
    ///
    /// A datagram longer than `buffer` is cut to `buffer.len()` bytes by the
    /// OS; callers size the buffer above the largest frame so the cut packet
    /// fails framing.
    fn receive(&mut self, buffer: &mut [u8]) -> Result<usize> {
        match self.socket.recv(buffer) {
            Ok(n) => Ok(n),
            // Non-blocking sockets report WouldBlock, timed reads report
            // WouldBlock on Unix and TimedOut on Windows
            Err(ref e) if e.kind() == ErrorKind::WouldBlock || e.kind() == ErrorKind::TimedOut => {
                Ok(0)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn close(self) {
        tracing::debug!("UDP channel to {} closed", self.peer_addr);
    }
}
