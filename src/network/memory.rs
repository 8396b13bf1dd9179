//! In-memory transport
//!
//! A loopback pair for driving a session without sockets. The
//! [`MemoryServer`] end plays the game server: it pushes packets to the
//! client and inspects what the client sent. Each queued `Vec<u8>` is one
//! packet, so message boundaries survive just as they do over UDP. Closing
//! a channel discards whatever the server queued for it.

use std::sync::Arc;

use crossbeam::channel::{unbounded, Receiver, Sender, TryRecvError};
use parking_lot::Mutex;

use super::{Channel, Connector};
use crate::error::{ClientError, Result};
use crate::protocol::{decode_request, encode_response, Request, Response};

/// Bookkeeping shared by both ends
#[derive(Debug, Default)]
struct MemoryStats {
    opens: usize,
    closes: usize,
    last_target: Option<(String, u16)>,
    refuse_open: bool,
}

/// Create a connected connector/server pair
pub fn memory_transport() -> (MemoryConnector, MemoryServer) {
    let (to_client, inbound) = unbounded();
    let (outbound, from_client) = unbounded();
    let stats = Arc::new(Mutex::new(MemoryStats::default()));

    let connector = MemoryConnector {
        inbound,
        outbound,
        stats: Arc::clone(&stats),
    };
    let server = MemoryServer {
        to_client,
        from_client,
        stats,
    };

    (connector, server)
}

/// Client end: opens [`MemoryChannel`]s onto the shared queues
pub struct MemoryConnector {
    inbound: Receiver<Vec<u8>>,
    outbound: Sender<Vec<u8>>,
    stats: Arc<Mutex<MemoryStats>>,
}

impl Connector for MemoryConnector {
    type Channel = MemoryChannel;

    fn open(&mut self, address: &str, port: u16) -> Result<MemoryChannel> {
        let mut stats = self.stats.lock();
        if stats.refuse_open {
            return Err(ClientError::Transport(format!(
                "connection to {}:{} refused",
                address, port
            )));
        }

        stats.opens += 1;
        stats.last_target = Some((address.to_string(), port));

        Ok(MemoryChannel {
            inbound: self.inbound.clone(),
            outbound: self.outbound.clone(),
            stats: Arc::clone(&self.stats),
        })
    }
}

/// An open in-memory channel
pub struct MemoryChannel {
    inbound: Receiver<Vec<u8>>,
    outbound: Sender<Vec<u8>>,
    stats: Arc<Mutex<MemoryStats>>,
}

impl Channel for MemoryChannel {
    fn send(&mut self, packet: &[u8]) -> Result<()> {
        self.outbound
            .send(packet.to_vec())
            .map_err(|_| ClientError::Transport("memory server dropped".to_string()))
    }

    fn receive(&mut self, buffer: &mut [u8]) -> Result<usize> {
        match self.inbound.try_recv() {
            Ok(packet) if packet.len() > buffer.len() => Err(ClientError::Transport(format!(
                "{}-byte packet does not fit a {}-byte buffer",
                packet.len(),
                buffer.len()
            ))),
            Ok(packet) => {
                buffer[..packet.len()].copy_from_slice(&packet);
                Ok(packet.len())
            }
            // A vanished server looks the same as a silent one
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => Ok(0),
        }
    }

    fn close(self) {
        // Packets addressed to a closed channel die with it
        let dropped = self.inbound.try_iter().count();
        if dropped > 0 {
            tracing::debug!("Memory channel closed with {} unread packets", dropped);
        }
        self.stats.lock().closes += 1;
    }
}

/// Server end of a memory transport
pub struct MemoryServer {
    to_client: Sender<Vec<u8>>,
    from_client: Receiver<Vec<u8>>,
    stats: Arc<Mutex<MemoryStats>>,
}

impl MemoryServer {
    /// Queue raw bytes as one packet for the client
    pub fn push(&self, packet: impl Into<Vec<u8>>) {
        // The connector holds the receiving end for as long as it lives
        let _ = self.to_client.send(packet.into());
    }

    /// Queue an encoded response for the client
    pub fn push_response(&self, response: &Response) {
        self.push(encode_response(response));
    }

    /// Drain every packet the client has sent so far
    pub fn received(&self) -> Vec<Vec<u8>> {
        self.from_client.try_iter().collect()
    }

    /// Drain and decode every request the client has sent so far
    pub fn received_requests(&self) -> Result<Vec<Request>> {
        self.received().iter().map(|p| decode_request(p)).collect()
    }

    /// Make subsequent opens fail (or succeed again)
    pub fn refuse_open(&self, refuse: bool) {
        self.stats.lock().refuse_open = refuse;
    }

    /// Number of channels opened
    pub fn opens(&self) -> usize {
        self.stats.lock().opens
    }

    /// Number of channels closed
    pub fn closes(&self) -> usize {
        self.stats.lock().closes
    }

    /// Address and port of the most recent open
    pub fn last_target(&self) -> Option<(String, u16)> {
        self.stats.lock().last_target.clone()
    }
}
