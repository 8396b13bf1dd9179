//! Channel traits
//!
//! The duplex byte channel the session drives. Implementations must deliver
//! exactly one protocol packet per successful receive.

use crate::error::Result;

/// An established, message-boundary-preserving connection to the server
pub trait Channel {
    /// Send one packet
    fn send(&mut self, packet: &[u8]) -> Result<()>;

    /// Receive at most one packet into `buffer`
    ///
    /// Returns the packet length, or 0 when nothing is pending. A packet
    /// longer than `buffer` must never come back as a shorter valid length:
    /// report it as an error, or return all `buffer.len()` bytes.
    fn receive(&mut self, buffer: &mut [u8]) -> Result<usize>;

    /// Tear the channel down
    fn close(self)
    where
        Self: Sized;
}

/// Opens channels to a server
pub trait Connector {
    type Channel: Channel;

    /// Open a channel to `address:port`
    fn open(&mut self, address: &str, port: u16) -> Result<Self::Channel>;
}
