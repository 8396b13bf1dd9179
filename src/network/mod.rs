//! Network Module
//!
//! Transport channels between the client and the game server.
//!
//! ## Architecture
//! - `Connector` opens a `Channel` to an address/port
//! - `Channel` sends and receives whole packets, one per call
//! - UDP for real servers, crossbeam queues for tests and tooling

mod channel;
mod udp;
mod memory;

pub use channel::{Channel, Connector};
pub use udp::{UdpChannel, UdpConnector};
pub use memory::{memory_transport, MemoryChannel, MemoryConnector, MemoryServer};
