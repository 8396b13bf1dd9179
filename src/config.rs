//! Configuration for the tictactoe client
//!
//! Centralized configuration with sensible defaults.

use crate::error::{ClientError, Result};
use crate::protocol::{ANNOUNCE_FRAME_SIZE, MAX_PACKET_SIZE, PLAYFIELD_FRAME_SIZE};

/// Main configuration for a client session
#[derive(Debug, Clone)]
pub struct ClientConfig {
    // -------------------------------------------------------------------------
    // Server Configuration
    // -------------------------------------------------------------------------
    /// Server address (IPv4 dotted form or hostname)
    pub server_address: String,

    /// Server UDP port
    pub server_port: u16,

    // -------------------------------------------------------------------------
    // Player Configuration
    // -------------------------------------------------------------------------
    /// Name sent with JOIN (may be left empty and supplied at join time)
    pub player_name: String,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// Receive timeout (milliseconds), 0 means non-blocking
    pub recv_timeout_ms: u64,

    /// Size of the per-tick receive buffer (bytes)
    pub max_packet_size: usize,

    // -------------------------------------------------------------------------
    // Loop Configuration
    // -------------------------------------------------------------------------
    /// Delay between ticks of the driving loop (milliseconds)
    pub tick_interval_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_address: "127.0.0.1".to_string(),
            server_port: 9999,
            player_name: String::new(),
            recv_timeout_ms: 0,
            max_packet_size: MAX_PACKET_SIZE,
            tick_interval_ms: 16, // ~60 ticks per second
        }
    }
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check that the config can carry every frame of the protocol
    ///
    /// The receive buffer must be strictly larger than the largest frame so
    /// that an over-long datagram cut to the buffer size still has an
    /// unframed length instead of posing as a valid frame.
    pub fn validate(&self) -> Result<()> {
        if self.server_port == 0 {
            return Err(ClientError::Config("server port must be nonzero".to_string()));
        }

        let largest_frame = ANNOUNCE_FRAME_SIZE.max(PLAYFIELD_FRAME_SIZE);
        if self.max_packet_size <= largest_frame {
            return Err(ClientError::Config(format!(
                "max packet size {} must exceed the largest frame ({} bytes)",
                self.max_packet_size, largest_frame
            )));
        }

        Ok(())
    }
}

/// Builder for ClientConfig
#[derive(Default)]
pub struct ConfigBuilder {
    config: ClientConfig,
}

impl ConfigBuilder {
    /// Set the server address
    pub fn server_address(mut self, address: impl Into<String>) -> Self {
        self.config.server_address = address.into();
        self
    }

    /// Set the server port
    pub fn server_port(mut self, port: u16) -> Self {
        self.config.server_port = port;
        self
    }

    /// Set the default player name
    pub fn player_name(mut self, name: impl Into<String>) -> Self {
        self.config.player_name = name.into();
        self
    }

    /// Set the receive timeout (in milliseconds)
    pub fn recv_timeout_ms(mut self, ms: u64) -> Self {
        self.config.recv_timeout_ms = ms;
        self
    }

    /// Set the receive buffer size (in bytes)
    pub fn max_packet_size(mut self, size: usize) -> Self {
        self.config.max_packet_size = size;
        self
    }

    /// Set the tick interval (in milliseconds)
    pub fn tick_interval_ms(mut self, ms: u64) -> Self {
        self.config.tick_interval_ms = ms;
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}
