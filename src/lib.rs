//! # tictactoe-client
//!
//! Network core of a two-player tic-tac-toe client:
//! - Fixed-layout binary codec, framed by packet length and command tag
//! - Three-state session: lobby login, room lobby, active match
//! - Room registry and playfield mirrored from server pushes
//! - Pluggable transport (UDP, in-memory)
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  UI / terminal driver                       │
//! │         (queries state, calls request_* intents)            │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                    ClientSession                            │
//! │         (tick: switch → decode one → apply → switch)        │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┼─────────────┐
//!          │            │             │
//!          ▼            ▼             ▼
//!   ┌────────────┐ ┌──────────┐ ┌───────────┐
//!   │RoomRegistry│ │PlayState │ │  Codec    │
//!   └────────────┘ └──────────┘ └─────┬─────┘
//!                                     │
//!                                     ▼
//!                              ┌─────────────┐
//!                              │   Channel   │
//!                              │ (UDP / mem) │
//!                              └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod network;
pub mod session;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ClientError, Result};
pub use config::ClientConfig;
pub use session::{ClientSession, ClientState, SessionEvent};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of the client
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
