//! Session Module
//!
//! Client-side game session.
//!
//! ## Responsibilities
//! - Drive CONNECTION -> WAITING_ROOM <-> PLAY transitions
//! - Keep the room registry in sync with server announcements
//! - Mirror the turn token and playfield during a match
//! - Gate outgoing requests on local preconditions
//!
//! ## State Diagram
//! ```text
//!   CONNECTION ──(OK)──→ WAITING_ROOM ──(OK)──→ PLAY
//!       ↑                 │      ↑               │
//!       └─────(KICK)──────┘      └─(ROOM_CLOSING)┘
//!       ↑                                        │
//!       └────────────────(KICK)──────────────────┘
//! ```

mod state;
mod registry;
mod play;
mod client;

pub use state::{ClientState, SessionEvent};
pub use registry::RoomRegistry;
pub use play::PlayState;
pub use client::{ClientSession, MAX_PENDING_EVENTS};
