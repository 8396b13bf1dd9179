//! Client states and session events

use std::fmt;

/// Which screen of the game the client is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ClientState {
    /// Not logged in; waiting for the user to join a server
    #[default]
    Connection,

    /// Logged in; browsing, creating and challenging rooms
    WaitingRoom,

    /// In a match
    Play,
}

impl fmt::Display for ClientState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ClientState::Connection => "CONNECTION",
            ClientState::WaitingRoom => "WAITING_ROOM",
            ClientState::Play => "PLAY",
        };
        f.write_str(name)
    }
}

/// Something the UI layer should react to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The session moved between states
    StateChanged { from: ClientState, to: ClientState },

    /// Input focus owned by the UI should be dropped (leaving CONNECTION)
    ResetPressedInput,

    /// The server refused the join request
    JoinRejected,

    /// The server reported itself dead
    ServerDead,

    /// The server removed this client
    Kicked,

    /// Our room was created
    RoomCreated(u32),

    /// Our room was destroyed
    RoomDestroyed(u32),

    /// A new playfield arrived
    TurnUpdated { my_turn: bool },
}
