//! Command definitions
//!
//! Command tags shared by both directions, and the requests a client sends.

use crate::error::{ClientError, Result};

/// Maximum player name length in bytes (the wire field holds one more for NUL)
pub const MAX_PLAYER_NAME: usize = 20;

/// Command tags, the first 4 bytes of every packet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum CommandType {
    // Client -> server
    Join = 0,
    Challenge = 1,
    Move = 2,
    Quit = 3,
    CreateRoom = 4,

    // Server -> client
    AnnounceRoom = 5,
    ResponseOk = 6,
    ResponseNegated = 7,
    ResponseDead = 8,
    ResponseRoomDestroyed = 9,
    ResponseRoomCreated = 10,
    ResponseKick = 11,
    ResponseRoomClosing = 12,
    GamePlayfieldAndTurn = 13,
    /// Reserved by the server; no frame carries it yet
    GameEndResult = 14,
}

impl CommandType {
    /// Map a raw tag back to a command, if known
    pub fn from_u32(value: u32) -> Option<Self> {
        let command = match value {
            0 => CommandType::Join,
            1 => CommandType::Challenge,
            2 => CommandType::Move,
            3 => CommandType::Quit,
            4 => CommandType::CreateRoom,
            5 => CommandType::AnnounceRoom,
            6 => CommandType::ResponseOk,
            7 => CommandType::ResponseNegated,
            8 => CommandType::ResponseDead,
            9 => CommandType::ResponseRoomDestroyed,
            10 => CommandType::ResponseRoomCreated,
            11 => CommandType::ResponseKick,
            12 => CommandType::ResponseRoomClosing,
            13 => CommandType::GamePlayfieldAndTurn,
            14 => CommandType::GameEndResult,
            _ => return None,
        };
        Some(command)
    }

    /// Raw wire value
    pub fn as_u32(self) -> u32 {
        self as u32
    }
}

/// A player name that fits the JOIN name field
///
/// At most [`MAX_PLAYER_NAME`] bytes, non-empty, no NUL bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerName(String);

impl PlayerName {
    /// Validate a name, rejecting anything the wire field cannot carry
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(ClientError::InvalidName("name is empty".to_string()));
        }
        if name.len() > MAX_PLAYER_NAME {
            return Err(ClientError::InvalidName(format!(
                "name is {} bytes (max {})",
                name.len(),
                MAX_PLAYER_NAME
            )));
        }
        if name.contains('\0') {
            return Err(ClientError::InvalidName("name contains NUL".to_string()));
        }
        Ok(Self(name))
    }

    /// Cut a name down to the field size at a char boundary
    pub fn truncated(name: &str) -> Result<Self> {
        let mut end = name.len().min(MAX_PLAYER_NAME);
        while !name.is_char_boundary(end) {
            end -= 1;
        }
        Self::new(&name[..end])
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl std::fmt::Display for PlayerName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A request sent from client to server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Log into the lobby
    Join { name: PlayerName },

    /// Open a new room owned by this client
    CreateRoom,

    /// Enter someone else's room
    Challenge { room_id: u32 },

    /// Claim a grid cell (0-8)
    Move { cell: u32 },

    /// Leave the server
    Quit,
}

impl Request {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Request::Join { .. } => CommandType::Join,
            Request::CreateRoom => CommandType::CreateRoom,
            Request::Challenge { .. } => CommandType::Challenge,
            Request::Move { .. } => CommandType::Move,
            Request::Quit => CommandType::Quit,
        }
    }
}
