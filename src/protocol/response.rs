//! Response definitions
//!
//! Represents packets the server pushes to the client.

use super::CommandType;

/// Number of room slots in an ANNOUNCE_ROOM broadcast
pub const SERVER_MAX_ROOMS: usize = 10;

/// Side length of the playfield
pub const GRID_SIZE: usize = 3;

/// Number of cells in the playfield
pub const GRID_CELLS: usize = GRID_SIZE * GRID_SIZE;

/// Contents of a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum Cell {
    #[default]
    Empty = 0,
    X = 1,
    O = 2,
}

impl Cell {
    /// Map a raw wire value to a cell, if valid
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Cell::Empty),
            1 => Some(Cell::X),
            2 => Some(Cell::O),
            _ => None,
        }
    }

    pub fn as_u32(self) -> u32 {
        self as u32
    }

    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}

/// A decoded server packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Request accepted (join, challenge) or match started
    Ok,

    /// Request refused
    Negated,

    /// Server reports itself dead
    Dead,

    /// Client removed from the server
    Kick,

    /// The match room is closing, back to the lobby
    RoomClosing,

    /// A room owned by this client was destroyed
    RoomDestroyed { room_id: u32 },

    /// A room was created for this client
    RoomCreated { room_id: u32 },

    /// Snapshot of open rooms, 0 marks an empty slot
    AnnounceRoom { room_ids: [u32; SERVER_MAX_ROOMS] },

    /// Full playfield and whose turn it is
    PlayfieldAndTurn {
        turn_token: u32,
        grid: [Cell; GRID_CELLS],
    },
}

impl Response {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Response::Ok => CommandType::ResponseOk,
            Response::Negated => CommandType::ResponseNegated,
            Response::Dead => CommandType::ResponseDead,
            Response::Kick => CommandType::ResponseKick,
            Response::RoomClosing => CommandType::ResponseRoomClosing,
            Response::RoomDestroyed { .. } => CommandType::ResponseRoomDestroyed,
            Response::RoomCreated { .. } => CommandType::ResponseRoomCreated,
            Response::AnnounceRoom { .. } => CommandType::AnnounceRoom,
            Response::PlayfieldAndTurn { .. } => CommandType::GamePlayfieldAndTurn,
        }
    }
}
