//! Protocol Module
//!
//! Defines the wire protocol between client and game server.
//!
//! ## Protocol Format
//!
//! Fixed-layout binary packets over UDP. Every field is a little-endian
//! `u32`; the first one is the command tag. There is no length prefix and no
//! delimiter: the receiver identifies a packet by its total size and tag,
//! which only works because each datagram carries exactly one packet.
//!
//! ### Commands
//! - 0: JOIN         - Payload: player name (21, NUL-padded)
//! - 1: CHALLENGE    - Payload: room id
//! - 2: MOVE         - Payload: cell index
//! - 3: QUIT         - Payload: padding
//! - 4: CREATE_ROOM  - Payload: tag echo
//! - 5: ANNOUNCE_ROOM - Payload: 10 room ids
//! - 6..=12: status responses (some carry a room id)
//! - 13: PLAYFIELD_AND_TURN - Payload: turn token + 9 cells
//! - 14: END_RESULT  - reserved

mod command;
mod response;
mod codec;

pub use command::{CommandType, PlayerName, Request, MAX_PLAYER_NAME};
pub use response::{Cell, Response, GRID_CELLS, GRID_SIZE, SERVER_MAX_ROOMS};
pub use codec::{
    decode_request, decode_response, encode_request, encode_response, frame_table,
    receive_response, send_request, Frame,
};
pub use codec::{
    ANNOUNCE_FRAME_SIZE, ARG_FRAME_SIZE, COMMAND_SIZE, JOIN_FRAME_SIZE, MAX_PACKET_SIZE,
    NAME_FIELD_SIZE, PLAYFIELD_FRAME_SIZE, STATUS_FRAME_SIZE,
};
