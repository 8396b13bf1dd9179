//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol.
//!
//! ## Wire Format
//!
//! Every packet starts with a little-endian `u32` command tag. There is no
//! length prefix: a packet's meaning comes from its total length together
//! with the tag, looked up in a framing table.
//!
//! ### Requests (client -> server)
//! ```text
//! JOIN         ┌─────────┬───────────────────────────┐
//!              │ Cmd (4) │ Name (21, NUL-padded)     │   25 bytes
//!              └─────────┴───────────────────────────┘
//! CREATE_ROOM  ┌─────────┬─────────┐
//! CHALLENGE    │ Cmd (4) │ Arg (4) │                      8 bytes
//! MOVE         └─────────┴─────────┘
//! QUIT
//! ```
//!
//! ### Responses (server -> client)
//! ```text
//! OK/NEGATED/DEAD/KICK/CLOSING  ┌─────────┐                       4 bytes
//!                               │ Cmd (4) │
//!                               └─────────┘
//! ROOM_DESTROYED/ROOM_CREATED   ┌─────────┬─────────────┐         8 bytes
//!                               │ Cmd (4) │ Room id (4) │
//!                               └─────────┴─────────────┘
//! ANNOUNCE_ROOM                 ┌─────────┬─────────────────┐    44 bytes
//!                               │ Cmd (4) │ 10 x room id (4)│
//!                               └─────────┴─────────────────┘
//! PLAYFIELD_AND_TURN            ┌─────────┬──────────┬──────────────┐ 44 bytes
//!                               │ Cmd (4) │ Turn (4) │ 9 x cell (4) │
//!                               └─────────┴──────────┴──────────────┘
//! ```

use bytes::{Buf, BufMut};

use super::{Cell, CommandType, PlayerName, Request, Response};
use super::{GRID_CELLS, MAX_PLAYER_NAME, SERVER_MAX_ROOMS};
use crate::error::{ClientError, Result};
use crate::network::Channel;
use crate::session::ClientState;

/// Size of the command tag
pub const COMMAND_SIZE: usize = 4;

/// Size of the JOIN name field (name plus NUL terminator)
pub const NAME_FIELD_SIZE: usize = MAX_PLAYER_NAME + 1;

/// JOIN frame: command + name field
pub const JOIN_FRAME_SIZE: usize = COMMAND_SIZE + NAME_FIELD_SIZE;

/// Bare status frame: command only
pub const STATUS_FRAME_SIZE: usize = COMMAND_SIZE;

/// Command + one `u32` argument
pub const ARG_FRAME_SIZE: usize = COMMAND_SIZE + 4;

/// ANNOUNCE_ROOM frame: command + room id array
pub const ANNOUNCE_FRAME_SIZE: usize = COMMAND_SIZE + 4 * SERVER_MAX_ROOMS;

/// PLAYFIELD_AND_TURN frame: command + turn token + grid
pub const PLAYFIELD_FRAME_SIZE: usize = COMMAND_SIZE + 4 + 4 * GRID_CELLS;

/// Receive buffer size; every frame fits
pub const MAX_PACKET_SIZE: usize = 64;

/// A framing table entry: total packet length and the command it must carry
pub type Frame = (usize, CommandType);

const CONNECTION_FRAMES: &[Frame] = &[
    (STATUS_FRAME_SIZE, CommandType::ResponseOk),
    (STATUS_FRAME_SIZE, CommandType::ResponseNegated),
    (STATUS_FRAME_SIZE, CommandType::ResponseDead),
];

const WAITING_ROOM_FRAMES: &[Frame] = &[
    (STATUS_FRAME_SIZE, CommandType::ResponseOk),
    (STATUS_FRAME_SIZE, CommandType::ResponseKick),
    (ARG_FRAME_SIZE, CommandType::ResponseRoomDestroyed),
    (ARG_FRAME_SIZE, CommandType::ResponseRoomCreated),
    (ANNOUNCE_FRAME_SIZE, CommandType::AnnounceRoom),
];

const PLAY_FRAMES: &[Frame] = &[
    (STATUS_FRAME_SIZE, CommandType::ResponseOk),
    (STATUS_FRAME_SIZE, CommandType::ResponseKick),
    (STATUS_FRAME_SIZE, CommandType::ResponseRoomClosing),
    (PLAYFIELD_FRAME_SIZE, CommandType::GamePlayfieldAndTurn),
];

const REQUEST_FRAMES: &[Frame] = &[
    (JOIN_FRAME_SIZE, CommandType::Join),
    (ARG_FRAME_SIZE, CommandType::CreateRoom),
    (ARG_FRAME_SIZE, CommandType::Challenge),
    (ARG_FRAME_SIZE, CommandType::Move),
    (ARG_FRAME_SIZE, CommandType::Quit),
];

/// Server packets the client accepts while in `state`
pub fn frame_table(state: ClientState) -> &'static [Frame] {
    match state {
        ClientState::Connection => CONNECTION_FRAMES,
        ClientState::WaitingRoom => WAITING_ROOM_FRAMES,
        ClientState::Play => PLAY_FRAMES,
    }
}

/// Look up `bytes` in a framing table
///
/// Returns the matched command, or `Unrecognized` for any length/command
/// combination outside the table.
fn match_frame(frames: &[Frame], bytes: &[u8]) -> Result<CommandType> {
    if bytes.len() < COMMAND_SIZE {
        return Err(ClientError::Unrecognized {
            length: bytes.len(),
            command: None,
        });
    }

    let raw = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);

    frames
        .iter()
        .find(|(length, command)| *length == bytes.len() && command.as_u32() == raw)
        .map(|&(_, command)| command)
        .ok_or(ClientError::Unrecognized {
            length: bytes.len(),
            command: Some(raw),
        })
}

// =============================================================================
// Request Encoding/Decoding
// =============================================================================

/// Encode a request to bytes
pub fn encode_request(request: &Request) -> Vec<u8> {
    let command = request.command_type().as_u32();

    match request {
        Request::Join { name } => {
            let mut message = Vec::with_capacity(JOIN_FRAME_SIZE);
            message.put_u32_le(command);
            message.put_slice(name.as_bytes());
            // Zero-pad the rest of the field, always leaving a terminator
            message.resize(JOIN_FRAME_SIZE, 0);
            message
        }
        Request::CreateRoom => {
            // The server expects an 8-byte frame; the argument echoes the tag
            let mut message = Vec::with_capacity(ARG_FRAME_SIZE);
            message.put_u32_le(command);
            message.put_u32_le(command);
            message
        }
        Request::Challenge { room_id } => {
            let mut message = Vec::with_capacity(ARG_FRAME_SIZE);
            message.put_u32_le(command);
            message.put_u32_le(*room_id);
            message
        }
        Request::Move { cell } => {
            let mut message = Vec::with_capacity(ARG_FRAME_SIZE);
            message.put_u32_le(command);
            message.put_u32_le(*cell);
            message
        }
        Request::Quit => {
            let mut message = Vec::with_capacity(ARG_FRAME_SIZE);
            message.put_u32_le(command);
            message.put_u32_le(0);
            message
        }
    }
}

/// Decode a request from bytes
pub fn decode_request(bytes: &[u8]) -> Result<Request> {
    let command = match_frame(REQUEST_FRAMES, bytes)?;
    let mut payload = &bytes[COMMAND_SIZE..];

    match command {
        CommandType::Join => decode_join_request(payload),
        CommandType::CreateRoom => Ok(Request::CreateRoom),
        CommandType::Challenge => Ok(Request::Challenge {
            room_id: payload.get_u32_le(),
        }),
        CommandType::Move => Ok(Request::Move {
            cell: payload.get_u32_le(),
        }),
        CommandType::Quit => Ok(Request::Quit),
        other => Err(ClientError::Protocol(format!(
            "{:?} is not a request",
            other
        ))),
    }
}

/// Decode the JOIN name field
fn decode_join_request(field: &[u8]) -> Result<Request> {
    let end = field.iter().position(|&b| b == 0).ok_or_else(|| {
        ClientError::Protocol("JOIN request: name field is not terminated".to_string())
    })?;

    let name = std::str::from_utf8(&field[..end])
        .map_err(|e| ClientError::Protocol(format!("JOIN request: name is not UTF-8: {}", e)))?;

    let name = PlayerName::new(name)
        .map_err(|e| ClientError::Protocol(format!("JOIN request: {}", e)))?;

    Ok(Request::Join { name })
}

// =============================================================================
// Response Encoding/Decoding
// =============================================================================

/// Encode a response to bytes
pub fn encode_response(response: &Response) -> Vec<u8> {
    let command = response.command_type().as_u32();

    match response {
        Response::Ok
        | Response::Negated
        | Response::Dead
        | Response::Kick
        | Response::RoomClosing => command.to_le_bytes().to_vec(),
        Response::RoomDestroyed { room_id } | Response::RoomCreated { room_id } => {
            let mut message = Vec::with_capacity(ARG_FRAME_SIZE);
            message.put_u32_le(command);
            message.put_u32_le(*room_id);
            message
        }
        Response::AnnounceRoom { room_ids } => {
            let mut message = Vec::with_capacity(ANNOUNCE_FRAME_SIZE);
            message.put_u32_le(command);
            for room_id in room_ids {
                message.put_u32_le(*room_id);
            }
            message
        }
        Response::PlayfieldAndTurn { turn_token, grid } => {
            let mut message = Vec::with_capacity(PLAYFIELD_FRAME_SIZE);
            message.put_u32_le(command);
            message.put_u32_le(*turn_token);
            for cell in grid {
                message.put_u32_le(cell.as_u32());
            }
            message
        }
    }
}

/// Decode a response received while in `state`
///
/// An empty buffer means no packet arrived this tick and yields `Ok(None)`.
/// Anything outside the state's framing table is `Unrecognized`.
pub fn decode_response(state: ClientState, bytes: &[u8]) -> Result<Option<Response>> {
    if bytes.is_empty() {
        return Ok(None);
    }

    let command = match_frame(frame_table(state), bytes)?;
    let mut payload = &bytes[COMMAND_SIZE..];

    let response = match command {
        CommandType::ResponseOk => Response::Ok,
        CommandType::ResponseNegated => Response::Negated,
        CommandType::ResponseDead => Response::Dead,
        CommandType::ResponseKick => Response::Kick,
        CommandType::ResponseRoomClosing => Response::RoomClosing,
        CommandType::ResponseRoomDestroyed => Response::RoomDestroyed {
            room_id: payload.get_u32_le(),
        },
        CommandType::ResponseRoomCreated => Response::RoomCreated {
            room_id: payload.get_u32_le(),
        },
        CommandType::AnnounceRoom => {
            let mut room_ids = [0u32; SERVER_MAX_ROOMS];
            for room_id in room_ids.iter_mut() {
                *room_id = payload.get_u32_le();
            }
            Response::AnnounceRoom { room_ids }
        }
        CommandType::GamePlayfieldAndTurn => decode_playfield(payload)?,
        other => {
            return Err(ClientError::Protocol(format!(
                "{:?} has no response frame",
                other
            )))
        }
    };

    Ok(Some(response))
}

/// Decode PLAYFIELD_AND_TURN payload
fn decode_playfield(mut payload: &[u8]) -> Result<Response> {
    let turn_token = payload.get_u32_le();

    let mut grid = [Cell::Empty; GRID_CELLS];
    for (index, cell) in grid.iter_mut().enumerate() {
        let raw = payload.get_u32_le();
        *cell = Cell::from_u32(raw).ok_or_else(|| {
            ClientError::Protocol(format!(
                "PLAYFIELD_AND_TURN: cell {} has invalid value {}",
                index, raw
            ))
        })?;
    }

    Ok(Response::PlayfieldAndTurn { turn_token, grid })
}

// =============================================================================
// Channel I/O helpers
// =============================================================================

/// Encode and send a request over a channel
pub fn send_request<C: Channel + ?Sized>(channel: &mut C, request: &Request) -> Result<()> {
    let bytes = encode_request(request);
    tracing::trace!("Sending {:?} ({} bytes)", request.command_type(), bytes.len());
    channel.send(&bytes)
}

/// Receive at most one packet and decode it for `state`
///
/// Transport failures and framing failures both surface as errors; the
/// caller decides which ones are fatal.
pub fn receive_response<C: Channel + ?Sized>(
    channel: &mut C,
    state: ClientState,
    buffer: &mut [u8],
) -> Result<Option<Response>> {
    let received = channel.receive(buffer)?;
    if received > 0 {
        tracing::trace!("Received {} bytes: {:?}", received, &buffer[..received]);
    }
    decode_response(state, &buffer[..received])
}
