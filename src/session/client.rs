//! Client session
//!
//! The state machine that ties the codec, the registry and the play state
//! together.
//!
//! ## Tick Model
//! Each call to [`ClientSession::tick`]:
//! 1. Runs any pending state switch (exit actions, then entry actions)
//! 2. Decodes at most one inbound packet using the current state's framing
//! 3. Applies the packet, which may change state
//! 4. Runs the switch caused by that packet right away
//!
//! Intents (`request_*`) send immediately; local preconditions that fail
//! drop the request without touching the network.

use std::collections::VecDeque;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::network::{Channel, Connector};
use crate::protocol::{receive_response, send_request, PlayerName, Request, Response, GRID_CELLS};

use super::{ClientState, PlayState, RoomRegistry, SessionEvent};

/// Events kept for the UI between drains; older ones are dropped first
pub const MAX_PENDING_EVENTS: usize = 256;

/// A client's whole view of the game
///
/// Single-threaded: every mutation happens on the thread that calls `tick`
/// and the intents.
pub struct ClientSession<C: Connector> {
    /// Session configuration
    config: ClientConfig,

    /// Opens the channel on join
    connector: C,

    /// Open channel, present from join until CONNECTION is re-entered
    channel: Option<C::Channel>,

    /// Current state
    state: ClientState,

    /// State as of the last switch
    switched_state: ClientState,

    /// Target server
    server_address: String,
    server_port: u16,

    /// Name sent with the last join
    player_name: Option<PlayerName>,

    /// Room this client created, if any
    created_room: Option<u32>,

    /// Whether this client owns an open room
    in_room: bool,

    /// Announced rooms and the challenge target input
    rooms: RoomRegistry,

    /// Turn token and grid
    play: PlayState,

    /// Events not yet drained by the UI, oldest first
    events: VecDeque<SessionEvent>,

    /// Set once the user asked to quit
    quit: bool,

    /// Receive buffer reused every tick
    buffer: Vec<u8>,
}

impl<C: Connector> ClientSession<C> {
    /// Create a session in CONNECTION
    ///
    /// Runs the initial CONNECTION entry so the session starts from the
    /// same clean state every later entry produces.
    pub fn new(config: ClientConfig, connector: C) -> Result<Self> {
        config.validate()?;

        let mut session = Self {
            server_address: config.server_address.clone(),
            server_port: config.server_port,
            buffer: vec![0u8; config.max_packet_size],
            config,
            connector,
            channel: None,
            state: ClientState::Connection,
            switched_state: ClientState::Connection,
            player_name: None,
            created_room: None,
            in_room: false,
            rooms: RoomRegistry::new(),
            play: PlayState::new(),
            events: VecDeque::new(),
            quit: false,
        };

        session.on_state_switch(ClientState::Connection, ClientState::Connection, true);
        Ok(session)
    }

    // =========================================================================
    // State Machine
    // =========================================================================

    /// Run exit actions for `previous` and, if asked, entry actions for
    /// `current`
    pub fn on_state_switch(
        &mut self,
        previous: ClientState,
        current: ClientState,
        apply_current_entry_actions: bool,
    ) {
        tracing::debug!(
            "State switch {} -> {} (entry actions: {})",
            previous,
            current,
            apply_current_entry_actions
        );

        match previous {
            ClientState::Connection => {
                self.emit(SessionEvent::ResetPressedInput);
            }
            ClientState::WaitingRoom => {
                self.created_room = None;
                self.rooms.clear();
            }
            ClientState::Play => {}
        }

        if !apply_current_entry_actions {
            return;
        }

        match current {
            ClientState::Connection => {
                self.close_channel();
            }
            ClientState::WaitingRoom => {
                self.in_room = false;
                self.play.reset();
                self.rooms.clear();
            }
            ClientState::Play => {
                self.play.clear_grid();
            }
        }
    }

    /// Advance the session by one poll
    ///
    /// Returns the packet decoded this tick, if any.
    pub fn tick(&mut self) -> Option<Response> {
        self.apply_pending_switch();

        let response = self.receive()?;
        match self.state {
            ClientState::Connection => self.handle_connection(&response),
            ClientState::WaitingRoom => self.handle_waiting_room(&response),
            ClientState::Play => self.handle_play(&response),
        }

        self.apply_pending_switch();
        Some(response)
    }

    /// Switch if the state moved since the last switch
    fn apply_pending_switch(&mut self) {
        let previous = self.switched_state;
        let current = self.state;
        if previous == current {
            return;
        }

        self.on_state_switch(previous, current, true);
        self.switched_state = current;
        self.emit(SessionEvent::StateChanged {
            from: previous,
            to: current,
        });
        tracing::info!("Client state {} -> {}", previous, current);
    }

    /// Decode at most one pending packet
    ///
    /// Framing and payload errors drop the packet; receive failures count as
    /// silence.
    fn receive(&mut self) -> Option<Response> {
        let channel = self.channel.as_mut()?;

        match receive_response(channel, self.state, &mut self.buffer) {
            Ok(response) => response,
            Err(ClientError::Unrecognized { length, command }) => {
                tracing::warn!(
                    "Dropping unrecognized packet in {}: {} bytes, command {:?}",
                    self.state,
                    length,
                    command
                );
                None
            }
            Err(ClientError::Protocol(msg)) => {
                tracing::warn!("Dropping malformed packet in {}: {}", self.state, msg);
                None
            }
            Err(e) => {
                tracing::warn!("Receive failed in {}: {}", self.state, e);
                None
            }
        }
    }

    // =========================================================================
    // Per-state Handlers
    // =========================================================================

    fn handle_connection(&mut self, response: &Response) {
        match response {
            Response::Ok => {
                tracing::info!("Joined server {}:{}", self.server_address, self.server_port);
                self.state = ClientState::WaitingRoom;
            }
            Response::Negated => {
                tracing::info!("Join refused by server");
                self.emit(SessionEvent::JoinRejected);
            }
            Response::Dead => {
                tracing::warn!("Server reports it is dead");
                self.emit(SessionEvent::ServerDead);
            }
            _ => {}
        }
    }

    fn handle_waiting_room(&mut self, response: &Response) {
        match response {
            Response::Ok => {
                tracing::info!("Match starting");
                self.state = ClientState::Play;
            }
            Response::Kick => {
                tracing::info!("Kicked from server");
                self.emit(SessionEvent::Kicked);
                self.state = ClientState::Connection;
            }
            Response::RoomDestroyed { room_id } => {
                tracing::info!("Room {} was destroyed", room_id);
                self.in_room = false;
                self.created_room = None;
                self.emit(SessionEvent::RoomDestroyed(*room_id));
            }
            Response::RoomCreated { room_id } => {
                tracing::info!("Room {} was created", room_id);
                self.in_room = true;
                self.created_room = Some(*room_id);
                self.rooms.clear();
                self.emit(SessionEvent::RoomCreated(*room_id));
            }
            Response::AnnounceRoom { room_ids } => {
                self.rooms.overwrite(*room_ids);
                tracing::debug!("Room announcement: {:?}", room_ids);
            }
            _ => {}
        }
    }

    fn handle_play(&mut self, response: &Response) {
        match response {
            Response::Ok => {}
            Response::Kick => {
                tracing::info!("Kicked from match");
                self.emit(SessionEvent::Kicked);
                self.state = ClientState::Connection;
            }
            Response::RoomClosing => {
                tracing::info!("Room closing, back to waiting room");
                self.state = ClientState::WaitingRoom;
            }
            Response::PlayfieldAndTurn { turn_token, grid } => {
                self.play.update(*turn_token, *grid);
                tracing::debug!("Playfield update, turn token {}", turn_token);
                let my_turn = self.play.is_my_turn();
                self.emit(SessionEvent::TurnUpdated { my_turn });
            }
            _ => {}
        }
    }

    // =========================================================================
    // Intents
    // =========================================================================

    /// Set the server the next join connects to
    pub fn set_server(&mut self, address: impl Into<String>, port: u16) {
        self.server_address = address.into();
        self.server_port = port;
    }

    /// Open a channel if needed and send JOIN
    ///
    /// Names longer than the wire field are truncated. Returns `Ok(false)`
    /// outside CONNECTION.
    pub fn request_join(&mut self, name: &str) -> Result<bool> {
        if self.state != ClientState::Connection {
            tracing::debug!("Ignoring join request in {}", self.state);
            return Ok(false);
        }

        let name = PlayerName::truncated(name)?;

        if self.channel.is_none() {
            let channel = self.connector.open(&self.server_address, self.server_port)?;
            self.channel = Some(channel);
        }

        self.send(&Request::Join { name: name.clone() })?;
        tracing::info!(
            "Join requested as {} at {}:{}",
            name,
            self.server_address,
            self.server_port
        );
        self.player_name = Some(name);
        Ok(true)
    }

    /// Ask the server for a room of our own
    pub fn request_create_room(&mut self) -> Result<bool> {
        if self.state != ClientState::WaitingRoom || self.in_room {
            tracing::debug!("Ignoring create room request (state {}, in room {})", self.state, self.in_room);
            return Ok(false);
        }

        self.send(&Request::CreateRoom)?;
        tracing::debug!("Room creation requested");
        Ok(true)
    }

    /// Challenge an announced room
    ///
    /// Rooms missing from the registry are never sent to the server.
    pub fn request_challenge(&mut self, room_id: u32) -> Result<bool> {
        if self.state != ClientState::WaitingRoom || self.in_room {
            tracing::debug!("Ignoring challenge request (state {}, in room {})", self.state, self.in_room);
            return Ok(false);
        }

        if !self.rooms.contains(room_id) {
            tracing::debug!("Ignoring challenge to unknown room {}", room_id);
            return Ok(false);
        }

        self.send(&Request::Challenge { room_id })?;
        tracing::debug!("Challenge requested for room {}", room_id);
        Ok(true)
    }

    /// Store the room id the user typed in
    pub fn set_target_room(&mut self, room_id: u32) {
        self.rooms.set_target(room_id);
    }

    /// Challenge the stored target room
    pub fn request_challenge_target(&mut self) -> Result<bool> {
        match self.rooms.target() {
            Some(room_id) => self.request_challenge(room_id),
            None => Ok(false),
        }
    }

    /// Claim a cell, only while holding the turn token
    pub fn request_move(&mut self, cell: usize) -> Result<bool> {
        if self.state != ClientState::Play {
            tracing::debug!("Ignoring move in {}", self.state);
            return Ok(false);
        }

        if !self.play.is_my_turn() {
            tracing::debug!("Not your turn, move to cell {} dropped", cell);
            return Ok(false);
        }

        if cell >= GRID_CELLS {
            tracing::debug!("Cell {} is off the grid", cell);
            return Ok(false);
        }

        self.send(&Request::Move { cell: cell as u32 })?;
        tracing::debug!("Move requested on cell {}", cell);
        Ok(true)
    }

    /// Leave the server and flag the session for exit
    ///
    /// QUIT is only sent when logged in. The quit flag is set even if the
    /// send fails.
    pub fn request_quit(&mut self) -> Result<bool> {
        self.quit = true;

        let sent = if self.state != ClientState::Connection && self.channel.is_some() {
            let result = self.send(&Request::Quit);
            self.close_channel();
            result?;
            true
        } else {
            self.close_channel();
            false
        };

        tracing::info!("Quit requested");
        Ok(sent)
    }

    fn send(&mut self, request: &Request) -> Result<()> {
        let channel = self.channel.as_mut().ok_or(ClientError::ChannelClosed)?;
        send_request(channel, request)
    }

    fn close_channel(&mut self) {
        if let Some(channel) = self.channel.take() {
            channel.close();
            tracing::debug!("Channel closed");
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn state(&self) -> ClientState {
        self.state
    }

    pub fn rooms(&self) -> &RoomRegistry {
        &self.rooms
    }

    pub fn play(&self) -> &PlayState {
        &self.play
    }

    /// Room this client created, if any
    pub fn created_room(&self) -> Option<u32> {
        self.created_room
    }

    /// Whether this client owns an open room
    pub fn in_room(&self) -> bool {
        self.in_room
    }

    pub fn target_room(&self) -> Option<u32> {
        self.rooms.target()
    }

    pub fn player_name(&self) -> Option<&PlayerName> {
        self.player_name.as_ref()
    }

    pub fn server(&self) -> (&str, u16) {
        (&self.server_address, self.server_port)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Whether a channel is open
    pub fn is_connected(&self) -> bool {
        self.channel.is_some()
    }

    /// Whether the driving loop should stop
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Take every event queued since the last drain
    ///
    /// Drivers should call this once per tick. Only the newest
    /// [`MAX_PENDING_EVENTS`] events are kept between drains.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        self.events.drain(..).collect()
    }

    /// Queue an event for the UI
    fn emit(&mut self, event: SessionEvent) {
        if self.events.len() == MAX_PENDING_EVENTS {
            if let Some(dropped) = self.events.pop_front() {
                tracing::trace!("Event queue full, dropping {:?}", dropped);
            }
        }
        self.events.push_back(event);
    }
}

impl<C: Connector> Drop for ClientSession<C> {
    fn drop(&mut self) {
        self.close_channel();
    }
}
