//! Room registry
//!
//! Client-side cache of the rooms the server last announced as open, plus
//! the room id the user has typed in as a challenge target.

use crate::protocol::SERVER_MAX_ROOMS;

/// Fixed set of announced room slots; 0 marks an empty slot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomRegistry {
    slots: [u32; SERVER_MAX_ROOMS],

    /// Room id entered by the user, if any
    target: Option<u32>,
}

impl RoomRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw slots in announcement order
    pub fn slots(&self) -> &[u32; SERVER_MAX_ROOMS] {
        &self.slots
    }

    /// Replace every slot with an announced snapshot
    pub fn overwrite(&mut self, room_ids: [u32; SERVER_MAX_ROOMS]) {
        self.slots = room_ids;
    }

    /// Whether `room_id` is currently announced; 0 is never a room
    pub fn contains(&self, room_id: u32) -> bool {
        room_id != 0 && self.slots.contains(&room_id)
    }

    /// Announced room ids, skipping empty slots
    pub fn open_rooms(&self) -> impl Iterator<Item = u32> + '_ {
        self.slots.iter().copied().filter(|&id| id != 0)
    }

    /// Number of announced rooms
    pub fn len(&self) -> usize {
        self.open_rooms().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Room id the user wants to challenge
    pub fn target(&self) -> Option<u32> {
        self.target
    }

    pub fn set_target(&mut self, room_id: u32) {
        self.target = Some(room_id);
    }

    pub fn clear_target(&mut self) {
        self.target = None;
    }

    /// Empty every slot and drop the target input
    pub fn clear(&mut self) {
        self.slots = [0; SERVER_MAX_ROOMS];
        self.target = None;
    }
}
