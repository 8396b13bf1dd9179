//! Play state
//!
//! Turn token and playfield as last reported by the server. The server is
//! the authority: the client only mirrors what PLAYFIELD_AND_TURN carries.

use crate::protocol::{Cell, GRID_CELLS, GRID_SIZE};

/// Turn token and 3x3 grid
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayState {
    /// Nonzero while it is this client's turn
    turn_token: u32,

    /// Row-major cells
    grid: [Cell; GRID_CELLS],
}

impl PlayState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turn_token(&self) -> u32 {
        self.turn_token
    }

    /// Whether the server handed us the turn
    pub fn is_my_turn(&self) -> bool {
        self.turn_token != 0
    }

    pub fn grid(&self) -> &[Cell; GRID_CELLS] {
        &self.grid
    }

    /// Cell at `index`, or `None` past the grid
    pub fn cell(&self, index: usize) -> Option<Cell> {
        self.grid.get(index).copied()
    }

    /// Grid rows, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.grid.chunks(GRID_SIZE)
    }

    /// Overwrite token and grid from a server snapshot
    pub fn update(&mut self, turn_token: u32, grid: [Cell; GRID_CELLS]) {
        self.turn_token = turn_token;
        self.grid = grid;
    }

    /// Empty every cell, keeping the turn token
    pub fn clear_grid(&mut self) {
        self.grid = [Cell::Empty; GRID_CELLS];
    }

    /// Drop the turn token and empty the grid
    pub fn reset(&mut self) {
        self.turn_token = 0;
        self.clear_grid();
    }
}
