//! Shooter slots: their fixed home lanes, firing axes, and the per-slot
//! state (position, score, stun, cooldown, token). Grounded on the
//! `X_MIN`/`X_MAX`/`Y_MIN`/`Y_MAX` per-player bounds arrays implied by
//! `game-server.c`'s movement and shoot handling, made explicit as a lane
//! table here instead of four parallel index-keyed arrays.

use protocol::{Direction, SLOTS};

/// A half-open... no, an *inclusive* coordinate range a slot's position must
/// stay within along one axis. `(lo, hi)` with `lo == hi` means that axis is
/// pinned (the slot cannot move along it).
pub type Lane = (i32, i32);

/// One slot's fixed geometry: its home lane and the direction its shots
/// travel. Movement is legal only along the axis that isn't pinned.
#[derive(Debug, Clone, Copy)]
pub struct SlotSpec {
    pub row_lane: Lane,
    pub col_lane: Lane,
    pub fire_delta: (i32, i32),
}

/// Slot home lanes and firing axes, indexed by slot 0..7 (glyph A..H), per
/// the slot geometry table.
pub const SLOT_TABLE: [SlotSpec; SLOTS] = [
    SlotSpec { row_lane: (2, 17), col_lane: (0, 0), fire_delta: (0, 1) },
    SlotSpec { row_lane: (2, 17), col_lane: (1, 1), fire_delta: (0, 1) },
    SlotSpec { row_lane: (2, 17), col_lane: (18, 18), fire_delta: (0, -1) },
    SlotSpec { row_lane: (2, 17), col_lane: (19, 19), fire_delta: (0, -1) },
    SlotSpec { row_lane: (0, 0), col_lane: (2, 17), fire_delta: (1, 0) },
    SlotSpec { row_lane: (1, 1), col_lane: (2, 17), fire_delta: (1, 0) },
    SlotSpec { row_lane: (18, 18), col_lane: (2, 17), fire_delta: (-1, 0) },
    SlotSpec { row_lane: (19, 19), col_lane: (2, 17), fire_delta: (-1, 0) },
];

/// Maps a wire glyph (`A`..`H`) to a slot index, if legal.
pub fn glyph_to_index(glyph: char) -> Option<usize> {
    let index = (glyph as i32) - ('A' as i32);
    if (0..SLOTS as i32).contains(&index) {
        Some(index as usize)
    } else {
        None
    }
}

/// Maps a slot index back to its wire glyph.
pub fn index_to_glyph(index: usize) -> char {
    (b'A' + index as u8) as char
}

impl SlotSpec {
    /// Whether `(row, col)` lies inside this slot's home lane.
    pub fn contains(&self, row: i32, col: i32) -> bool {
        (self.row_lane.0..=self.row_lane.1).contains(&row)
            && (self.col_lane.0..=self.col_lane.1).contains(&col)
    }

    /// Applies one cardinal step, without any bounds or collision checking.
    pub fn step(row: i32, col: i32, direction: Direction) -> (i32, i32) {
        match direction {
            Direction::Up => (row - 1, col),
            Direction::Down => (row + 1, col),
            Direction::Left => (row, col - 1),
            Direction::Right => (row, col + 1),
        }
    }
}

/// Per-slot mutable state.
#[derive(Debug, Clone)]
pub struct ShooterSlot {
    pub occupied: bool,
    pub row: i32,
    pub col: i32,
    pub score: u32,
    pub stunned_until_ms: u64,
    pub cooldown_until_ms: u64,
    pub token: Option<String>,
}

impl ShooterSlot {
    pub fn vacant() -> Self {
        ShooterSlot {
            occupied: false,
            row: 0,
            col: 0,
            score: 0,
            stunned_until_ms: 0,
            cooldown_until_ms: 0,
            token: None,
        }
    }

    /// Resets every field to the vacant baseline (score is not
    /// preserved across disconnect-then-reconnect into the same slot).
    pub fn vacate(&mut self) {
        *self = ShooterSlot::vacant();
    }

    pub fn is_stunned(&self, now_ms: u64) -> bool {
        now_ms < self.stunned_until_ms
    }

    pub fn is_on_cooldown(&self, now_ms: u64) -> bool {
        now_ms < self.cooldown_until_ms
    }
}
