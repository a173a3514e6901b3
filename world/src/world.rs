//! The mutable simulation state: board geometry, the 8 shooter slots, the
//! live target population, and the transient shot overlay painted onto the
//! rendered board. `World` owns its own RNG so that every random draw this
//! crate makes — token minting, initial placement, drift, growth placement —
//! flows through one seed, making a whole run reproducible given `--seed`.

use protocol::{GLYPH_EMPTY, GLYPH_SHOT_HORIZONTAL, GLYPH_SHOT_VERTICAL, GLYPH_TARGET, SLOTS};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::slot::{index_to_glyph, ShooterSlot, SLOT_TABLE};
use crate::target::Target;

/// The inner area targets and growth waves place into: the board minus the
/// two-cell-deep lane border each edge reserves for its pair of shooter
/// slots (slots 0-3 and 4-7 occupy columns/rows 0,1 and
/// 18,19 respectively on a 20-wide board).
const INNER_MARGIN: i32 = 2;

/// Construction-time configuration, set once per run from CLI flags (or test
/// defaults) and never mutated afterwards.
#[derive(Debug, Clone, Copy)]
pub struct WorldConfig {
    pub board_size: u32,
    pub max_targets: u32,
    pub initial_targets: u32,
    pub seed: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            board_size: protocol::BOARD_SIZE_DEFAULT,
            max_targets: protocol::MAX_TARGETS_DEFAULT,
            initial_targets: protocol::INITIAL_TARGETS_DEFAULT,
            seed: 0,
        }
    }
}

/// A transient shot-trail cell, painted over the board for one broadcast
/// cycle after a successful zap and cleared the next time [`World::render_board`]
/// runs for a fresh cycle.
#[derive(Debug, Clone, Copy)]
struct OverlayCell {
    row: i32,
    col: i32,
    glyph: u8,
}

pub struct World {
    pub board_size: u32,
    pub max_targets: u32,
    pub slots: [ShooterSlot; SLOTS],
    pub targets: Vec<Target>,
    pub last_kill_time_ms: u64,
    /// Incremented once per externally observable mutation (the
    /// "generation counter"). Lets tests assert that a refused command left
    /// the world untouched without comparing the whole struct.
    pub generation: u64,
    rng: StdRng,
    overlay: Vec<OverlayCell>,
}

impl World {
    /// Builds a fresh world: all slots vacant, `initial_targets` placed at
    /// random empty inner cells, the growth clock started at `now_ms`.
    pub fn new(config: WorldConfig, now_ms: u64) -> World {
        let mut world = World {
            board_size: config.board_size,
            max_targets: config.max_targets,
            slots: std::array::from_fn(|_| ShooterSlot::vacant()),
            targets: Vec::with_capacity(config.initial_targets as usize),
            last_kill_time_ms: now_ms,
            generation: 0,
            rng: StdRng::seed_from_u64(config.seed),
            overlay: Vec::new(),
        };
        let count = config.initial_targets.min(config.max_targets);
        for _ in 0..count {
            if let Some(target) = world.place_target_at_random_empty_cell() {
                world.targets.push(target);
            }
        }
        world
    }

    pub fn mint_token(&mut self) -> String {
        crate::tokens::mint(&mut self.rng)
    }

    /// Marks one externally observable mutation. Called by every rule that
    /// actually changes state and by the drift/growth tickers, never by a
    /// refusal path.
    pub fn bump_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// True if any shooter slot currently sits at `(row, col)`.
    pub fn shooter_at(&self, row: i32, col: i32) -> bool {
        self.slots.iter().any(|s| s.occupied && s.row == row && s.col == col)
    }

    /// Index of the first live target at `(row, col)`, if any.
    pub fn target_at(&self, row: i32, col: i32) -> Option<usize> {
        self.targets.iter().position(|t| t.row == row && t.col == col)
    }

    fn is_empty(&self, row: i32, col: i32) -> bool {
        !self.shooter_at(row, col) && self.target_at(row, col).is_none()
    }

    fn in_inner_bounds(&self, row: i32, col: i32) -> bool {
        let hi = self.board_size as i32 - 1 - INNER_MARGIN;
        (INNER_MARGIN..=hi).contains(&row) && (INNER_MARGIN..=hi).contains(&col)
    }

    /// Picks a uniformly random empty cell inside the inner area. Returns
    /// `None` only if the board is saturated, which the cap on
    /// `max_targets` relative to the inner area is sized to avoid in
    /// practice.
    fn place_target_at_random_empty_cell(&mut self) -> Option<Target> {
        let lo = INNER_MARGIN;
        let hi = self.board_size as i32 - 1 - INNER_MARGIN;
        if lo > hi {
            return None;
        }
        for _ in 0..256 {
            let row = self.rng.gen_range(lo..=hi);
            let col = self.rng.gen_range(lo..=hi);
            if self.is_empty(row, col) {
                return Some(Target { row, col });
            }
        }
        None
    }

    /// Picks a uniformly random point inside `spec`'s home lane that no
    /// entity currently occupies, for a fresh admission's spawn position.
    /// Falls back to the lane's fixed point (for a pinned axis, its only
    /// point) if every free cell along a free axis happens to be taken,
    /// which the 8-slot/256-target population never drives in practice.
    pub fn random_free_point_in_lane(&mut self, spec: &crate::slot::SlotSpec) -> (i32, i32) {
        for _ in 0..64 {
            let row = self.rng.gen_range(spec.row_lane.0..=spec.row_lane.1);
            let col = self.rng.gen_range(spec.col_lane.0..=spec.col_lane.1);
            if self.is_empty(row, col) {
                return (row, col);
            }
        }
        (spec.row_lane.0, spec.col_lane.0)
    }

    /// Removes the target at `index`, recording the kill for growth-wave
    /// timing.
    pub fn kill_target(&mut self, index: usize, now_ms: u64) -> Target {
        self.last_kill_time_ms = now_ms;
        self.targets.remove(index)
    }

    /// Nudges every target by a random step drawn from `{-1,0,+1}^2`,
    /// skipping a target whose nudge would land it outside the inner
    /// area or onto an occupied cell — mirrors the original's drift pass,
    /// which silently drops a move that would collide rather than retrying
    /// it. The `(0, 0)` draw is a legal no-op step, same as any other.
    pub fn drift(&mut self) {
        const DELTAS: [(i32, i32); 9] =
            [(-1, -1), (-1, 0), (-1, 1), (0, -1), (0, 0), (0, 1), (1, -1), (1, 0), (1, 1)];
        let mut moved = false;
        for i in 0..self.targets.len() {
            let delta = DELTAS[self.rng.gen_range(0..DELTAS.len())];
            let target = self.targets[i];
            let (row, col) = (target.row + delta.0, target.col + delta.1);
            if self.in_inner_bounds(row, col) && self.is_empty(row, col) {
                self.targets[i] = Target { row, col };
                moved = true;
            }
        }
        if moved {
            self.bump_generation();
        }
    }

    /// If at least [`protocol::GROWTH_INTERVAL_SECONDS`] have elapsed since
    /// the last kill, tops the population up to `ceil(count * GROWTH_FACTOR)`
    /// capped at `max_targets`. Returns the number of targets actually added.
    pub fn maybe_grow(&mut self, now_ms: u64) -> u32 {
        let elapsed_ms = now_ms.saturating_sub(self.last_kill_time_ms);
        if elapsed_ms < protocol::GROWTH_INTERVAL_SECONDS * 1_000 {
            return 0;
        }
        let current = self.targets.len() as u32;
        let target_count = ((current as f64) * protocol::GROWTH_FACTOR).ceil() as u32;
        let target_count = target_count.max(current).min(self.max_targets);
        let mut added = 0;
        while (self.targets.len() as u32) < target_count {
            match self.place_target_at_random_empty_cell() {
                Some(target) => {
                    self.targets.push(target);
                    added += 1;
                }
                None => break,
            }
        }
        if added > 0 {
            self.last_kill_time_ms = now_ms;
            self.bump_generation();
        }
        added
    }

    /// Paints a transient shot trail over `cells`, visible in the next
    /// [`World::render_board`] call and cleared by the one after that.
    pub fn paint_shot_trail(&mut self, cells: impl IntoIterator<Item = (i32, i32)>, glyph: u8) {
        self.overlay.extend(cells.into_iter().map(|(row, col)| OverlayCell { row, col, glyph }));
    }

    /// Renders the current board as a row-major byte grid, then clears the
    /// shot overlay so the next call starts from a blank trail. Render
    /// priority is empty < overlay < target < shooter, so a live entity is
    /// never hidden behind a stale trail pixel.
    pub fn render_board(&mut self) -> Vec<u8> {
        let size = self.board_size as usize;
        let mut board = vec![GLYPH_EMPTY; size * size];

        for cell in self.overlay.drain(..) {
            if let Some(index) = cell_index(cell.row, cell.col, self.board_size) {
                board[index] = cell.glyph;
            }
        }
        for target in &self.targets {
            if let Some(index) = cell_index(target.row, target.col, self.board_size) {
                board[index] = GLYPH_TARGET;
            }
        }
        for (slot_index, slot) in self.slots.iter().enumerate().filter(|(_, s)| s.occupied) {
            if let Some(index) = cell_index(slot.row, slot.col, self.board_size) {
                board[index] = index_to_glyph(slot_index) as u8;
            }
        }
        board
    }

    pub fn occupied_slot_count(&self) -> usize {
        self.slots.iter().filter(|s| s.occupied).count()
    }

    pub fn has_targets(&self) -> bool {
        !self.targets.is_empty()
    }

    /// Home lane geometry for `slot_index`, used by the rule evaluator to
    /// validate movement and resolve a fire axis.
    pub fn spec_for(&self, slot_index: usize) -> &'static crate::slot::SlotSpec {
        &SLOT_TABLE[slot_index]
    }
}

/// `GLYPH_SHOT_HORIZONTAL`/`GLYPH_SHOT_VERTICAL` are re-exported here purely
/// so callers painting a beam trail don't need to depend on `protocol`
/// directly for this one choice.
pub fn shot_glyph_for_axis(row_delta: i32) -> u8 {
    if row_delta == 0 {
        GLYPH_SHOT_HORIZONTAL
    } else {
        GLYPH_SHOT_VERTICAL
    }
}

fn cell_index(row: i32, col: i32, board_size: u32) -> Option<usize> {
    let size = board_size as i32;
    if (0..size).contains(&row) && (0..size).contains(&col) {
        Some((row * size + col) as usize)
    } else {
        None
    }
}
