//! The broadcast snapshot codec: a fixed, explicit byte layout for the
//! `Outer_space_update` topic, built and read without any schema
//! negotiation. Field order and widths are frozen here; a future change to
//! either should bump a version and move to a tagged, versioned frame —
//! none is needed yet since there has only ever been one layout.
//!
//! Frame order is fixed as `[topic][roster][world blob]`, since prior
//! source variants disagreed on ordering and this one settles it. Every
//! multi-byte numeric field in the world blob is little-endian, with no
//! padding inserted across fields.

use crate::constants::{MAX_TARGETS_DEFAULT, SLOTS};
use crate::frame::encode_frame;
use bytes::{Buf, BufMut, Bytes, BytesMut};

/// One shooter's wire-visible state. Present for every slot index 0..7
/// regardless of occupancy; the roster bitmap carries the occupancy bit.
/// A vacant slot is encoded with its fixed glyph and all-zero fields: a
/// slot's score/position/token are zeroed on vacancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShooterRecord {
    pub glyph: u8,
    pub row: i32,
    pub col: i32,
    pub score: u32,
    pub stunned_until_ms: u64,
    pub cooldown_until_ms: u64,
}

/// Wire size of one [`ShooterRecord`]: 1 + 4 + 4 + 4 + 8 + 8 bytes.
pub const SHOOTER_RECORD_SIZE: usize = 1 + 4 + 4 + 4 + 8 + 8;

impl ShooterRecord {
    fn write(&self, buf: &mut BytesMut) {
        buf.put_u8(self.glyph);
        buf.put_i32_le(self.row);
        buf.put_i32_le(self.col);
        buf.put_u32_le(self.score);
        buf.put_u64_le(self.stunned_until_ms);
        buf.put_u64_le(self.cooldown_until_ms);
    }

    fn read(buf: &mut Bytes) -> ShooterRecord {
        ShooterRecord {
            glyph: buf.get_u8(),
            row: buf.get_i32_le(),
            col: buf.get_i32_le(),
            score: buf.get_u32_le(),
            stunned_until_ms: buf.get_u64_le(),
            cooldown_until_ms: buf.get_u64_le(),
        }
    }
}

/// One target's wire-visible position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetRecord {
    pub row: i32,
    pub col: i32,
}

/// Wire size of one [`TargetRecord`]: 4 + 4 bytes.
pub const TARGET_RECORD_SIZE: usize = 4 + 4;

impl TargetRecord {
    fn write(&self, buf: &mut BytesMut) {
        buf.put_i32_le(self.row);
        buf.put_i32_le(self.col);
    }

    fn read(buf: &mut Bytes) -> TargetRecord {
        TargetRecord {
            row: buf.get_i32_le(),
            col: buf.get_i32_le(),
        }
    }
}

/// Everything the world blob needs, already extracted into plain wire types
/// by the `world` crate (which owns the actual `World` struct). Keeping this
/// crate free of a dependency on `world` keeps the codec a one-way mirror:
/// `world` depends on `protocol`, never the reverse.
pub struct SnapshotView {
    pub roster: [bool; SLOTS],
    pub shooters: [ShooterRecord; SLOTS],
    /// Live targets only; padded with zeroed records up to `max_targets`
    /// when encoded.
    pub targets: Vec<TargetRecord>,
    pub max_targets: u32,
    /// Row-major board grid, `board_size * board_size` bytes.
    pub board: Vec<u8>,
    pub board_size: u32,
}

/// Builds the length-prefixed topic frame shared by both publish topics.
pub fn topic_frame(topic: &str) -> BytesMut {
    encode_frame(topic.as_bytes())
}

/// Builds the length-prefixed roster bitmap frame: one byte per slot, 1 iff
/// occupied.
pub fn roster_frame(roster: [bool; SLOTS]) -> BytesMut {
    let mut body = [0u8; SLOTS];
    for (i, occupied) in roster.iter().enumerate() {
        body[i] = u8::from(*occupied);
    }
    encode_frame(&body)
}

/// Builds the length-prefixed world blob frame: 8 shooter records, padded
/// target records up to `view.max_targets`, the board grid, then the two
/// trailing counters.
pub fn world_blob_frame(view: &SnapshotView) -> BytesMut {
    let target_slots = view.max_targets.max(view.targets.len() as u32) as usize;
    let body_len = SHOOTER_RECORD_SIZE * SLOTS
        + TARGET_RECORD_SIZE * target_slots
        + view.board.len()
        + 4
        + 4;
    let mut body = BytesMut::with_capacity(body_len);

    for record in &view.shooters {
        record.write(&mut body);
    }

    for record in &view.targets {
        record.write(&mut body);
    }
    for _ in view.targets.len()..target_slots {
        TargetRecord { row: 0, col: 0 }.write(&mut body);
    }

    body.put_slice(&view.board);
    body.put_u32_le(view.roster.iter().filter(|o| **o).count() as u32);
    body.put_u32_le(view.targets.len() as u32);

    encode_frame(&body)
}

/// Decodes a roster bitmap frame body (after the length prefix is stripped).
pub fn decode_roster(body: &[u8]) -> [bool; SLOTS] {
    let mut roster = [false; SLOTS];
    for (i, byte) in body.iter().take(SLOTS).enumerate() {
        roster[i] = *byte != 0;
    }
    roster
}

/// Decodes a world blob frame body (the bytes *after* the length prefix has
/// already been stripped and the frame read in full). Used by test code and
/// any future display client to confirm the layout this module writes is the
/// layout it reads back.
pub fn decode_world_blob(mut body: Bytes, max_targets: u32, board_size: u32) -> SnapshotView {
    let mut shooters = [ShooterRecord {
        glyph: 0,
        row: 0,
        col: 0,
        score: 0,
        stunned_until_ms: 0,
        cooldown_until_ms: 0,
    }; SLOTS];
    for slot in shooters.iter_mut() {
        *slot = ShooterRecord::read(&mut body);
    }

    let mut targets = Vec::with_capacity(max_targets as usize);
    for _ in 0..max_targets {
        targets.push(TargetRecord::read(&mut body));
    }

    let board_len = (board_size * board_size) as usize;
    let board = body.split_to(board_len).to_vec();
    let shooter_count = body.get_u32_le();
    let target_count = body.get_u32_le();

    targets.truncate(target_count as usize);
    // The blob alone can't distinguish an occupied-but-untouched slot (score
    // 0, never stunned, never fired) from a vacant one. Occupancy is only
    // ever authoritative from the roster frame, so this decode leaves it
    // unset — callers must merge in a roster decoded from `roster_frame`'s
    // output separately. `shooter_count` is surfaced purely for cross-checks.
    let _ = shooter_count;

    SnapshotView {
        roster: [false; SLOTS],
        shooters,
        targets,
        max_targets,
        board,
        board_size,
    }
}
