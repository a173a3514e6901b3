//! The rule evaluator: the only code in this crate allowed to mutate a
//! [`World`]. `evaluate` is a pure function of `(&mut World, Request, now_ms)`
//! — every stun/cooldown/growth timing decision is
//! driven by the injected clock, never a real one, so every scenario here is
//! exercised deterministically in the tests below.
//!
//! Beam tracing and the stun/cooldown gates mirror the four direction-keyed
//! loop blocks and the `stunned_time`/`last_shot_time` checks in
//! `game-server.c`'s `process_message`, generalized from four copy-pasted
//! blocks into one walk along a slot's `fire_delta`.

use protocol::{reply, Direction, Request};

use crate::slot::glyph_to_index;
use crate::world::{shot_glyph_for_axis, World};

/// Everything the transport layer needs to know about how a request changed
/// the world: the text to send back to the requester, whether the world
/// changed enough to warrant an out-of-band broadcast, the score this single
/// action produced (drives the optional archive push), and whether the
/// target population has just been permanently depleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub reply: String,
    pub broadcast: bool,
    pub play_score: u32,
    pub depleted: bool,
    pub joined: Option<Joined>,
}

/// Slot a fresh `Astronaut_connect` was admitted into, so the transport
/// layer can remember which TCP peer owns which token for the eventual
/// disconnect-on-drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Joined {
    pub glyph: char,
    pub token: String,
    pub slot_index: usize,
}

impl Outcome {
    fn silent(reply: &str) -> Outcome {
        Outcome {
            reply: reply.to_string(),
            broadcast: false,
            play_score: 0,
            depleted: false,
            joined: None,
        }
    }
}

/// Applies one decoded request to `world`, returning the reply and the
/// side-effect summary the transport layer needs. `now_ms` stands in for
/// wall-clock time so every timing rule is testable without a real clock.
pub fn evaluate(world: &mut World, request: Request, now_ms: u64) -> Outcome {
    match request {
        Request::Connect => connect(world, now_ms),
        Request::Move { glyph, direction, token } => move_shooter(world, glyph, direction, &token, now_ms),
        Request::Zap { glyph, token } => zap(world, glyph, &token, now_ms),
        Request::Disconnect { glyph, token } => disconnect(world, glyph, &token),
        Request::Unknown => Outcome::silent(reply::INVALID_MESSAGE),
    }
}

fn connect(world: &mut World, now_ms: u64) -> Outcome {
    let Some(slot_index) = (0..protocol::SLOTS).find(|&i| !world.slots[i].occupied) else {
        return Outcome::silent(reply::GAME_FULL);
    };

    let token = world.mint_token();
    let glyph = crate::slot::index_to_glyph(slot_index);
    let spec = *world.spec_for(slot_index);
    let (row, col) = world.random_free_point_in_lane(&spec);

    let slot = &mut world.slots[slot_index];
    slot.occupied = true;
    slot.row = row;
    slot.col = col;
    slot.score = 0;
    slot.stunned_until_ms = 0;
    slot.cooldown_until_ms = now_ms;
    slot.token = Some(token.clone());
    world.bump_generation();

    Outcome {
        reply: reply::welcome(glyph, &token),
        broadcast: true,
        play_score: 0,
        depleted: false,
        joined: Some(Joined { glyph, token, slot_index }),
    }
}

/// Resolves `glyph`/`token` to a slot index, or the reply to send back if
/// that fails. Shared by move/zap/disconnect, which differ only in which
/// timing gates they check afterwards.
///
/// A vacant slot's `token` is `None`, which never equals `Some(token)`, so an
/// unoccupied slot naturally falls through to "invalid token" rather than
/// "Astronaut not found" — required for the idempotent-disconnect law:
/// disconnecting twice with the same glyph/token must reply "Invalid
/// token! You are cheating" the second time, once the slot is vacant again.
/// "Astronaut not found" is reserved for a glyph outside A-H entirely, i.e.
/// no such slot exists at all.
fn resolve_slot(world: &World, glyph: char, token: &str) -> Result<usize, &'static str> {
    let Some(slot_index) = glyph_to_index(glyph) else {
        return Err(reply::NOT_FOUND);
    };
    let slot = &world.slots[slot_index];
    if slot.token.as_deref() != Some(token) {
        return Err(reply::INVALID_TOKEN);
    }
    Ok(slot_index)
}

fn move_shooter(world: &mut World, glyph: char, direction: Direction, token: &str, now_ms: u64) -> Outcome {
    let slot_index = match resolve_slot(world, glyph, token) {
        Ok(index) => index,
        Err(reply) => return Outcome::silent(reply),
    };

    if world.slots[slot_index].is_stunned(now_ms) {
        return Outcome::silent(reply::STUNNED_MOVE);
    }

    let spec = *world.spec_for(slot_index);
    let axis_is_free = match direction {
        Direction::Up | Direction::Down => spec.row_lane.0 != spec.row_lane.1,
        Direction::Left | Direction::Right => spec.col_lane.0 != spec.col_lane.1,
    };

    let (row, col) = (world.slots[slot_index].row, world.slots[slot_index].col);
    let (new_row, new_col) = crate::slot::SlotSpec::step(row, col, direction);

    let legal = axis_is_free
        && spec.contains(new_row, new_col)
        && !world.shooter_at(new_row, new_col)
        && world.target_at(new_row, new_col).is_none();

    if !legal {
        return Outcome::silent(reply::MOVE_REFUSED);
    }

    let slot = &mut world.slots[slot_index];
    slot.row = new_row;
    slot.col = new_col;
    world.bump_generation();

    Outcome {
        reply: reply::MOVE_PROCESSED.to_string(),
        broadcast: true,
        play_score: 0,
        depleted: false,
        joined: None,
    }
}

fn zap(world: &mut World, glyph: char, token: &str, now_ms: u64) -> Outcome {
    let slot_index = match resolve_slot(world, glyph, token) {
        Ok(index) => index,
        Err(reply) => return Outcome::silent(reply),
    };

    if world.slots[slot_index].is_stunned(now_ms) {
        return Outcome::silent(reply::STUNNED_ZAP);
    }
    if world.slots[slot_index].is_on_cooldown(now_ms) {
        return Outcome::silent(reply::COOLDOWN);
    }

    world.slots[slot_index].cooldown_until_ms = now_ms + protocol::COOLDOWN_SECONDS * 1_000;
    world.bump_generation();

    let spec = *world.spec_for(slot_index);
    let origin = (world.slots[slot_index].row, world.slots[slot_index].col);
    let mut trail = Vec::new();
    let mut play_score = 0;
    let mut pos = origin;

    loop {
        pos = (pos.0 + spec.fire_delta.0, pos.1 + spec.fire_delta.1);
        if !cell_on_board(pos, world.board_size) {
            break;
        }
        trail.push(pos);

        if let Some(target_index) = world.target_at(pos.0, pos.1) {
            world.kill_target(target_index, now_ms);
            play_score = 1;
            break;
        }

        if let Some(hit_index) = (0..protocol::SLOTS).find(|&i| {
            i != slot_index && world.slots[i].occupied && world.slots[i].row == pos.0 && world.slots[i].col == pos.1
        }) {
            world.slots[hit_index].stunned_until_ms = now_ms + protocol::STUN_SECONDS * 1_000;
            // Beam continues through a stunned shooter rather than stopping on it.
        }
    }

    let glyph_for_trail = shot_glyph_for_axis(spec.fire_delta.0);
    world.paint_shot_trail(trail, glyph_for_trail);

    world.slots[slot_index].score += play_score;
    let total_score = world.slots[slot_index].score;

    Outcome {
        reply: reply::zap_result(play_score, total_score),
        broadcast: true,
        play_score,
        depleted: play_score > 0 && !world.has_targets(),
        joined: None,
    }
}

fn disconnect(world: &mut World, glyph: char, token: &str) -> Outcome {
    let slot_index = match resolve_slot(world, glyph, token) {
        Ok(index) => index,
        Err(reply) => return Outcome::silent(reply),
    };

    world.slots[slot_index].vacate();
    world.bump_generation();

    Outcome {
        reply: reply::DISCONNECTED.to_string(),
        broadcast: true,
        play_score: 0,
        depleted: false,
        joined: None,
    }
}

fn cell_on_board(pos: (i32, i32), board_size: u32) -> bool {
    let size = board_size as i32;
    (0..size).contains(&pos.0) && (0..size).contains(&pos.1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::WorldConfig;

    fn config() -> WorldConfig {
        WorldConfig {
            board_size: 20,
            max_targets: 50,
            initial_targets: 0,
            seed: 1,
        }
    }

    fn join(world: &mut World, now_ms: u64) -> Joined {
        let outcome = evaluate(world, Request::Connect, now_ms);
        outcome.joined.expect("connect should admit when slots are free")
    }

    #[test]
    fn admission_spawns_inside_the_slots_home_lane() {
        let mut world = World::new(config(), 0);
        for _ in 0..protocol::SLOTS {
            let joined = join(&mut world, 0);
            let spec = *world.spec_for(joined.slot_index);
            let slot = &world.slots[joined.slot_index];
            assert!(spec.contains(slot.row, slot.col));
        }
    }

    #[test]
    fn admission_is_capped_at_eight_slots() {
        let mut world = World::new(config(), 0);
        for _ in 0..protocol::SLOTS {
            let outcome = evaluate(&mut world, Request::Connect, 0);
            assert!(outcome.joined.is_some());
        }
        let generation_after_eighth = world.generation;
        let ninth = evaluate(&mut world, Request::Connect, 0);
        assert_eq!(ninth.reply, reply::GAME_FULL);
        assert!(ninth.joined.is_none());
        assert_eq!(world.generation, generation_after_eighth, "a refused join must not bump the generation");
    }

    #[test]
    fn a_refused_move_leaves_the_generation_unchanged() {
        let mut world = World::new(config(), 0);
        let joined = join(&mut world, 0);
        let before = world.generation;
        let outcome = evaluate(
            &mut world,
            Request::Move { glyph: joined.glyph, direction: Direction::Right, token: joined.token.clone() },
            0,
        );
        assert_eq!(outcome.reply, reply::MOVE_REFUSED);
        assert_eq!(world.generation, before);
    }

    #[test]
    fn zap_kills_only_the_first_target_in_the_beam() {
        let mut world = World::new(config(), 0);
        let joined = join(&mut world, 0);
        let (row, col) = (world.slots[joined.slot_index].row, world.slots[joined.slot_index].col);
        let spec = *world.spec_for(joined.slot_index);
        let near = (row + spec.fire_delta.0, col + spec.fire_delta.1);
        let far = (near.0 + spec.fire_delta.0, near.1 + spec.fire_delta.1);
        world.targets.push(crate::target::Target { row: near.0, col: near.1 });
        world.targets.push(crate::target::Target { row: far.0, col: far.1 });

        let outcome = evaluate(
            &mut world,
            Request::Zap { glyph: joined.glyph, token: joined.token.clone() },
            1_000,
        );

        assert_eq!(outcome.play_score, 1);
        assert_eq!(world.targets.len(), 1);
        assert_eq!(world.targets[0].row, far.0);
        assert_eq!(world.targets[0].col, far.1);
    }

    #[test]
    fn zap_stuns_a_shooter_in_the_beam_and_keeps_tracing() {
        let mut world = World::new(config(), 0);
        let shooter_a = join(&mut world, 0);
        let shooter_b = join(&mut world, 0);

        let spec_a = *world.spec_for(shooter_a.slot_index);
        let (row, col) = (world.slots[shooter_a.slot_index].row, world.slots[shooter_a.slot_index].col);
        let path = (row + spec_a.fire_delta.0, col + spec_a.fire_delta.1);
        world.slots[shooter_b.slot_index].row = path.0;
        world.slots[shooter_b.slot_index].col = path.1;

        let beyond = (path.0 + spec_a.fire_delta.0, path.1 + spec_a.fire_delta.1);
        world.targets.push(crate::target::Target { row: beyond.0, col: beyond.1 });

        let outcome = evaluate(
            &mut world,
            Request::Zap { glyph: shooter_a.glyph, token: shooter_a.token.clone() },
            2_000,
        );

        assert_eq!(outcome.play_score, 1, "beam should continue through the stunned shooter and still hit the target");
        assert!(world.slots[shooter_b.slot_index].is_stunned(2_500));
    }

    #[test]
    fn move_is_refused_off_the_home_lane_axis() {
        let mut world = World::new(config(), 0);
        let joined = join(&mut world, 0);
        // Slot 0 is column-pinned; Left/Right must be refused even onto an
        // otherwise empty cell.
        let outcome = evaluate(
            &mut world,
            Request::Move { glyph: joined.glyph, direction: Direction::Right, token: joined.token.clone() },
            0,
        );
        assert_eq!(outcome.reply, reply::MOVE_REFUSED);
    }

    #[test]
    fn move_onto_a_target_is_refused() {
        let mut world = World::new(config(), 0);
        let joined = join(&mut world, 0);
        let (row, col) = (world.slots[joined.slot_index].row, world.slots[joined.slot_index].col);
        world.targets.push(crate::target::Target { row: row + 1, col });

        let outcome = evaluate(
            &mut world,
            Request::Move { glyph: joined.glyph, direction: Direction::Down, token: joined.token.clone() },
            0,
        );
        assert_eq!(outcome.reply, reply::MOVE_REFUSED);
    }

    #[test]
    fn cooldown_blocks_a_second_zap_before_three_seconds_pass() {
        let mut world = World::new(config(), 0);
        let joined = join(&mut world, 0);
        let first = evaluate(&mut world, Request::Zap { glyph: joined.glyph, token: joined.token.clone() }, 0);
        assert_ne!(first.reply, reply::COOLDOWN);
        let second = evaluate(&mut world, Request::Zap { glyph: joined.glyph, token: joined.token.clone() }, 2_999);
        assert_eq!(second.reply, reply::COOLDOWN);
        let third = evaluate(&mut world, Request::Zap { glyph: joined.glyph, token: joined.token.clone() }, 3_000);
        assert_ne!(third.reply, reply::COOLDOWN);
    }

    #[test]
    fn invalid_token_is_rejected() {
        let mut world = World::new(config(), 0);
        let joined = join(&mut world, 0);
        let outcome = evaluate(
            &mut world,
            Request::Zap { glyph: joined.glyph, token: "WRONGTOKEN".to_string() },
            0,
        );
        assert_eq!(outcome.reply, reply::INVALID_TOKEN);
    }

    #[test]
    fn a_second_disconnect_on_a_vacant_slot_reports_invalid_token_not_not_found() {
        let mut world = World::new(config(), 0);
        let joined = join(&mut world, 0);
        let first = evaluate(
            &mut world,
            Request::Disconnect { glyph: joined.glyph, token: joined.token.clone() },
            0,
        );
        assert_eq!(first.reply, reply::DISCONNECTED);

        let second = evaluate(
            &mut world,
            Request::Disconnect { glyph: joined.glyph, token: joined.token.clone() },
            0,
        );
        assert_eq!(second.reply, reply::INVALID_TOKEN);
    }

    #[test]
    fn disconnect_frees_the_slot_for_reuse() {
        let mut world = World::new(config(), 0);
        let joined = join(&mut world, 0);
        let outcome = evaluate(
            &mut world,
            Request::Disconnect { glyph: joined.glyph, token: joined.token.clone() },
            0,
        );
        assert_eq!(outcome.reply, reply::DISCONNECTED);
        assert!(!world.slots[joined.slot_index].occupied);
    }

    #[test]
    fn depletion_is_reported_once_the_last_target_is_killed() {
        let mut world = World::new(config(), 0);
        let joined = join(&mut world, 0);
        let spec = *world.spec_for(joined.slot_index);
        let (row, col) = (world.slots[joined.slot_index].row, world.slots[joined.slot_index].col);
        let near = (row + spec.fire_delta.0, col + spec.fire_delta.1);
        world.targets.push(crate::target::Target { row: near.0, col: near.1 });

        let outcome = evaluate(&mut world, Request::Zap { glyph: joined.glyph, token: joined.token.clone() }, 0);
        assert!(outcome.depleted);
        assert!(!world.has_targets());
    }
}
