//! Converts a locked [`world::World`] into the three wire frames the publish
//! endpoint broadcasts for the `Outer_space_update` topic: topic,
//! roster, world blob, sent in that fixed order. Kept out of `world` and
//! `protocol` so the simulation core never has to format a frame and the
//! codec never has to know what a `World` is.

use bytes::Bytes;
use protocol::{ShooterRecord, SnapshotView, TargetRecord, TOPIC_UPDATE};
use world::World;

/// Builds the three broadcast frames for the current world state, in the
/// order subscribers expect them.
pub fn update_frames(world: &mut World) -> [Bytes; 3] {
    let roster: [bool; protocol::SLOTS] = std::array::from_fn(|i| world.slots[i].occupied);

    let shooters: [ShooterRecord; protocol::SLOTS] = std::array::from_fn(|i| {
        let slot = &world.slots[i];
        ShooterRecord {
            glyph: world::slot::index_to_glyph(i) as u8,
            row: slot.row,
            col: slot.col,
            score: slot.score,
            stunned_until_ms: slot.stunned_until_ms,
            cooldown_until_ms: slot.cooldown_until_ms,
        }
    });

    let targets = world.targets.iter().map(|t| TargetRecord { row: t.row, col: t.col }).collect();
    let max_targets = world.max_targets;
    let board_size = world.board_size;
    let board = world.render_board();

    let view = SnapshotView {
        roster,
        shooters,
        targets,
        max_targets,
        board,
        board_size,
    };

    [
        protocol::snapshot::topic_frame(TOPIC_UPDATE).freeze(),
        protocol::snapshot::roster_frame(roster).freeze(),
        protocol::snapshot::world_blob_frame(&view).freeze(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use protocol::frame::FRAME_LEN_PREFIX_SIZE;
    use world::WorldConfig;

    #[test]
    fn frames_come_out_in_topic_roster_blob_order() {
        let mut world = World::new(
            WorldConfig { board_size: 20, max_targets: 50, initial_targets: 5, seed: 1 },
            0,
        );
        let frames = update_frames(&mut world);

        assert_eq!(&frames[0][FRAME_LEN_PREFIX_SIZE..], TOPIC_UPDATE.as_bytes());
        assert_eq!(frames[1].len() - FRAME_LEN_PREFIX_SIZE, protocol::SLOTS);
    }

    #[test]
    fn roster_frame_reflects_occupancy_after_a_join() {
        let mut world = World::new(
            WorldConfig { board_size: 20, max_targets: 50, initial_targets: 0, seed: 1 },
            0,
        );
        let joined = world::evaluate(&mut world, protocol::Request::Connect, 0)
            .joined
            .expect("first connect should be admitted");

        let frames = update_frames(&mut world);
        let roster = protocol::snapshot::decode_roster(&frames[1][FRAME_LEN_PREFIX_SIZE..]);
        assert!(roster[joined.slot_index]);
        assert!(roster.iter().filter(|o| **o).count() == 1);
    }
}
