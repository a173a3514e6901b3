//! Shared server state: the single [`World`] behind a coarse lock, and the
//! broadcast channel every publish-endpoint subscriber drains from. One
//! mutex guarding the whole world mirrors a `Room`/`AppState`
//! pattern of a `Mutex`-guarded shared value plus a `broadcast::Sender` fan-out
//! — the simulation here just replaces "chat room" with "game world".

use std::sync::atomic::{AtomicBool, Ordering};

use bytes::Bytes;
use tokio::sync::{broadcast, mpsc, Mutex, Notify};
use world::World;

/// Broadcast channel capacity: generous relative to how rarely a slow
/// subscriber should actually lag behind — one update per request plus one
/// per tick, at most a few per second.
const BROADCAST_CAPACITY: usize = 256;

pub struct ServerState {
    pub world: Mutex<World>,
    pub updates: broadcast::Sender<Bytes>,
    pub archive_push: Option<mpsc::UnboundedSender<protocol::ArchiveRecord>>,
    /// Signaled once the target population is permanently depleted, telling
    /// the main task to run the termination sequence.
    pub terminate: Notify,
    terminating: AtomicBool,
}

impl ServerState {
    pub fn new(world: World, archive_push: Option<mpsc::UnboundedSender<protocol::ArchiveRecord>>) -> ServerState {
        let (updates, _receiver) = broadcast::channel(BROADCAST_CAPACITY);
        ServerState {
            world: Mutex::new(world),
            updates,
            archive_push,
            terminate: Notify::new(),
            terminating: AtomicBool::new(false),
        }
    }

    /// Marks the server as shutting down, returning `true` only for the
    /// first caller — every other concurrent connection that also observes
    /// depletion is a no-op.
    pub fn begin_termination(&self) -> bool {
        self.terminating.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst).is_ok()
    }

    /// Publishes `frames` to every current subscriber, in order. The three
    /// frames are concatenated into a single channel item before sending, so
    /// two tasks publishing concurrently (the command task and a ticker, on
    /// different runtime worker threads) can never interleave their
    /// `[topic][roster][world blob]` triples on the shared channel — a
    /// subscriber either gets a whole triple or none of it. Silently drops
    /// the item when nobody is listening — the same as the original publish
    /// socket, which never blocked on the absence of a subscriber.
    pub fn publish(&self, frames: [Bytes; 3]) {
        let total_len = frames.iter().map(Bytes::len).sum();
        let mut merged = bytes::BytesMut::with_capacity(total_len);
        for frame in &frames {
            merged.extend_from_slice(frame);
        }
        let _ = self.updates.send(merged.freeze());
    }

    /// Builds the current archive record (one entry per slot, empty label
    /// for a vacant slot) and pushes it if an archive sink is
    /// configured and at least one shot actually changed a score.
    pub async fn maybe_push_archive(&self, play_score: u32) {
        if play_score == 0 {
            return;
        }
        let Some(tx) = &self.archive_push else { return };

        let world = self.world.lock().await;
        let entries = world
            .slots
            .iter()
            .enumerate()
            .map(|(i, slot)| protocol::ArchiveEntry {
                label: if slot.occupied { world::slot::index_to_glyph(i).to_string() } else { String::new() },
                score: slot.score,
            })
            .collect();
        drop(world);

        let _ = tx.send(protocol::ArchiveRecord { entries });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use world::WorldConfig;

    fn state() -> ServerState {
        let world = World::new(WorldConfig { board_size: 20, max_targets: 50, initial_targets: 0, seed: 1 }, 0);
        ServerState::new(world, None)
    }

    #[test]
    fn begin_termination_only_fires_for_the_first_caller() {
        let state = state();
        assert!(state.begin_termination());
        assert!(!state.begin_termination());
        assert!(!state.begin_termination());
    }

    #[test]
    fn publish_sends_the_three_frames_as_a_single_item() {
        let state = state();
        let mut subscriber = state.updates.subscribe();
        let frames = [Bytes::from_static(b"AAA"), Bytes::from_static(b"BB"), Bytes::from_static(b"C")];

        state.publish(frames);

        let merged = subscriber.try_recv().expect("publish should send exactly one item");
        assert_eq!(&merged[..], b"AAABBC");
        assert!(subscriber.try_recv().is_err(), "the three frames must not arrive as separate items");
    }

    #[tokio::test]
    async fn maybe_push_archive_is_a_no_op_without_a_sink() {
        let state = state();
        // No archive sink configured; this must not panic or block even with
        // a nonzero score delta.
        state.maybe_push_archive(1).await;
    }

    #[tokio::test]
    async fn maybe_push_archive_sends_one_entry_per_slot_when_scored() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let world = World::new(WorldConfig { board_size: 20, max_targets: 50, initial_targets: 0, seed: 1 }, 0);
        let state = ServerState::new(world, Some(tx));

        state.maybe_push_archive(1).await;
        let record = rx.try_recv().expect("a record should have been pushed");
        assert_eq!(record.entries.len(), protocol::SLOTS);
        assert!(record.entries.iter().all(|e| e.label.is_empty()));
    }
}
