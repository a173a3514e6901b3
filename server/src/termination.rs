//! The shutdown sequence shared by all three termination triggers: the
//! operator's `Q` key, permanent target depletion (growth can never recover
//! from zero, since `ceil(0 * GROWTH_FACTOR) == 0`), and an upstream
//! interrupt signal. Whichever trigger fires first, the server logs the
//! final scoreboard, pushes one last archive record, publishes the
//! `Server_terminate` topic so subscribers stop waiting on more updates, and
//! wakes the main task to exit. Mirrors the original's `signal_handler`
//! publishing `MSG_SERVER` before the process tears down.

use std::sync::Arc;

use protocol::TOPIC_TERMINATE;

use crate::state::ServerState;

/// Runs the shutdown sequence exactly once no matter how many callers race
/// to invoke it (`ServerState::begin_termination` arbitrates).
pub async fn announce(state: &Arc<ServerState>) {
    if !state.begin_termination() {
        return;
    }

    let world = state.world.lock().await;
    for (i, slot) in world.slots.iter().enumerate() {
        if slot.occupied {
            tracing::info!(slot = world::slot::index_to_glyph(i).to_string(), score = slot.score, "final score");
        }
    }
    drop(world);

    state.maybe_push_archive(1).await;
    let _ = state.updates.send(protocol::snapshot::topic_frame(TOPIC_TERMINATE).freeze());

    tracing::info!("shutdown sequence complete");
    state.terminate.notify_one();
}

#[cfg(test)]
mod tests {
    use super::*;
    use world::{World, WorldConfig};

    #[tokio::test]
    async fn announce_publishes_the_terminate_topic_exactly_once() {
        let world = World::new(WorldConfig { board_size: 20, max_targets: 50, initial_targets: 0, seed: 1 }, 0);
        let state = Arc::new(ServerState::new(world, None));
        let mut subscriber = state.updates.subscribe();

        announce(&state).await;
        announce(&state).await;

        let frame = subscriber.recv().await.expect("the terminate topic should have been published");
        assert_eq!(&frame[protocol::frame::FRAME_LEN_PREFIX_SIZE..], TOPIC_TERMINATE.as_bytes());
        assert!(subscriber.try_recv().is_err(), "a second announce() call must not publish again");
    }
}
