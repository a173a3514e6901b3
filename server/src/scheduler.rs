//! Background ticking: target drift and the growth wave, both driven off a
//! wall-clock interval rather than a client request. Grounded on a spawned
//! `tokio::time::interval` watchdog loop ticking against shared state, and on
//! `game-server.c`'s `update_aliens`/`increase_alien_count`, which ran the
//! same way off the server's own loop rather than in response to a message.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::state::ServerState;
use crate::{snapshot, termination};

/// Spawns the drift and growth tickers. Returns immediately; the tickers
/// run until the process exits.
pub fn spawn(state: Arc<ServerState>) {
    tokio::spawn(drift_loop(state.clone()));
    tokio::spawn(growth_loop(state));
}

async fn drift_loop(state: Arc<ServerState>) {
    let mut interval = tokio::time::interval(Duration::from_secs(protocol::DRIFT_INTERVAL_SECONDS));
    loop {
        interval.tick().await;
        let mut world = state.world.lock().await;
        world.drift();
        let frames = snapshot::update_frames(&mut world);
        drop(world);
        state.publish(frames);
    }
}

async fn growth_loop(state: Arc<ServerState>) {
    let mut interval = tokio::time::interval(Duration::from_secs(protocol::GROWTH_POLL_INTERVAL_SECONDS));
    loop {
        interval.tick().await;
        let mut world = state.world.lock().await;
        let added = world.maybe_grow(now_ms());
        let depleted = !world.has_targets();
        if added > 0 {
            let frames = snapshot::update_frames(&mut world);
            drop(world);
            state.publish(frames);
        } else {
            drop(world);
        }
        if depleted {
            tracing::info!("target population permanently depleted");
            termination::announce(&state).await;
        }
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before the unix epoch")
        .as_millis() as u64
}
