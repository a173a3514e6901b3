mod archive_sink;
mod config;
mod error;
mod publish;
mod scheduler;
mod shutdown_watcher;
mod snapshot;
mod state;
mod termination;
mod transport;

use std::process::ExitCode;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Args;
use crate::state::ServerState;
use crate::termination;

#[tokio::main]
/// Activates structured tracing, builds the world from the CLI configuration,
/// spawns the drift/growth tickers, both TCP endpoints, and the operator
/// quit-key watcher, then waits for target depletion, the operator's `Q`, or
/// an upstream interrupt before shutting down — the three termination triggers.
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=trace", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_file(true)
                .with_line_number(true)
                .with_target(true)
                .with_thread_ids(true)
                .with_thread_names(true),
        )
        .init();

    let args = Args::parse();

    let archive_tx = args.archive_push.as_ref().map(|address| {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        tokio::spawn(archive_sink::run(address.clone(), rx));
        tx
    });

    let world = world::World::new(args.world_config(), now_ms());
    let state = Arc::new(ServerState::new(world, archive_tx));

    scheduler::spawn(state.clone());
    tokio::spawn(shutdown_watcher::watch(state.clone()));

    let request_reply = tokio::spawn({
        let state = state.clone();
        let bind = args.bind_req.clone();
        async move { transport::serve(state, &bind).await }
    });
    let publish = tokio::spawn({
        let state = state.clone();
        let bind = args.bind_pub.clone();
        async move { publish::serve(state, &bind).await }
    });

    tokio::select! {
        result = request_reply => {
            if let Ok(Err(error)) = result {
                tracing::error!(%error, "request/reply endpoint failed");
                return ExitCode::FAILURE;
            }
        }
        result = publish => {
            if let Ok(Err(error)) = result {
                tracing::error!(%error, "publish endpoint failed");
                return ExitCode::FAILURE;
            }
        }
        _ = state.terminate.notified() => {
            tracing::info!("shutdown sequence complete");
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("received interrupt, shutting down");
            termination::announce(&state).await;
        }
    }

    ExitCode::SUCCESS
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before the unix epoch")
        .as_millis() as u64
}
