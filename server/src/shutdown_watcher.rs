//! The operator quit key: the fourth lifecycle task, watching
//! standard input for a `Q`/`q` line and triggering the same shutdown
//! sequence target depletion does.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::state::ServerState;
use crate::termination;

/// Reads lines from stdin until one is `Q`/`q` (trimmed, case-insensitive)
/// or the stream closes. Exits silently on EOF — headless deployments with
/// no attached console simply never trigger this path, leaving depletion or
/// an upstream signal as the only way to stop the server.
pub async fn watch(state: Arc<ServerState>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if line.trim().eq_ignore_ascii_case("q") {
                    tracing::info!("operator quit key pressed");
                    termination::announce(&state).await;
                    return;
                }
            }
            Ok(None) => return,
            Err(error) => {
                tracing::warn!(%error, "stdin read error, operator quit key watcher exiting");
                return;
            }
        }
    }
}
