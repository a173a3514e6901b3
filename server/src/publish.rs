//! The publish endpoint: one TCP listener where every connected subscriber
//! receives the same stream of already-framed broadcast frames (the
//! second endpoint). Each subscriber gets its own `broadcast::Receiver`, so a
//! slow reader can lag or be dropped without affecting anyone else — the
//! direct analogue of the original's PUB socket, which never blocked a
//! publisher on a slow subscriber either.

use std::sync::Arc;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio::sync::broadcast::error::RecvError;

use crate::error::ServerError;
use crate::state::ServerState;

pub async fn serve(state: Arc<ServerState>, bind: &str) -> Result<(), ServerError> {
    let listener = TcpListener::bind(bind)
        .await
        .map_err(|source| ServerError::BindPublish { address: bind.to_string(), source })?;
    tracing::info!(address = bind, "publish endpoint listening");

    loop {
        let (mut stream, peer) = match listener.accept().await {
            Ok(pair) => pair,
            Err(error) => {
                tracing::warn!(%error, "failed to accept subscriber connection");
                continue;
            }
        };
        let mut updates = state.updates.subscribe();
        tracing::debug!(%peer, "subscriber connected");
        tokio::spawn(async move {
            loop {
                match updates.recv().await {
                    Ok(frame) => {
                        if stream.write_all(&frame).await.is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(%peer, skipped, "subscriber lagged, dropping buffered frames");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            tracing::debug!(%peer, "subscriber disconnected");
        });
    }
}
