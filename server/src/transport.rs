//! The request/reply endpoint: one TCP listener, one task per connected
//! client. Each connection reads length-prefixed request frames and writes
//! back a length-prefixed reply frame — a persistent
//! equivalent of the original's one-shot REQ/REP exchanges, since a bare TCP
//! stream has to stay open for the length prefix framing to mean anything.
//!
//! Mirrors a per-connection task spawned from a websocket
//! handler, minus the handshake negotiation this protocol doesn't need.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use bytes::BytesMut;
use protocol::frame::{decode_len_prefix, encode_frame, FRAME_LEN_PREFIX_SIZE, MAX_FRAME_LEN};
use protocol::Request;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use crate::error::ServerError;
use crate::state::ServerState;
use crate::{snapshot, termination};

/// Binds the request/reply listener and serves connections until the
/// process shuts down.
pub async fn serve(state: Arc<ServerState>, bind: &str) -> Result<(), ServerError> {
    let listener = TcpListener::bind(bind)
        .await
        .map_err(|source| ServerError::BindRequestReply { address: bind.to_string(), source })?;
    tracing::info!(address = bind, "request/reply endpoint listening");

    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(pair) => pair,
            Err(error) => {
                tracing::warn!(%error, "failed to accept request/reply connection");
                continue;
            }
        };
        tracing::debug!(%peer, "client connected");
        let state = state.clone();
        tokio::spawn(async move {
            handle_connection(state, stream).await;
            tracing::debug!(%peer, "client disconnected");
        });
    }
}

async fn handle_connection(state: Arc<ServerState>, mut stream: TcpStream) {
    let mut joined: Option<world::rules::Joined> = None;

    loop {
        let body = match read_frame(&mut stream).await {
            Ok(Some(body)) => body,
            Ok(None) => break,
            Err(error) => {
                tracing::debug!(%error, "connection read error");
                break;
            }
        };

        let text = String::from_utf8_lossy(&body);
        let request = Request::parse(&text);
        // Broadcast frames are staged from a lock-held read but published
        // only after the reply is on the wire (the reply for this
        // command must reach the requester before the broadcast reflecting
        // it goes out).
        let (outcome, frames) = {
            let mut world = state.world.lock().await;
            let now_ms = now_ms();
            let outcome = world::evaluate(&mut world, request, now_ms);
            let frames = outcome.broadcast.then(|| snapshot::update_frames(&mut world));
            (outcome, frames)
        };

        if let Some(info) = &outcome.joined {
            joined = Some(info.clone());
        }

        if write_frame(&mut stream, outcome.reply.as_bytes()).await.is_err() {
            break;
        }

        if let Some(frames) = frames {
            state.publish(frames);
        }

        state.maybe_push_archive(outcome.play_score).await;

        if outcome.depleted {
            termination::announce(&state).await;
        }
    }

    if let Some(info) = joined {
        let mut world = state.world.lock().await;
        let outcome = world::evaluate(
            &mut world,
            Request::Disconnect { glyph: info.glyph, token: info.token },
            now_ms(),
        );
        if outcome.broadcast {
            let frames = snapshot::update_frames(&mut world);
            drop(world);
            state.publish(frames);
        }
    }
}

async fn read_frame(stream: &mut TcpStream) -> std::io::Result<Option<BytesMut>> {
    let mut prefix = [0u8; FRAME_LEN_PREFIX_SIZE];
    if let Err(error) = stream.read_exact(&mut prefix).await {
        return match error.kind() {
            std::io::ErrorKind::UnexpectedEof => Ok(None),
            _ => Err(error),
        };
    }
    let len = decode_len_prefix(prefix);
    if len > MAX_FRAME_LEN {
        return Err(std::io::Error::new(std::io::ErrorKind::InvalidData, "frame exceeds MAX_FRAME_LEN"));
    }
    let mut body = BytesMut::zeroed(len as usize);
    stream.read_exact(&mut body).await?;
    Ok(Some(body))
}

async fn write_frame(stream: &mut TcpStream, body: &[u8]) -> std::io::Result<()> {
    let framed = encode_frame(body);
    stream.write_all(&framed).await
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before the unix epoch")
        .as_millis() as u64
}
