//! The optional score-archive push: a long-lived outbound TCP connection
//! that forwards every [`protocol::ArchiveRecord`] queued by the game logic
//! to an external scoreboard sink. Grounded on `game-server.c`'s
//! `proto_buffer_send`, which pushed the same kind of record over its own
//! socket whenever a shot actually changed a score.

use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::sync::mpsc;

use protocol::archive::encode_archive;
use protocol::ArchiveRecord;

/// Drains `receiver` and writes each record to `address`, reconnecting with
/// a short backoff if the sink is unreachable or the connection drops.
/// Records queued while disconnected are held in the channel, not dropped.
pub async fn run(address: String, mut receiver: mpsc::UnboundedReceiver<ArchiveRecord>) {
    loop {
        let stream = match TcpStream::connect(&address).await {
            Ok(stream) => stream,
            Err(error) => {
                tracing::warn!(%error, address, "archive sink unreachable, retrying");
                tokio::time::sleep(Duration::from_secs(2)).await;
                continue;
            }
        };
        tracing::info!(address, "connected to archive sink");
        if !forward(stream, &mut receiver).await {
            return;
        }
        tracing::warn!(address, "archive sink connection lost, reconnecting");
    }
}

/// Forwards records to `stream` until the channel closes (`false`) or the
/// connection fails (`true`, meaning the caller should reconnect).
async fn forward(mut stream: TcpStream, receiver: &mut mpsc::UnboundedReceiver<ArchiveRecord>) -> bool {
    while let Some(record) = receiver.recv().await {
        let framed = match encode_archive(&record) {
            Ok(framed) => framed,
            Err(error) => {
                tracing::error!(%error, "failed to encode archive record");
                continue;
            }
        };
        if stream.write_all(&framed).await.is_err() {
            return true;
        }
    }
    false
}
