//! The score-archive push: a self-describing, length-delimited `postcard`
//! record, fed to an optional long-running scoreboard sink. Grounded on
//! `game-server.c`'s `proto_buffer_send`, which serializes a `{id, score}`
//! pair per slot with protobuf; here the same shape is serialized with
//! `postcard` since that's the encoding used for every other wire payload
//! in this crate.

use crate::frame::encode_frame;
use serde::{Deserialize, Serialize};

/// One slot's contribution to an archive push. `label` is empty for a vacant
/// slot; consumers skip empty labels rather than the sender
/// omitting the entry, so the record always carries one entry per slot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub label: String,
    pub score: u32,
}

/// The full record pushed in one archive frame.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArchiveRecord {
    pub entries: Vec<ArchiveEntry>,
}

/// Serializes and frames an archive record with `postcard`.
pub fn encode_archive(record: &ArchiveRecord) -> Result<bytes::BytesMut, postcard::Error> {
    let body = postcard::to_allocvec(record)?;
    Ok(encode_frame(&body))
}

/// Decodes an archive record from a frame body (length prefix already
/// stripped).
pub fn decode_archive(body: &[u8]) -> Result<ArchiveRecord, postcard::Error> {
    postcard::from_bytes(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_record() {
        let record = ArchiveRecord {
            entries: vec![
                ArchiveEntry { label: "A".into(), score: 4 },
                ArchiveEntry { label: String::new(), score: 0 },
            ],
        };
        let framed = encode_archive(&record).unwrap();
        let len = u32::from_be_bytes(framed[..4].try_into().unwrap()) as usize;
        let decoded = decode_archive(&framed[4..4 + len]).unwrap();
        assert_eq!(decoded, record);
    }
}
