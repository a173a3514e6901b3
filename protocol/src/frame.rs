//! Length-prefixed framing. Both TCP endpoints (request/reply and
//! publish/subscribe) carry a stream of frames, each a 4-byte big-endian
//! length prefix followed by that many body bytes. This is the explicit,
//! portable stand-in for the
//! raw structural-packing send over a
//! message-oriented transport: TCP has no message boundaries of its own, so
//! the boundary has to be encoded rather than assumed.

use bytes::{BufMut, BytesMut};

/// Size in bytes of the length prefix itself.
pub const FRAME_LEN_PREFIX_SIZE: usize = 4;

/// Maximum accepted frame body size. Generous relative to the largest
/// real frame (a world snapshot, well under 10 KB) while still
/// rejecting a corrupt or hostile length prefix outright.
pub const MAX_FRAME_LEN: u32 = 1 << 20;

/// Prepends the 4-byte big-endian length prefix to `body`, returning a single
/// buffer ready to write to a socket.
pub fn encode_frame(body: &[u8]) -> BytesMut {
    let mut framed = BytesMut::with_capacity(FRAME_LEN_PREFIX_SIZE + body.len());
    framed.put_u32(body.len() as u32);
    framed.put_slice(body);
    framed
}

/// Decodes a 4-byte big-endian length prefix, returning the body length to
/// expect next. Callers are expected to have already read exactly
/// [`FRAME_LEN_PREFIX_SIZE`] bytes into `prefix`.
pub fn decode_len_prefix(prefix: [u8; FRAME_LEN_PREFIX_SIZE]) -> u32 {
    u32::from_be_bytes(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_frame() {
        let framed = encode_frame(b"hello");
        let prefix: [u8; FRAME_LEN_PREFIX_SIZE] = framed[..FRAME_LEN_PREFIX_SIZE].try_into().unwrap();
        let len = decode_len_prefix(prefix);
        assert_eq!(len as usize, 5);
        assert_eq!(&framed[FRAME_LEN_PREFIX_SIZE..], b"hello");
    }
}
