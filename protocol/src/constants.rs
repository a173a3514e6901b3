//! Board geometry and population limits shared by the codec, the rule
//! evaluator and the CLI defaults. A run may override the `*_DEFAULT` values via `--board-size`,
//! `--max-targets` and `--initial-targets`, but `SLOTS` is fixed at 8 (one per
//! glyph A-H) regardless of configuration.

/// Number of shooter slots. Fixed: one per glyph A..H.
pub const SLOTS: usize = 8;

/// Default board edge length (the board is always square).
pub const BOARD_SIZE_DEFAULT: u32 = 20;

/// Default cap on the number of live targets.
pub const MAX_TARGETS_DEFAULT: u32 = 256;

/// Default number of targets present at world initialization.
pub const INITIAL_TARGETS_DEFAULT: u32 = 85;

/// Token length in bytes (6 uppercase letters).
pub const TOKEN_LEN: usize = 6;

/// Alphabet tokens are drawn from, uniformly.
pub const TOKEN_ALPHABET: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Stun duration in seconds, applied to a shooter hit by a beam.
pub const STUN_SECONDS: u64 = 10;

/// Minimum interval in seconds between two shots from the same slot.
pub const COOLDOWN_SECONDS: u64 = 3;

/// Growth wave interval: fires when this many seconds have elapsed since the
/// last kill with no growth yet applied.
pub const GROWTH_INTERVAL_SECONDS: u64 = 10;

/// Growth wave multiplier applied to the current target count (rounded up).
pub const GROWTH_FACTOR: f64 = 1.1;

/// Drift tick interval in seconds.
pub const DRIFT_INTERVAL_SECONDS: u64 = 1;

/// How often the growth ticker re-checks whether a growth wave is due.
/// Sleeping until the exact due time is also legal; polling at this
/// granularity is simpler and cheap enough at game-tick rates.
pub const GROWTH_POLL_INTERVAL_SECONDS: u64 = 1;

/// Publish topic carrying the roster + world snapshot.
pub const TOPIC_UPDATE: &str = "Outer_space_update";

/// Publish topic announcing operator/upstream termination.
pub const TOPIC_TERMINATE: &str = "Server_terminate";

/// Board glyph for an empty cell.
pub const GLYPH_EMPTY: u8 = b' ';
/// Board glyph for a target.
pub const GLYPH_TARGET: u8 = b'*';
/// Board glyph for a horizontal transient shot overlay.
pub const GLYPH_SHOT_HORIZONTAL: u8 = b'-';
/// Board glyph for a vertical transient shot overlay.
pub const GLYPH_SHOT_VERTICAL: u8 = b'|';

/// Default TCP bind address for the request/reply endpoint.
pub const DEFAULT_BIND_REQ: &str = "127.0.0.1:5533";
/// Default TCP bind address for the publish endpoint.
pub const DEFAULT_BIND_PUB: &str = "127.0.0.1:5554";
/// Default TCP address the optional score-archive sink listens on.
pub const DEFAULT_ARCHIVE_PUSH: &str = "127.0.0.1:5559";
