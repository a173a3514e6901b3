//! Wire-level constants and codecs shared between the simulation server and its
//! clients: the request vocabulary, the reply vocabulary, the snapshot byte
//! layout, and the score-archive record format. No I/O lives here — this crate
//! only turns bytes into structured data and back.

pub mod archive;
pub mod constants;
pub mod frame;
pub mod reply;
pub mod request;
pub mod snapshot;

pub use archive::{ArchiveEntry, ArchiveRecord};
pub use constants::*;
pub use frame::FRAME_LEN_PREFIX_SIZE;
pub use request::{Direction, Request};
pub use snapshot::{ShooterRecord, SnapshotView, TargetRecord};
