//! The pure simulation core: the board/slot/target data model and the rule
//! evaluator that is the only code allowed to mutate it. Nothing
//! in this crate touches a socket, a clock beyond an injected `now_ms`, or a
//! console — every function here is a deterministic transformation given its
//! inputs, which is what makes every invariant and boundary scenario checkable.

pub mod rules;
pub mod slot;
pub mod target;
pub mod tokens;
pub mod world;

pub use protocol::Direction;
pub use rules::{evaluate, Outcome};
pub use slot::{ShooterSlot, SLOT_TABLE};
pub use target::Target;
pub use world::{World, WorldConfig};
