//! Fatal, process-ending errors. A client sending garbage or a game-rule
//! refusal is never an `Err` here — those are ordinary [`world::Outcome`]
//! values the transport layer answers on the wire. This type exists only for
//! the handful of ways startup itself can fail.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind request/reply endpoint at {address}: {source}")]
    BindRequestReply {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to bind publish endpoint at {address}: {source}")]
    BindPublish {
        address: String,
        #[source]
        source: std::io::Error,
    },
}
