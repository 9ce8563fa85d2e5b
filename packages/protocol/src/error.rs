//! Error types for the message channel

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),

    /// The other side was torn down; the message is lost
    #[error("Channel closed")]
    Closed,
}
