//! Error types for the reader bridge.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("reader I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("relay request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("relay answered {status} with unexpected body {body:?}")]
    UnexpectedReply { status: u16, body: String },

    #[error("malformed scan line {0:?}: expected `<id>,<rfid>`")]
    MalformedLine(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}
