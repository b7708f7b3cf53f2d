//! Bridge error types

use thiserror::Error;

/// Terminal bridge error.
///
/// Anything surfaced through this type stops the bridge loop. Malformed
/// requests are not errors at this level: they are answered on the wire
/// (see [`ParseError`]).
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Reading the request stream or writing/flushing the response stream failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A response could not be serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// The diagnostic log sink could not be set up
    #[error("logging error: {0}")]
    Logging(String),
}

/// Bridge result type
pub type BridgeResult<T> = Result<T, BridgeError>;

/// A request line that could not be turned into a [`crate::Request`].
///
/// The `Display` text of this error becomes the `error` field of the
/// failure response sent back to the host.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The line is not valid JSON
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The line is valid JSON but not an object
    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),

    /// The line is not valid UTF-8
    #[error("request is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}
