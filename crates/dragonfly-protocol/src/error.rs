//! Error types for the Dragonfly protocol.

use thiserror::Error;

/// Errors that can occur when encoding commands or decoding replies.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// A version reply carried no usable decimal number.
    #[error("no numeric version info found in response: {response:?}")]
    NoVersionInfo {
        /// The trimmed reply text.
        response: String,
    },

    /// A reply is missing the separators needed to decode it.
    #[error("malformed response, expected {expected}: {response:?}")]
    MalformedResponse {
        /// What the decoder was looking for.
        expected: &'static str,
        /// The reply text as received.
        response: String,
    },

    /// Text that is not one of the known command forms.
    #[error("invalid command: {0}")]
    InvalidCommand(String),

    /// A relay state other than `open` or `closed`.
    #[error("invalid relay state: {0} (expected \"open\" or \"closed\")")]
    InvalidRelayState(String),
}

/// Result type alias for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;
