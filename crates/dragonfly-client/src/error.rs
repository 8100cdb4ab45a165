//! Error types for the Dragonfly client.

use std::io;

use dragonfly_protocol::ProtocolError;
use thiserror::Error;

/// Errors that can occur when talking to a dome controller.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The session has already been closed.
    #[error("connection not established")]
    NotConnected,

    /// Every attempt to send a command timed out.
    #[error("command '{command}' timed out after {attempts} attempts")]
    Timeout {
        /// The command text, including its terminator.
        command: String,
        /// Number of datagrams sent.
        attempts: u32,
    },

    /// A socket operation failed for a reason other than a timeout.
    #[error("socket error during '{context}': {source}")]
    Transport {
        /// The command or setup step that failed.
        context: String,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// A reply could not be decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
