//! Error types for Kache
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using KacheError
pub type Result<T> = std::result::Result<T, KacheError>;

/// Unified error type for Kache operations
#[derive(Debug, Error)]
pub enum KacheError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    /// A frame that cannot be recovered from (bad length line, short read)
    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Worker Pool Errors
    // -------------------------------------------------------------------------
    #[error("Thread pool is shutting down")]
    PoolShutdown,

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl KacheError {
    /// Whether this error means the peer went away rather than misbehaved
    pub fn is_disconnect(&self) -> bool {
        match self {
            KacheError::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::UnexpectedEof
                    | std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::ConnectionAborted
                    | std::io::ErrorKind::BrokenPipe
            ),
            _ => false,
        }
    }
}
