//! Error types for the data plane
use thiserror::Error;

/// Data-plane errors
///
/// Malformed network input is never an error (packets are silently dropped);
/// these cover configuration problems and transport failures only.
#[derive(Error, Debug)]
pub enum LinkError {
    /// Invalid configuration
    #[error("config error: {0}")]
    Config(String),

    /// I/O error from a socket or hardware transport
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for data-plane operations
pub type Result<T> = std::result::Result<T, LinkError>;
