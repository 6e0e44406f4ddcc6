//! # Error Types
//!
//! Custom error types for Radiotrail using `thiserror`.

use thiserror::Error;

use crate::wire::address::AddressFormatError;
use crate::wire::command::CommandError;
use crate::wire::decoder::DecodeError;

/// Main error type for Radiotrail
#[derive(Debug, Error)]
pub enum RadiotrailError {
    /// Snapshot wire format errors
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Address text errors
    #[error("Address error: {0}")]
    Address(#[from] AddressFormatError),

    /// Device command errors
    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// Snapshot source errors
    #[error("Snapshot source error: {0}")]
    Source(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Radiotrail
pub type Result<T> = std::result::Result<T, RadiotrailError>;
