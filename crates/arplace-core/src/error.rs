//! Error types for arplace.

use thiserror::Error;

/// The main error type for arplace operations.
#[derive(Error, Debug)]
pub enum ArPlaceError {
    /// A slot index that was never handed out by the placed-object registry.
    ///
    /// Seeing this means the registry and the physics world have drifted apart.
    #[error("slot {0} was never assigned by the placed-object registry")]
    UnknownSlot(usize),

    /// An option value is out of range.
    #[error("invalid option: {0}")]
    InvalidOption(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for arplace operations.
pub type Result<T> = std::result::Result<T, ArPlaceError>;
