//! Error types for XRSYNC

use thiserror::Error;

/// Core XRSYNC errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum XrsyncError {
    // Wire errors
    #[error("Invalid wire format: {0}")]
    InvalidWireFormat(String),

    #[error("Buffer too short: expected {expected}, got {actual}")]
    BufferTooShort { expected: usize, actual: usize },

    #[error("Trailing data: expected {expected} floats, got {actual}")]
    TrailingData { expected: usize, actual: usize },

    #[error("Unknown message codes: {0:#04x}")]
    UnknownMessageCodes(u8),

    // Settings errors
    #[error("Invalid user scale: {0}")]
    InvalidUserScale(f32),

    // Upload errors
    #[error("File listener already in use")]
    ListenerInUse,

    #[error("No active file listener")]
    NoActiveListener,

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("Asset import failed: {0}")]
    AssetImport(String),

    // Transport errors
    #[error("Transport error: {0}")]
    TransportError(String),
}

/// Result type for XRSYNC operations
pub type XrsyncResult<T> = Result<T, XrsyncError>;
