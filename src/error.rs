/// Error types
///
/// One enum per concern. Slot index errors are caller defects and are
/// propagated; filter errors are recovered per slot by the controller.
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the slot store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SlotError {
    /// Slot index outside [0, 3]
    #[error("slot index {index} is out of range (expected 0..=3)")]
    IndexOutOfRange { index: usize },
}

/// Errors raised by a filter engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// The requested filter could not be constructed
    #[error("filter engine unavailable: {0}")]
    EngineUnavailable(String),
    /// The engine could not produce an output for the input
    #[error("filter processing failed: {0}")]
    ProcessingFailed(String),
}

/// Errors raised while loading a picked or captured image
#[derive(Debug, Clone, Error)]
pub enum CaptureError {
    #[error("image file does not exist: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to decode {}: {message}", .path.display())]
    Decode { path: PathBuf, message: String },
    /// The blocking decode task panicked or was cancelled
    #[error("decode task join error: {0}")]
    Join(String),
}

/// Errors raised by the timestamp record store
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("record database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("failed to prepare record database directory: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while reading or writing the config file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file is malformed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("config file I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_error_message_names_index() {
        let err = SlotError::IndexOutOfRange { index: 7 };
        assert_eq!(err.to_string(), "slot index 7 is out of range (expected 0..=3)");
    }

    #[test]
    fn test_capture_error_mentions_path() {
        let err = CaptureError::NotFound(PathBuf::from("/tmp/missing.png"));
        assert!(err.to_string().contains("missing.png"));
    }
}
