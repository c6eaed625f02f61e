//! Error types for Rsh/Rsb decoding and event access
//!
//! # Design Principles (KISS)
//! - One error enum for the codec and the event store
//! - Every failure is a hard stop for the operation in progress
//! - Use thiserror for ergonomic error handling

use thiserror::Error;

/// Errors raised by the header codec and the event store
#[derive(Error, Debug)]
pub enum RshError {
    /// Binary header buffer shorter than the layout requires
    #[error("Truncated header: need {needed} bytes, got {available}")]
    TruncatedHeader { needed: usize, available: usize },

    /// File too short to hold the text and binary headers
    #[error("Truncated file: need {needed} bytes, got {available}")]
    TruncatedFile { needed: u64, available: u64 },

    /// Raw bitmask value missing from a flag vocabulary
    #[error("Unknown flag code 0x{code:x} in {table} table")]
    UnknownFlagCode { table: &'static str, code: u32 },

    /// Symbolic flag name missing from a flag vocabulary
    #[error("Unknown flag name '{name}' in {table} table")]
    UnknownFlagName { table: &'static str, name: String },

    /// More flags than the header reserves slots for
    #[error("Too many flags for {table}: {count} given, {slots} slots available")]
    TooManyFlags {
        table: &'static str,
        count: usize,
        slots: usize,
    },

    /// Event index outside `[0, events_num)`
    #[error("Index {index} out of range [0:{events_num}]")]
    IndexOutOfRange { index: i64, events_num: i32 },

    /// Sample array length differs from `channel_number * b_size`
    #[error("Data should contain {expected} samples, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// Sample element type is not signed 16-bit
    #[error("Sample type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// Parameter mapping has the wrong shape for text rendering
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    /// JSON conversion error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error on the underlying stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RshError {
    /// Create an invalid parameters error
    pub fn invalid_params(msg: impl Into<String>) -> Self {
        Self::InvalidParams(msg.into())
    }

    /// Check whether this error came from the underlying stream
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}

/// Result type alias using RshError
pub type RshResult<T> = Result<T, RshError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_out_of_range_message() {
        let err = RshError::IndexOutOfRange {
            index: 5,
            events_num: 5,
        };
        assert_eq!(err.to_string(), "Index 5 out of range [0:5]");
    }

    #[test]
    fn test_unknown_flag_code_message() {
        let err = RshError::UnknownFlagCode {
            table: "channel_control",
            code: 0x20,
        };
        let msg = err.to_string();
        assert!(msg.contains("0x20"));
        assert!(msg.contains("channel_control"));
    }

    #[test]
    fn test_shape_mismatch_message() {
        let err = RshError::ShapeMismatch {
            expected: 400,
            actual: 399,
        };
        assert!(err.to_string().contains("400"));
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: RshError = io_err.into();
        assert!(err.is_io());
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_invalid_params_error() {
        let err = RshError::invalid_params("expected an object");
        assert!(!err.is_io());
        assert!(err.to_string().contains("expected an object"));
    }
}
