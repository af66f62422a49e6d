//! Error types for the line-oriented persistence codec

use thiserror::Error;

/// Errors during path/stats file parsing
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("room record at line {line_number} matches no known layout: {line}")]
    UnknownRoomLayout { line_number: usize, line: String },

    #[error("invalid checkpoint line at line {line_number}: expected Name;Abbreviation;RoomCount;rooms")]
    InvalidCheckpointLine { line_number: usize },

    #[error("checkpoint at line {line_number} declares {declared} rooms but lists {actual}")]
    RoomCountMismatch {
        line_number: usize,
        declared: usize,
        actual: usize,
    },
}
