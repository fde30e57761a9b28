//! Error types for logic value validation, network construction and file IO

use thiserror::Error;

/// Errors surfaced to the caller
///
/// Search contradictions are not represented here: they are an expected
/// outcome of the test generation engine and stay internal to it.
#[derive(Debug, Error)]
pub enum Error {
    /// A packed tri-value vector contains the reserved bit pair `0b10`
    #[error("invalid tri-value vector {bits:#b}: bit {position} is 0b10")]
    InvalidEncoding {
        /// Offending raw encoding
        bits: u64,
        /// Position of the first invalid bit pair
        position: u32,
    },

    /// A packed tri-value vector has more bits than its width allows
    #[error("invalid tri-value vector {bits:#b}: too many bits for width {width}")]
    TooManyBits {
        /// Offending raw encoding
        bits: u64,
        /// Declared vector width
        width: u32,
    },

    /// A vector width outside the supported range was requested
    #[error("unsupported vector width {0}: must be between 1 and 32")]
    InvalidWidth(u32),

    /// Structural misuse of the network builder or the engine
    #[error("configuration error: {0}")]
    Config(String),

    /// Malformed netlist file
    #[error("parse error: {0}")]
    Parse(String),

    /// Underlying file IO failure
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
