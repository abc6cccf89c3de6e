//! Engine errors
//!
//! Every error is a local validation failure on a malformed configuration.
//! Nothing here is transient, so callers should reject the input rather
//! than retry.

use thiserror::Error;

/// Errors raised by the distribution engine and its configuration layer
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("invalid die: {sides} sides (a die needs at least 1 side)")]
    InvalidDie { sides: i64 },

    #[error("invalid dice notation {input:?}: {reason}")]
    InvalidNotation { input: String, reason: String },

    #[error("invalid advantage mode {0:?} (expected advantage, none or disadvantage)")]
    InvalidAdvantage(String),

    #[error("invalid distribution: {0}")]
    InvalidDistribution(String),

    #[error("totals of {0} do not fit in a 32-bit integer")]
    TotalOutOfRange(String),

    #[error("too many extra dice ({count} > {max})")]
    TooManyExtras { count: usize, max: usize },

    #[error("d{sides} is not a standard die (expected one of d4, d6, d8, d10, d12, d20)")]
    NonStandardDie { sides: u32 },
}

/// Result alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
