use thiserror::Error;

use crate::mining::{Monotonicity, Strategy, TruncationReason};

#[derive(Error, Debug)]
pub enum MinerError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The interestingness predicate failed while evaluating a candidate.
    /// Never downgraded to "predicate is false".
    #[error("Predicate fault: {0}")]
    PredicateFault(String),

    #[error("Strategy {strategy} cannot run a {monotonicity} constraint")]
    StrategyMismatch {
        strategy: Strategy,
        monotonicity: Monotonicity,
    },

    #[error("Search truncated after level {level}: {reason}")]
    Truncated {
        level: usize,
        reason: TruncationReason,
    },

    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MinerError>;
