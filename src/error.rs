//! Error types for Boolean function analysis.
//!
//! Structural problems are caught where a truth table or polynomial enters the
//! crate and are returned unchanged to the caller. Degenerate statistic queries
//! (an influence order past the arity, a degree above `n`) are not errors; they
//! evaluate to zero.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Errors raised while decoding or expanding a Boolean function.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// Truth-table length is not a power of two or does not equal `2^n`.
    #[error("function size mismatch in {context}: expected {expected} entries, got {got}")]
    FunctionSize {
        expected: usize,
        got: usize,
        context: String,
    },

    /// Requested arity exceeds what the crate will materialise.
    #[error("too many variables: {got} (maximum {max})")]
    TooManyVariables { got: usize, max: usize },

    /// A symbol or argument outside the accepted domain.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },
}

impl AnalysisError {
    pub fn function_size(expected: usize, got: usize, context: impl Into<String>) -> Self {
        Self::FunctionSize {
            expected,
            got,
            context: context.into(),
        }
    }

    pub fn too_many_variables(got: usize, max: usize) -> Self {
        Self::TooManyVariables { got, max }
    }

    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// True for the size family of errors (`FunctionSize`, `TooManyVariables`).
    pub fn is_size_error(&self) -> bool {
        matches!(
            self,
            Self::FunctionSize { .. } | Self::TooManyVariables { .. }
        )
    }
}
