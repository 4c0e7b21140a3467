//! Error type shared by the numeric types

use thiserror::Error;

/// Errors produced by [`Int`](crate::Int), [`Uint`](crate::Uint) and
/// [`Dec`](crate::Dec) operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MathError {
    /// Result does not fit in the bit budget of the type
    #[error("integer overflow")]
    Overflow,

    /// Unsigned result would be negative
    #[error("integer underflow")]
    Underflow,

    #[error("division by zero")]
    DivByZero,

    /// Value cannot be represented by the requested host type
    #[error("value out of range:: {0}")]
    OutOfRange(String),

    #[error("invalid integer string:: {0:?}")]
    ParseInt(String),

    #[error("invalid decimal string:: {0:?}")]
    ParseDecimal(String),

    #[error("invalid precision; max: {max}, got: {got}")]
    InvalidPrecision { max: u32, got: u32 },
}

/// Result type alias for numeric operations
pub type Result<T> = std::result::Result<T, MathError>;
