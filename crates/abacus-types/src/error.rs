//! Error handling for abacus

use abacus_math::MathError;
use thiserror::Error;

/// Errors produced by coin, address and configuration operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SdkError {
    #[error(transparent)]
    Math(#[from] MathError),

    #[error("invalid denom: {0}")]
    InvalidDenom(String),

    #[error("invalid coin: {0}")]
    InvalidCoin(String),

    #[error("invalid coins: {0}")]
    InvalidCoins(String),

    #[error("coin denom mismatch: {0} != {1}")]
    DenomMismatch(String, String),

    #[error("negative coin amount: {0}")]
    NegativeCoin(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("config is sealed")]
    Sealed,

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

/// Result type alias for abacus-types operations
pub type Result<T> = std::result::Result<T, SdkError>;

/// Trait for SDK errors that need to be compatible with ABCI error codes
pub trait IsSdkError {
    /// Returns the module's unique codespace string (e.g., "sdk")
    fn codespace(&self) -> &'static str;

    /// Returns the numeric error code within the codespace
    fn code(&self) -> u32;
}

impl IsSdkError for MathError {
    fn codespace(&self) -> &'static str {
        "math"
    }

    fn code(&self) -> u32 {
        match self {
            MathError::Overflow => 1,
            MathError::Underflow => 2,
            MathError::DivByZero => 3,
            MathError::OutOfRange(_) => 4,
            MathError::ParseInt(_) => 5,
            MathError::ParseDecimal(_) => 6,
            MathError::InvalidPrecision { .. } => 7,
        }
    }
}

impl IsSdkError for SdkError {
    fn codespace(&self) -> &'static str {
        match self {
            SdkError::Math(e) => e.codespace(),
            SdkError::Sealed | SdkError::InvalidConfig(_) => "config",
            _ => "sdk",
        }
    }

    fn code(&self) -> u32 {
        match self {
            SdkError::Math(e) => e.code(),
            SdkError::InvalidDenom(_) => 10,
            SdkError::InvalidCoin(_) => 10,
            SdkError::InvalidCoins(_) => 10,
            SdkError::DenomMismatch(_, _) => 18, // ErrInvalidRequest
            SdkError::NegativeCoin(_) => 5,      // ErrInsufficientFunds
            SdkError::InvalidAddress(_) => 7,
            SdkError::Sealed => 1,
            SdkError::InvalidConfig(_) => 2,
        }
    }
}
