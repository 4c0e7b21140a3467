//! Mathematical types for abacus
//!
//! This crate provides the bounded integers and the 18-digit fixed-point
//! decimal that the coin types in `abacus-types` are built on.

pub mod decimal;
pub mod error;
pub mod int;
pub mod uint;

pub use decimal::{Dec, PRECISION};
pub use error::{MathError, Result};
pub use int::{Int, MAX_BIT_LEN};
pub use uint::{Uint, MAX_UINT_BIT_LEN};
