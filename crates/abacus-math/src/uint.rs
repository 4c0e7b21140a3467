//! Bounded arbitrary precision unsigned integer

use crate::error::{MathError, Result};
use crate::int::Int;
use num_bigint::{BigInt, BigUint};
use num_traits::{One, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum bit length of a [`Uint`]
pub const MAX_UINT_BIT_LEN: u64 = 256;

/// Unsigned integer in the range `[0, 2^256 - 1]`
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Uint(BigUint);

impl Uint {
    pub fn new(n: u64) -> Self {
        Self(BigUint::from(n))
    }

    /// Wrap a big unsigned integer, rejecting values wider than 256 bits
    pub fn from_biguint(u: BigUint) -> Result<Self> {
        if u.bits() > MAX_UINT_BIT_LEN {
            return Err(MathError::Overflow);
        }
        Ok(Self(u))
    }

    /// Create `n * 10^dec`
    pub fn new_with_decimal(n: u64, dec: u32) -> Result<Self> {
        let exp = num_traits::pow(BigUint::from(10u32), dec as usize);
        Self::from_biguint(BigUint::from(n) * exp)
    }

    pub fn zero() -> Self {
        Self(BigUint::zero())
    }

    pub fn one() -> Self {
        Self(BigUint::one())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn checked_add(&self, other: &Self) -> Result<Self> {
        Self::from_biguint(&self.0 + &other.0)
    }

    /// Checked subtraction; fails with [`MathError::Underflow`] below zero
    pub fn checked_sub(&self, other: &Self) -> Result<Self> {
        if self.0 < other.0 {
            return Err(MathError::Underflow);
        }
        Ok(Self(&self.0 - &other.0))
    }

    pub fn checked_mul(&self, other: &Self) -> Result<Self> {
        if self.0.bits() + other.0.bits() > MAX_UINT_BIT_LEN + 1 {
            return Err(MathError::Overflow);
        }
        Self::from_biguint(&self.0 * &other.0)
    }

    pub fn checked_quo(&self, other: &Self) -> Result<Self> {
        if other.is_zero() {
            return Err(MathError::DivByZero);
        }
        Ok(Self(&self.0 / &other.0))
    }

    pub fn checked_rem(&self, other: &Self) -> Result<Self> {
        if other.is_zero() {
            return Err(MathError::DivByZero);
        }
        Ok(Self(&self.0 % &other.0))
    }

    pub fn checked_add_raw(&self, n: u64) -> Result<Self> {
        self.checked_add(&Self::new(n))
    }

    pub fn checked_sub_raw(&self, n: u64) -> Result<Self> {
        self.checked_sub(&Self::new(n))
    }

    pub fn checked_mul_raw(&self, n: u64) -> Result<Self> {
        self.checked_mul(&Self::new(n))
    }

    pub fn checked_quo_raw(&self, n: u64) -> Result<Self> {
        self.checked_quo(&Self::new(n))
    }

    pub fn checked_rem_raw(&self, n: u64) -> Result<Self> {
        self.checked_rem(&Self::new(n))
    }

    /// Subtraction that never fails: returns `|self - other|` and whether
    /// the true result would have been negative.
    pub fn safe_sub(&self, other: &Self) -> (Self, bool) {
        if self.0 < other.0 {
            (Self(&other.0 - &self.0), true)
        } else {
            (Self(&self.0 - &other.0), false)
        }
    }

    /// `self + 1`
    pub fn incr(&self) -> Result<Self> {
        self.checked_add(&Self::one())
    }

    /// `self - 1`
    pub fn decr(&self) -> Result<Self> {
        self.checked_sub(&Self::one())
    }

    pub fn to_u64(&self) -> Result<u64> {
        self.0
            .to_u64()
            .ok_or_else(|| MathError::OutOfRange(format!("{} does not fit in u64", self.0)))
    }

    pub fn is_uint64(&self) -> bool {
        self.0.to_u64().is_some()
    }

    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    pub fn bit_len(&self) -> u64 {
        self.0.bits()
    }

    /// Binary form: the canonical text as UTF-8 bytes
    pub fn marshal(&self) -> Vec<u8> {
        self.to_string().into_bytes()
    }

    /// Parse the binary form. Empty input decodes to zero.
    pub fn unmarshal(data: &[u8]) -> Result<Self> {
        if data.is_empty() {
            return Ok(Self::zero());
        }
        let s = std::str::from_utf8(data)
            .map_err(|_| MathError::ParseInt(String::from_utf8_lossy(data).into_owned()))?;
        s.parse()
    }
}

impl FromStr for Uint {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(MathError::ParseInt(s.to_string()));
        }
        let u = BigUint::from_str(s).map_err(|_| MathError::ParseInt(s.to_string()))?;
        Self::from_biguint(u)
    }
}

impl fmt::Display for Uint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Uint {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Uint {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl From<u64> for Uint {
    fn from(n: u64) -> Self {
        Self::new(n)
    }
}

impl TryFrom<&Int> for Uint {
    type Error = MathError;

    fn try_from(i: &Int) -> Result<Self> {
        match i.as_bigint().to_biguint() {
            Some(u) => Self::from_biguint(u),
            None => Err(MathError::Underflow),
        }
    }
}

impl TryFrom<&Uint> for Int {
    type Error = MathError;

    fn try_from(u: &Uint) -> Result<Self> {
        Int::from_bigint(BigInt::from(u.0.clone()))
    }
}
