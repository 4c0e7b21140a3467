//! Fixed-point decimal type for precise calculations
//!
//! A [`Dec`] stores its value as a big integer scaled by `10^18`, so the
//! literal `1.0` is held as `10^18`. Multiplication and division remove the
//! extra 18 digits with banker's rounding (round half to even) unless a
//! truncating or rounding-up variant is requested.

use crate::error::{MathError, Result};
use crate::int::{Int, MAX_BIT_LEN};
use num_bigint::BigInt;
use num_traits::{One, Signed, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Neg;
use std::str::FromStr;

/// Number of decimal places
pub const PRECISION: u32 = 18;

/// Bits required to represent the fractional part, `ceil(log2(10^18 - 1))`
pub const DECIMAL_PRECISION_BITS: u64 = 60;

/// Maximum bit length of the scaled value
pub const MAX_DEC_BIT_LEN: u64 = MAX_BIT_LEN + DECIMAL_PRECISION_BITS;

/// Iteration cap for [`Dec::approx_root`]
const MAX_APPROX_ROOT_ITERATIONS: usize = 100;

/// `10^PRECISION`
const ONE_SCALED: i64 = 1_000_000_000_000_000_000;

fn precision_int() -> BigInt {
    BigInt::from(ONE_SCALED)
}

/// Multiplier that lifts a value with `prec` decimal places to full precision
fn precision_multiplier(prec: u32) -> Result<BigInt> {
    if prec > PRECISION {
        return Err(MathError::InvalidPrecision {
            max: PRECISION,
            got: prec,
        });
    }
    Ok(num_traits::pow(
        BigInt::from(10),
        (PRECISION - prec) as usize,
    ))
}

// Remove PRECISION rightmost digits and apply banker's rounding to what was
// removed. Negative values are rounded on their magnitude.
fn chop_precision_and_round(d: BigInt) -> BigInt {
    if d.is_negative() {
        return -chop_precision_and_round(-d);
    }

    let precision = precision_int();
    let quo = &d / &precision;
    let rem = &d % &precision;

    if rem.is_zero() {
        return quo;
    }

    let half = BigInt::from(ONE_SCALED / 2);
    match rem.cmp(&half) {
        std::cmp::Ordering::Less => quo,
        std::cmp::Ordering::Greater => quo + 1,
        std::cmp::Ordering::Equal => {
            if (&quo % 2u32).is_zero() {
                quo
            } else {
                quo + 1
            }
        }
    }
}

fn chop_precision_and_round_up(d: BigInt) -> BigInt {
    if d.is_negative() {
        // truncating the magnitude rounds a negative value up
        return -chop_precision_and_truncate(-d);
    }

    let precision = precision_int();
    let quo = &d / &precision;
    let rem = &d % &precision;

    if rem.is_zero() {
        quo
    } else {
        quo + 1
    }
}

fn chop_precision_and_truncate(d: BigInt) -> BigInt {
    d / precision_int()
}

/// Signed fixed-point number with 18 decimal places
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Dec(BigInt);

impl Dec {
    fn checked(i: BigInt) -> Result<Self> {
        if i.bits() > MAX_DEC_BIT_LEN {
            return Err(MathError::Overflow);
        }
        Ok(Self(i))
    }

    /// Create a whole-number decimal
    pub fn new(i: i64) -> Self {
        Self(BigInt::from(i) * precision_int())
    }

    /// Create `i / 10^prec`
    ///
    /// ```
    /// use abacus_math::Dec;
    /// assert_eq!(Dec::new_with_prec(15, 1).unwrap().to_string(), "1.500000000000000000");
    /// ```
    pub fn new_with_prec(i: i64, prec: u32) -> Result<Self> {
        Ok(Self(BigInt::from(i) * precision_multiplier(prec)?))
    }

    pub fn from_int(i: &Int) -> Self {
        // an Int is at most 255 bits and 10^18 needs fewer than 60
        Self(i.as_bigint() * precision_int())
    }

    pub fn from_int_with_prec(i: &Int, prec: u32) -> Result<Self> {
        Self::checked(i.as_bigint() * precision_multiplier(prec)?)
    }

    /// Create `i / 10^prec` from a big integer
    pub fn from_bigint_with_prec(i: BigInt, prec: u32) -> Result<Self> {
        Self::checked(i * precision_multiplier(prec)?)
    }

    pub fn zero() -> Self {
        Self(BigInt::zero())
    }

    pub fn one() -> Self {
        Self(precision_int())
    }

    /// Smallest representable positive value, `10^-18`
    pub fn smallest() -> Self {
        Self(BigInt::one())
    }

    /// Largest magnitude accepted by [`Dec::sortable_bytes`], `10^18`
    pub fn max_sortable() -> Self {
        Self(precision_int() * precision_int())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    pub fn is_positive(&self) -> bool {
        self.0.is_positive()
    }

    /// True when there is no fractional part
    pub fn is_integer(&self) -> bool {
        (&self.0 % precision_int()).is_zero()
    }

    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    pub fn checked_add(&self, other: &Self) -> Result<Self> {
        Self::checked(&self.0 + &other.0)
    }

    pub fn checked_sub(&self, other: &Self) -> Result<Self> {
        Self::checked(&self.0 - &other.0)
    }

    /// Multiplication with banker's rounding of the 19th decimal place
    pub fn checked_mul(&self, other: &Self) -> Result<Self> {
        Self::checked(chop_precision_and_round(&self.0 * &other.0))
    }

    /// Multiplication that drops digits beyond the precision
    pub fn checked_mul_truncate(&self, other: &Self) -> Result<Self> {
        Self::checked(chop_precision_and_truncate(&self.0 * &other.0))
    }

    pub fn checked_mul_int(&self, i: &Int) -> Result<Self> {
        Self::checked(&self.0 * i.as_bigint())
    }

    pub fn checked_mul_i64(&self, i: i64) -> Result<Self> {
        Self::checked(&self.0 * BigInt::from(i))
    }

    // self * 10^36 / other, leaving 18 guard digits for the final chop
    fn scaled_quo(&self, other: &Self) -> Result<BigInt> {
        if other.is_zero() {
            return Err(MathError::DivByZero);
        }
        let precision = precision_int();
        let mul = &self.0 * &precision * &precision;
        Ok(mul / &other.0)
    }

    /// Division with banker's rounding
    pub fn checked_quo(&self, other: &Self) -> Result<Self> {
        Self::checked(chop_precision_and_round(self.scaled_quo(other)?))
    }

    /// Division truncated toward zero
    pub fn checked_quo_truncate(&self, other: &Self) -> Result<Self> {
        Self::checked(chop_precision_and_truncate(self.scaled_quo(other)?))
    }

    /// Division rounded toward positive infinity
    pub fn checked_quo_round_up(&self, other: &Self) -> Result<Self> {
        Self::checked(chop_precision_and_round_up(self.scaled_quo(other)?))
    }

    pub fn checked_quo_int(&self, i: &Int) -> Result<Self> {
        if i.is_zero() {
            return Err(MathError::DivByZero);
        }
        Self::checked(&self.0 / i.as_bigint())
    }

    pub fn checked_quo_i64(&self, i: i64) -> Result<Self> {
        self.checked_quo_int(&Int::new(i))
    }

    /// Raise to a non-negative integer power by repeated squaring
    pub fn power(&self, power: u64) -> Result<Self> {
        if power == 0 {
            return Ok(Self::one());
        }

        let mut tmp = Self::one();
        let mut base = self.clone();
        let mut i = power;
        while i > 1 {
            if i % 2 != 0 {
                tmp = tmp.checked_mul(&base)?;
            }
            i /= 2;
            base = base.checked_mul(&base)?;
        }

        base.checked_mul(&tmp)
    }

    /// Approximate the `root`-th root with Newton's method.
    ///
    /// Iterates until the correction is at most `10^-18` or 100 iterations
    /// have run. Some inputs do not converge within the cap; the last
    /// iterate is returned in that case, so the result is only accurate to
    /// within a few units of the last place. Negative inputs yield
    /// `-(|self|.approx_root(root))`.
    pub fn approx_root(&self, root: u64) -> Result<Self> {
        if self.is_negative() {
            return Ok(-self.abs().approx_root(root)?);
        }

        if root == 1 || self.is_zero() || *self == Self::one() {
            return Ok(self.clone());
        }

        if root == 0 {
            return Ok(Self::one());
        }

        let root_int = Int::from_u64(root);
        let smallest = Self::smallest();
        let mut guess = Self::one();
        let mut delta = Self::one();

        let mut iter = 0;
        while delta.abs() > smallest && iter < MAX_APPROX_ROOT_ITERATIONS {
            let mut prev = guess.power(root - 1)?;
            if prev.is_zero() {
                prev = smallest.clone();
            }
            delta = self
                .checked_quo(&prev)?
                .checked_sub(&guess)?
                .checked_quo_int(&root_int)?;
            guess = guess.checked_add(&delta)?;
            iter += 1;
        }

        Ok(guess)
    }

    /// Square root via [`Dec::approx_root`]
    pub fn approx_sqrt(&self) -> Result<Self> {
        self.approx_root(2)
    }

    /// Integer part, rounded toward zero
    pub fn truncate_int(&self) -> Result<Int> {
        Int::from_bigint(chop_precision_and_truncate(self.0.clone()))
    }

    /// Whole-number part as i64 when it fits, without rounding
    pub fn to_i64_exact(&self) -> Option<i64> {
        if !self.is_integer() {
            return None;
        }
        chop_precision_and_truncate(self.0.clone()).to_i64()
    }

    pub fn truncate_i64(&self) -> Result<i64> {
        self.truncate_int()?.to_i64()
    }

    /// Decimal with the fractional part removed
    pub fn truncate_dec(&self) -> Self {
        Self(chop_precision_and_truncate(self.0.clone()) * precision_int())
    }

    /// Nearest integer, ties to even
    pub fn round_int(&self) -> Result<Int> {
        Int::from_bigint(chop_precision_and_round(self.0.clone()))
    }

    pub fn round_i64(&self) -> Result<i64> {
        self.round_int()?.to_i64()
    }

    /// Smallest whole number greater than or equal to `self`
    pub fn ceil(&self) -> Result<Self> {
        let precision = precision_int();
        let quo = &self.0 / &precision;
        let rem = &self.0 % &precision;

        // truncated division already moved negative values up
        let whole = if rem.is_positive() { quo + 1 } else { quo };
        Self::checked(whole * precision)
    }

    pub fn ceil_int(&self) -> Result<Int> {
        self.ceil()?.truncate_int()
    }

    /// Copy of the scaled integer representation
    pub fn to_bigint(&self) -> BigInt {
        self.0.clone()
    }

    pub fn valid_sortable(&self) -> bool {
        self.abs() <= Self::max_sortable()
    }

    /// Byte form that sorts in numeric order.
    ///
    /// Both sides of the decimal point are padded to 18 digits. The bounds
    /// `10^18` and `-10^18` encode as `max` and `--`.
    ///
    /// # Panics
    ///
    /// Panics when `|self| > 10^18`.
    pub fn sortable_bytes(&self) -> Vec<u8> {
        assert!(
            self.valid_sortable(),
            "dec must be within bounds of the sortable range"
        );
        let max = Self::max_sortable();
        if *self == max {
            return b"max".to_vec();
        }
        if *self == -&max {
            return b"--".to_vec();
        }
        let width = (PRECISION * 2 + 1) as usize;
        if self.is_negative() {
            format!("-{:0>width$}", self.abs().to_string(), width = width).into_bytes()
        } else {
            format!("{:0>width$}", self.to_string(), width = width).into_bytes()
        }
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
            .map_err(|_| MathError::ParseDecimal(String::from_utf8_lossy(data).into_owned()))?;
        s.parse()
    }
}

impl FromStr for Dec {
    type Err = MathError;

    /// Accepts `[-]digits[.digits]` with at most 18 fractional digits
    fn from_str(input: &str) -> Result<Self> {
        let invalid = || MathError::ParseDecimal(input.to_string());

        let (neg, body) = match input.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, input),
        };
        if body.is_empty() {
            return Err(invalid());
        }

        let (whole, frac) = match body.split_once('.') {
            Some((whole, frac)) => {
                if whole.is_empty() || frac.is_empty() {
                    return Err(invalid());
                }
                (whole, frac)
            }
            None => (body, ""),
        };

        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(whole) || !all_digits(frac) {
            return Err(invalid());
        }
        if frac.len() > PRECISION as usize {
            return Err(invalid());
        }

        let mut combined = String::with_capacity(whole.len() + PRECISION as usize);
        combined.push_str(whole);
        combined.push_str(frac);
        combined.extend(std::iter::repeat('0').take(PRECISION as usize - frac.len()));

        let mut value = BigInt::from_str(&combined).map_err(|_| invalid())?;
        if neg {
            value = -value;
        }
        Self::checked(value)
    }
}

impl fmt::Display for Dec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.magnitude().to_str_radix(10);
        let precision = PRECISION as usize;

        if self.is_negative() {
            f.write_str("-")?;
        }
        if digits.len() <= precision {
            write!(f, "0.{:0>width$}", digits, width = precision)
        } else {
            let point = digits.len() - precision;
            write!(f, "{}.{}", &digits[..point], &digits[point..])
        }
    }
}

impl Serialize for Dec {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Dec {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl Neg for Dec {
    type Output = Dec;

    fn neg(self) -> Dec {
        Dec(-self.0)
    }
}

impl Neg for &Dec {
    type Output = Dec;

    fn neg(self) -> Dec {
        Dec(-&self.0)
    }
}

impl From<&Int> for Dec {
    fn from(i: &Int) -> Self {
        Self::from_int(i)
    }
}

impl From<i64> for Dec {
    fn from(i: i64) -> Self {
        Self::new(i)
    }
}

impl TryFrom<rust_decimal::Decimal> for Dec {
    type Error = MathError;

    /// Digits beyond the 18th decimal place are rounded half to even
    fn try_from(d: rust_decimal::Decimal) -> Result<Self> {
        let rounded = d.round_dp_with_strategy(
            PRECISION,
            rust_decimal::RoundingStrategy::MidpointNearestEven,
        );
        rounded.to_string().parse()
    }
}

impl TryFrom<&Dec> for rust_decimal::Decimal {
    type Error = MathError;

    fn try_from(d: &Dec) -> Result<Self> {
        let text = d.to_string();
        rust_decimal::Decimal::from_str_exact(&text)
            .map_err(|e| MathError::OutOfRange(format!("{text}: {e}")))
    }
}
