//! Bounded arbitrary precision signed integer
//!
//! `Int` wraps a [`BigInt`] whose absolute value never exceeds
//! [`MAX_BIT_LEN`] bits. Every arithmetic operation is computed in full
//! precision and then checked against the bound, so overflow is reported
//! as [`MathError::Overflow`] instead of wrapping.

use crate::error::{MathError, Result};
use num_bigint::{BigInt, Sign};
use num_traits::{One, Signed, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Neg;
use std::str::FromStr;

/// Maximum bit length of the absolute value of an [`Int`]
pub const MAX_BIT_LEN: u64 = 255;

/// Signed integer in the range `[-(2^255 - 1), 2^255 - 1]`
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Int(BigInt);

impl Int {
    /// Create a new Int from i64
    pub fn new(n: i64) -> Self {
        Self(BigInt::from(n))
    }

    /// Create a new Int from u64
    pub fn from_u64(n: u64) -> Self {
        Self(BigInt::from(n))
    }

    /// Wrap a big integer, rejecting values outside the bit budget
    pub fn from_bigint(i: BigInt) -> Result<Self> {
        if i.bits() > MAX_BIT_LEN {
            return Err(MathError::Overflow);
        }
        Ok(Self(i))
    }

    /// Create `n * 10^dec`
    pub fn new_with_decimal(n: i64, dec: u32) -> Result<Self> {
        let exp = num_traits::pow(BigInt::from(10), dec as usize);
        Self::from_bigint(BigInt::from(n) * exp)
    }

    /// Zero value
    pub fn zero() -> Self {
        Self(BigInt::zero())
    }

    pub fn one() -> Self {
        Self(BigInt::one())
    }

    /// Check if zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Check if negative
    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    /// Check if positive
    pub fn is_positive(&self) -> bool {
        self.0.is_positive()
    }

    /// Returns -1, 0 or 1 depending on the sign
    pub fn sign(&self) -> i8 {
        match self.0.sign() {
            Sign::Minus => -1,
            Sign::NoSign => 0,
            Sign::Plus => 1,
        }
    }

    /// Checked addition
    pub fn checked_add(&self, other: &Self) -> Result<Self> {
        Self::from_bigint(&self.0 + &other.0)
    }

    /// Checked subtraction
    pub fn checked_sub(&self, other: &Self) -> Result<Self> {
        Self::from_bigint(&self.0 - &other.0)
    }

    /// Checked multiplication
    pub fn checked_mul(&self, other: &Self) -> Result<Self> {
        // the product of two operands can only fit if their bit lengths
        // add up to at most one more than the limit
        if self.0.bits() + other.0.bits() > MAX_BIT_LEN + 1 {
            return Err(MathError::Overflow);
        }
        Self::from_bigint(&self.0 * &other.0)
    }

    /// Division truncated toward zero
    pub fn checked_quo(&self, other: &Self) -> Result<Self> {
        if other.is_zero() {
            return Err(MathError::DivByZero);
        }
        Self::from_bigint(&self.0 / &other.0)
    }

    /// Remainder of the truncated division; takes the sign of the dividend
    pub fn checked_rem(&self, other: &Self) -> Result<Self> {
        if other.is_zero() {
            return Err(MathError::DivByZero);
        }
        Self::from_bigint(&self.0 % &other.0)
    }

    pub fn checked_add_raw(&self, n: i64) -> Result<Self> {
        self.checked_add(&Self::new(n))
    }

    pub fn checked_sub_raw(&self, n: i64) -> Result<Self> {
        self.checked_sub(&Self::new(n))
    }

    pub fn checked_mul_raw(&self, n: i64) -> Result<Self> {
        self.checked_mul(&Self::new(n))
    }

    pub fn checked_quo_raw(&self, n: i64) -> Result<Self> {
        self.checked_quo(&Self::new(n))
    }

    pub fn checked_rem_raw(&self, n: i64) -> Result<Self> {
        self.checked_rem(&Self::new(n))
    }

    /// Absolute value
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Convert to i64, failing when the value does not fit
    pub fn to_i64(&self) -> Result<i64> {
        self.0
            .to_i64()
            .ok_or_else(|| MathError::OutOfRange(format!("{} does not fit in i64", self.0)))
    }

    /// Convert to u64, failing when the value does not fit
    pub fn to_u64(&self) -> Result<u64> {
        self.0
            .to_u64()
            .ok_or_else(|| MathError::OutOfRange(format!("{} does not fit in u64", self.0)))
    }

    pub fn is_int64(&self) -> bool {
        self.0.to_i64().is_some()
    }

    pub fn is_uint64(&self) -> bool {
        self.0.to_u64().is_some()
    }

    /// Borrow the underlying big integer
    pub fn as_bigint(&self) -> &BigInt {
        &self.0
    }

    /// Copy of the underlying big integer
    pub fn to_bigint(&self) -> BigInt {
        self.0.clone()
    }

    /// Number of bits needed to represent the absolute value
    pub fn bit_len(&self) -> u64 {
        self.0.bits()
    }

    /// Length in bytes of the canonical text form
    pub fn size(&self) -> usize {
        let digits = if self.is_zero() {
            1
        } else {
            self.0.magnitude().to_str_radix(10).len()
        };
        if self.is_negative() {
            digits + 1
        } else {
            digits
        }
    }

    /// Text form with digits grouped in thousands, e.g. `-1'234'567`
    pub fn format_grouped(&self) -> String {
        group_thousands(&self.to_string())
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

/// Returns true when `s` is `-?[0-9]+`
fn is_integer_literal(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn group_thousands(s: &str) -> String {
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s),
    };
    let mut out = String::with_capacity(s.len() + digits.len() / 3);
    out.push_str(sign);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('\'');
        }
        out.push(ch);
    }
    out
}

impl FromStr for Int {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Self> {
        if !is_integer_literal(s) {
            return Err(MathError::ParseInt(s.to_string()));
        }
        let i = BigInt::from_str(s).map_err(|_| MathError::ParseInt(s.to_string()))?;
        Self::from_bigint(i)
    }
}

impl fmt::Display for Int {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Int {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Int {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl Neg for Int {
    type Output = Int;

    fn neg(self) -> Int {
        Int(-self.0)
    }
}

impl Neg for &Int {
    type Output = Int;

    fn neg(self) -> Int {
        Int(-&self.0)
    }
}

impl From<i64> for Int {
    fn from(n: i64) -> Self {
        Self::new(n)
    }
}

impl From<u64> for Int {
    fn from(n: u64) -> Self {
        Self::from_u64(n)
    }
}

impl From<i32> for Int {
    fn from(n: i32) -> Self {
        Self::new(n.into())
    }
}

impl TryFrom<BigInt> for Int {
    type Error = MathError;

    fn try_from(i: BigInt) -> Result<Self> {
        Self::from_bigint(i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn max_int() -> Int {
        let max = (BigInt::one() << 255u32) - BigInt::one();
        Int::from_bigint(max).unwrap()
    }

    #[test]
    fn test_new_with_decimal_bounds() {
        // Max Int = 2^255 - 1 ~ 5.789e76
        assert!(Int::new_with_decimal(1, 76).is_ok());
        assert!(Int::new_with_decimal(3, 76).is_ok());
        assert_eq!(Int::new_with_decimal(6, 76), Err(MathError::Overflow));
        assert_eq!(Int::new_with_decimal(9, 80), Err(MathError::Overflow));
    }

    #[test]
    fn test_overflow_boundary() {
        let i1 = Int::new_with_decimal(1, 76).unwrap();
        let i2 = Int::new_with_decimal(2, 76).unwrap();
        let i3 = Int::new_with_decimal(3, 76).unwrap();

        assert!(i1.checked_add(&i1).is_ok());
        assert!(i2.checked_add(&i2).is_ok());
        assert_eq!(i3.checked_add(&i3), Err(MathError::Overflow));

        assert!(i2.checked_sub(&-&i2).is_ok());
        assert_eq!(i3.checked_sub(&-&i3), Err(MathError::Overflow));

        assert_eq!(i1.checked_mul(&i1), Err(MathError::Overflow));
        assert_eq!((-&i1).checked_mul(&-&i1), Err(MathError::Overflow));
        assert_eq!(i1.checked_mul(&-&i1), Err(MathError::Overflow));

        let i3n = -&i3;
        assert!(i3n.checked_sub(&i2).is_ok());
        assert_eq!(i3n.checked_sub(&i3), Err(MathError::Overflow));
        assert_eq!(i3n.checked_add(&-&i3), Err(MathError::Overflow));
    }

    #[test]
    fn test_max_min_bounds() {
        let max = max_int();
        let min = -&max;
        assert_eq!(max.bit_len(), 255);
        assert!(max.checked_add(&Int::zero()).is_ok());
        assert!(min.checked_sub(&Int::zero()).is_ok());
        assert_eq!(max.checked_add(&Int::one()), Err(MathError::Overflow));
        assert_eq!(min.checked_sub(&Int::one()), Err(MathError::Overflow));
        assert_eq!(max.checked_mul_raw(2), Err(MathError::Overflow));
        assert_eq!(max.checked_mul_raw(1).unwrap(), max);
    }

    #[test]
    fn test_division() {
        let a = Int::new(-7);
        let b = Int::new(2);
        assert_eq!(a.checked_quo(&b).unwrap(), Int::new(-3));
        assert_eq!(a.checked_rem(&b).unwrap(), Int::new(-1));
        assert_eq!(Int::new(7).checked_quo_raw(-2).unwrap(), Int::new(-3));
        assert_eq!(Int::new(7).checked_rem_raw(-2).unwrap(), Int::new(1));
        assert_eq!(a.checked_quo(&Int::zero()), Err(MathError::DivByZero));
        assert_eq!(a.checked_rem_raw(0), Err(MathError::DivByZero));
    }

    #[test]
    fn test_sign_and_compare() {
        assert_eq!(Int::new(-5).sign(), -1);
        assert_eq!(Int::zero().sign(), 0);
        assert_eq!(Int::default().sign(), 0);
        assert_eq!(Int::new(5).sign(), 1);

        let a = Int::new(3);
        let b = Int::new(4);
        assert!(a < b);
        assert!(b.gt(&a));
        assert!(a.le(&a));
        assert!(b.ge(&a));
        assert_eq!(a.clone().max(b.clone()), b);
        assert_eq!(Int::default(), Int::zero());
        assert!(Int::default().is_zero());
    }

    #[test]
    fn test_to_i64() {
        assert_eq!(Int::new(i64::MIN).to_i64().unwrap(), i64::MIN);
        let big = Int::from_u64(u64::MAX);
        assert!(matches!(big.to_i64(), Err(MathError::OutOfRange(_))));
        assert!(!big.is_int64());
        assert!(big.is_uint64());
        assert!(Int::new(-1).to_u64().is_err());
    }

    #[test]
    fn test_parse_strict() {
        assert_eq!("123".parse::<Int>().unwrap(), Int::new(123));
        assert_eq!("-123".parse::<Int>().unwrap(), Int::new(-123));
        assert_eq!("0007".parse::<Int>().unwrap(), Int::new(7));
        for bad in ["", "-", "+1", " 1", "1 ", "1_000", "1.0", "--1", "0x10", "a10"] {
            assert!(
                matches!(bad.parse::<Int>(), Err(MathError::ParseInt(_))),
                "{bad:?} should not parse"
            );
        }
        let too_big = "1".to_string() + &"0".repeat(77);
        assert_eq!(too_big.parse::<Int>(), Err(MathError::Overflow));
    }

    #[test]
    fn test_json_encoding() {
        let i = Int::new(-42);
        let json = serde_json::to_string(&i).unwrap();
        assert_eq!(json, "\"-42\"");
        let back: Int = serde_json::from_str(&json).unwrap();
        assert_eq!(back, i);

        let too_big = format!("\"{}\"", BigInt::one() << 255u32);
        assert!(serde_json::from_str::<Int>(&too_big).is_err());
        assert!(serde_json::from_str::<Int>("42").is_err());
    }

    #[test]
    fn test_marshal_unmarshal() {
        let i = Int::new_with_decimal(-5, 40).unwrap();
        let bz = i.marshal();
        assert_eq!(bz, i.to_string().as_bytes());
        assert_eq!(Int::unmarshal(&bz).unwrap(), i);
        assert_eq!(Int::unmarshal(&[]).unwrap(), Int::zero());
        assert!(Int::unmarshal(&[0xff, 0xfe]).is_err());
    }

    #[test]
    fn test_size_and_grouping() {
        assert_eq!(Int::zero().size(), 1);
        assert_eq!(Int::new(-10).size(), 3);
        assert_eq!(Int::new(99999).size(), 5);
        assert_eq!(Int::new(0).format_grouped(), "0");
        assert_eq!(Int::new(1234).format_grouped(), "1'234");
        assert_eq!(Int::new(-123456).format_grouped(), "-123'456");
        assert_eq!(Int::new(12345678910).format_grouped(), "12'345'678'910");
    }

    fn arb_int() -> impl Strategy<Value = Int> {
        // keep operands well inside the budget so sums and products fit
        any::<i128>().prop_map(|n| Int::from_bigint(BigInt::from(n)).unwrap())
    }

    proptest! {
        #[test]
        fn prop_add_identity_and_commutative(x in arb_int(), y in arb_int()) {
            prop_assert_eq!(x.checked_add(&Int::zero()).unwrap(), x.clone());
            prop_assert_eq!(x.checked_add(&y).unwrap(), y.checked_add(&x).unwrap());
        }

        #[test]
        fn prop_add_associative(x in arb_int(), y in arb_int(), z in arb_int()) {
            let left = x.checked_add(&y).unwrap().checked_add(&z).unwrap();
            let right = x.checked_add(&y.checked_add(&z).unwrap()).unwrap();
            prop_assert_eq!(left, right);
        }

        #[test]
        fn prop_sub_self_and_mul_one(x in arb_int()) {
            prop_assert_eq!(x.checked_sub(&x).unwrap(), Int::zero());
            prop_assert_eq!(x.checked_mul(&Int::one()).unwrap(), x);
        }

        #[test]
        fn prop_quo_rem_reconstructs(x in arb_int(), y in arb_int()) {
            prop_assume!(!y.is_zero());
            let q = x.checked_quo(&y).unwrap();
            let r = x.checked_rem(&y).unwrap();
            prop_assert_eq!(q.checked_mul(&y).unwrap().checked_add(&r).unwrap(), x);
        }

        #[test]
        fn prop_text_round_trip(x in arb_int()) {
            prop_assert_eq!(x.to_string().parse::<Int>().unwrap(), x);
        }
    }
}
