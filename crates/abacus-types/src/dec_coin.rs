//! Decimal-amount coins

use crate::coin::{validate_denom, Coin, Coins};
use crate::error::{Result, SdkError};
use crate::merge::{is_strictly_sorted, merge_add, negated};
use abacus_math::Dec;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

lazy_static! {
    static ref DEC_COIN_RE: Regex = Regex::new(r"^([0-9]+(?:\.[0-9]+)?)\s*([^\s,]+)$")
        .unwrap_or_else(|e| unreachable!("dec coin regex is valid: {e}"));
}

/// A coin whose amount carries 18 decimal places
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDecCoin")]
pub struct DecCoin {
    pub denom: String,
    pub amount: Dec,
}

#[derive(Deserialize)]
struct RawDecCoin {
    denom: String,
    amount: Dec,
}

impl TryFrom<RawDecCoin> for DecCoin {
    type Error = SdkError;

    fn try_from(raw: RawDecCoin) -> Result<Self> {
        DecCoin::new(raw.denom, raw.amount)
    }
}

impl DecCoin {
    pub fn new(denom: impl Into<String>, amount: Dec) -> Result<Self> {
        let coin = Self {
            denom: denom.into(),
            amount,
        };
        coin.validate()?;
        Ok(coin)
    }

    pub fn new_i64(denom: impl Into<String>, amount: i64) -> Result<Self> {
        Self::new(denom, Dec::new(amount))
    }

    pub fn from_coin(coin: &Coin) -> Self {
        Self {
            denom: coin.denom.clone(),
            amount: Dec::from_int(&coin.amount),
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_denom(&self.denom).map_err(|e| SdkError::InvalidCoin(e.to_string()))?;
        if self.amount.is_negative() {
            return Err(SdkError::InvalidCoin(format!(
                "negative decimal coin amount: {}",
                self.amount
            )));
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.amount.is_positive()
    }

    pub fn is_negative(&self) -> bool {
        self.amount.is_negative()
    }

    fn same_denom(&self, other: &DecCoin) -> Result<()> {
        if self.denom != other.denom {
            return Err(SdkError::DenomMismatch(
                self.denom.clone(),
                other.denom.clone(),
            ));
        }
        Ok(())
    }

    pub fn is_equal(&self, other: &DecCoin) -> Result<bool> {
        self.same_denom(other)?;
        Ok(self.amount == other.amount)
    }

    pub fn is_gte(&self, other: &DecCoin) -> Result<bool> {
        self.same_denom(other)?;
        Ok(self.amount >= other.amount)
    }

    pub fn is_lt(&self, other: &DecCoin) -> Result<bool> {
        self.same_denom(other)?;
        Ok(self.amount < other.amount)
    }

    pub fn add(&self, other: &DecCoin) -> Result<DecCoin> {
        self.same_denom(other)?;
        Ok(DecCoin {
            denom: self.denom.clone(),
            amount: self.amount.checked_add(&other.amount)?,
        })
    }

    pub fn sub(&self, other: &DecCoin) -> Result<DecCoin> {
        self.same_denom(other)?;
        let amount = self.amount.checked_sub(&other.amount)?;
        if amount.is_negative() {
            return Err(SdkError::NegativeCoin(format!("{}{}", amount, self.denom)));
        }
        Ok(DecCoin {
            denom: self.denom.clone(),
            amount,
        })
    }

    /// Split into the whole-number coin and the fractional change
    pub fn truncate_decimal(&self) -> Result<(Coin, DecCoin)> {
        let whole = self.amount.truncate_int()?;
        let change = self.amount.checked_sub(&Dec::from_int(&whole))?;
        Ok((
            Coin {
                denom: self.denom.clone(),
                amount: whole,
            },
            DecCoin {
                denom: self.denom.clone(),
                amount: change,
            },
        ))
    }
}

impl fmt::Display for DecCoin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

impl FromStr for DecCoin {
    type Err = SdkError;

    /// Parses `<decimal><denom>`; whole numbers are accepted as well
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let caps = DEC_COIN_RE
            .captures(s)
            .ok_or_else(|| SdkError::InvalidCoin(format!("invalid decimal coin expression: {s}")))?;
        let amount: Dec = caps[1].parse()?;
        DecCoin::new(&caps[2], amount)
    }
}

impl From<&Coin> for DecCoin {
    fn from(coin: &Coin) -> Self {
        Self::from_coin(coin)
    }
}

/// Canonical collection of decimal coins, with the same sorting and
/// positivity rules as [`Coins`]
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<DecCoin>", into = "Vec<DecCoin>")]
pub struct DecCoins(Vec<DecCoin>);

impl DecCoins {
    /// Build canonical coins from any sequence, summing repeated denoms
    /// and dropping zero amounts
    pub fn new(coins: impl IntoIterator<Item = DecCoin>) -> Result<Self> {
        let mut coins: Vec<DecCoin> = coins.into_iter().collect();
        for coin in &coins {
            coin.validate()?;
        }
        coins.sort_by(|a, b| a.denom.cmp(&b.denom));

        let mut merged: Vec<DecCoin> = Vec::with_capacity(coins.len());
        for coin in coins {
            match merged.last_mut() {
                Some(last) if last.denom == coin.denom => {
                    last.amount = last.amount.checked_add(&coin.amount)?;
                }
                _ => merged.push(coin),
            }
        }
        merged.retain(|c| !c.is_zero());
        Ok(Self(merged))
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Exact decimal image of integer coins
    pub fn from_coins(coins: &Coins) -> Self {
        Self(coins.iter().map(DecCoin::from_coin).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DecCoin> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[DecCoin] {
        &self.0
    }

    pub fn validate(&self) -> Result<()> {
        let mut prev: Option<&DecCoin> = None;
        for coin in &self.0 {
            validate_denom(&coin.denom).map_err(|e| SdkError::InvalidCoins(e.to_string()))?;
            if let Some(prev) = prev {
                if coin.denom <= prev.denom {
                    return Err(SdkError::InvalidCoins(format!(
                        "denomination {} is duplicated or not sorted",
                        coin.denom
                    )));
                }
            }
            if !coin.is_positive() {
                return Err(SdkError::InvalidCoins(format!(
                    "coin {coin} amount is not positive"
                )));
            }
            prev = Some(coin);
        }
        Ok(())
    }

    pub fn add(&self, other: &DecCoins) -> Result<DecCoins> {
        let sum = merge_add(&self.0, &other.0)?;
        assert!(is_strictly_sorted(&sum), "dec coins merge produced unsorted output");
        Ok(DecCoins(sum))
    }

    pub fn add_coin(&self, coin: &DecCoin) -> Result<DecCoins> {
        self.add(&DecCoins::new([coin.clone()])?)
    }

    /// Pointwise difference; fails if any amount would become negative
    pub fn sub(&self, other: &DecCoins) -> Result<DecCoins> {
        let (diff, has_neg) = self.safe_sub(other)?;
        if has_neg {
            let negatives: Vec<String> = diff
                .iter()
                .filter(|c| c.is_negative())
                .map(|c| c.to_string())
                .collect();
            return Err(SdkError::NegativeCoin(negatives.join(",")));
        }
        Ok(DecCoins(diff))
    }

    /// Pointwise difference as raw coins plus whether any went negative
    pub fn safe_sub(&self, other: &DecCoins) -> Result<(Vec<DecCoin>, bool)> {
        let diff = merge_add(&self.0, &negated(&other.0))?;
        let has_neg = diff.iter().any(DecCoin::is_negative);
        Ok((diff, has_neg))
    }

    pub fn amount_of(&self, denom: &str) -> Dec {
        self.0
            .binary_search_by(|c| c.denom.as_str().cmp(denom))
            .map(|i| self.0[i].amount.clone())
            .unwrap_or_else(|_| Dec::zero())
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(DecCoin::is_zero)
    }

    pub fn is_all_positive(&self) -> bool {
        !self.0.is_empty() && self.0.iter().all(DecCoin::is_positive)
    }

    pub fn is_any_negative(&self) -> bool {
        self.0.iter().any(DecCoin::is_negative)
    }

    pub fn is_equal(&self, other: &DecCoins) -> bool {
        self == other
    }

    // Apply `f` to every amount, dropping zero results. A negative result
    // would break the invariant and is reported instead.
    fn map_amounts<F>(&self, mut f: F) -> Result<DecCoins>
    where
        F: FnMut(&Dec) -> abacus_math::Result<Dec>,
    {
        let mut out = Vec::with_capacity(self.0.len());
        for coin in &self.0 {
            let amount = f(&coin.amount)?;
            if amount.is_negative() {
                return Err(SdkError::NegativeCoin(format!("{}{}", amount, coin.denom)));
            }
            if !amount.is_zero() {
                out.push(DecCoin {
                    denom: coin.denom.clone(),
                    amount,
                });
            }
        }
        Ok(DecCoins(out))
    }

    /// Scale every amount by `d`
    pub fn mul_dec(&self, d: &Dec) -> Result<DecCoins> {
        self.map_amounts(|a| a.checked_mul(d))
    }

    pub fn mul_dec_truncate(&self, d: &Dec) -> Result<DecCoins> {
        self.map_amounts(|a| a.checked_mul_truncate(d))
    }

    /// Divide every amount by `d`, rounding half to even
    pub fn quo_dec(&self, d: &Dec) -> Result<DecCoins> {
        self.map_amounts(|a| a.checked_quo(d))
    }

    pub fn quo_dec_truncate(&self, d: &Dec) -> Result<DecCoins> {
        self.map_amounts(|a| a.checked_quo_truncate(d))
    }

    /// Split into whole-number coins and the fractional change left over.
    /// Adding the two back together yields the original value.
    pub fn truncate_decimal(&self) -> Result<(Coins, DecCoins)> {
        let mut whole = Vec::new();
        let mut change = Vec::new();
        for coin in &self.0 {
            let (truncated, rest) = coin.truncate_decimal()?;
            if !truncated.is_zero() {
                whole.push(truncated);
            }
            if !rest.is_zero() {
                change.push(rest);
            }
        }
        Ok((Coins::new(whole)?, DecCoins(change)))
    }

    /// Pointwise minimum over the denoms both hold
    pub fn intersect(&self, other: &DecCoins) -> DecCoins {
        let out = self
            .0
            .iter()
            .filter_map(|coin| {
                let amount = std::cmp::min(&coin.amount, &other.amount_of(&coin.denom)).clone();
                if amount.is_zero() {
                    None
                } else {
                    Some(DecCoin {
                        denom: coin.denom.clone(),
                        amount,
                    })
                }
            })
            .collect();
        DecCoins(out)
    }
}

impl fmt::Display for DecCoins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: Vec<String> = self.0.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", s.join(","))
    }
}

impl FromStr for DecCoins {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(DecCoins::empty());
        }
        let mut coins = Vec::new();
        for part in s.split(',') {
            let coin: DecCoin = part.parse()?;
            if !coin.is_zero() {
                coins.push(coin);
            }
        }
        coins.sort_by(|a, b| a.denom.cmp(&b.denom));
        let coins = DecCoins(coins);
        coins.validate()?;
        Ok(coins)
    }
}

impl TryFrom<Vec<DecCoin>> for DecCoins {
    type Error = SdkError;

    fn try_from(coins: Vec<DecCoin>) -> Result<Self> {
        let coins = DecCoins(coins);
        coins.validate()?;
        Ok(coins)
    }
}

impl From<DecCoins> for Vec<DecCoin> {
    fn from(coins: DecCoins) -> Self {
        coins.0
    }
}

impl From<&Coins> for DecCoins {
    fn from(coins: &Coins) -> Self {
        Self::from_coins(coins)
    }
}
