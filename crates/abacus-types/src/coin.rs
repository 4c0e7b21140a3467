//! Coin and Coins types for handling tokens

use crate::config::config;
use crate::error::{Result, SdkError};
use crate::merge::{is_strictly_sorted, merge_add, merge_with, negated};
use abacus_math::Int;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

lazy_static! {
    // amount, optional whitespace, then a denom token checked against the config
    static ref COIN_RE: Regex = Regex::new(r"^([0-9]+)\s*([^\s,]+)$")
        .unwrap_or_else(|e| unreachable!("coin regex is valid: {e}"));
}

/// Check a denomination against the process-wide denom pattern
pub fn validate_denom(denom: &str) -> Result<()> {
    config().validate_denom(denom)
}

/// A single coin with denomination and amount
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawCoin")]
pub struct Coin {
    pub denom: String,
    pub amount: Int,
}

/// Unvalidated wire form of [`Coin`]
#[derive(Deserialize)]
struct RawCoin {
    denom: String,
    amount: Int,
}

impl TryFrom<RawCoin> for Coin {
    type Error = SdkError;

    fn try_from(raw: RawCoin) -> Result<Self> {
        Coin::new(raw.denom, raw.amount)
    }
}

impl Coin {
    /// Create a new coin, validating denomination and amount
    pub fn new(denom: impl Into<String>, amount: Int) -> Result<Self> {
        let coin = Self {
            denom: denom.into(),
            amount,
        };
        coin.validate()?;
        Ok(coin)
    }

    pub fn new_i64(denom: impl Into<String>, amount: i64) -> Result<Self> {
        Self::new(denom, Int::new(amount))
    }

    pub fn validate(&self) -> Result<()> {
        validate_denom(&self.denom).map_err(|e| SdkError::InvalidCoin(e.to_string()))?;
        if self.amount.is_negative() {
            return Err(SdkError::InvalidCoin(format!(
                "negative coin amount: {}",
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

    /// True for the zero value: no denom and no amount
    pub fn is_nil(&self) -> bool {
        self.denom.is_empty() && self.amount.is_zero()
    }

    fn same_denom(&self, other: &Coin) -> Result<()> {
        if self.denom != other.denom {
            return Err(SdkError::DenomMismatch(
                self.denom.clone(),
                other.denom.clone(),
            ));
        }
        Ok(())
    }

    pub fn is_equal(&self, other: &Coin) -> Result<bool> {
        self.same_denom(other)?;
        Ok(self.amount == other.amount)
    }

    pub fn is_gte(&self, other: &Coin) -> Result<bool> {
        self.same_denom(other)?;
        Ok(self.amount >= other.amount)
    }

    pub fn is_lt(&self, other: &Coin) -> Result<bool> {
        self.same_denom(other)?;
        Ok(self.amount < other.amount)
    }

    pub fn add(&self, other: &Coin) -> Result<Coin> {
        self.same_denom(other)?;
        Ok(Coin {
            denom: self.denom.clone(),
            amount: self.amount.checked_add(&other.amount)?,
        })
    }

    /// Subtract a coin of the same denom; fails if the result is negative
    pub fn sub(&self, other: &Coin) -> Result<Coin> {
        self.same_denom(other)?;
        let amount = self.amount.checked_sub(&other.amount)?;
        if amount.is_negative() {
            return Err(SdkError::NegativeCoin(format!("{}{}", amount, self.denom)));
        }
        Ok(Coin {
            denom: self.denom.clone(),
            amount,
        })
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

impl FromStr for Coin {
    type Err = SdkError;

    /// Parses `<amount><denom>`, e.g. `10uatom` or ` 10 uatom `
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let caps = COIN_RE
            .captures(s)
            .ok_or_else(|| SdkError::InvalidCoin(format!("invalid coin expression: {s}")))?;
        let amount: Int = caps[1].parse()?;
        Coin::new(&caps[2], amount)
    }
}

/// Checks the canonical-form rules over a raw slice
fn validate_coins(coins: &[Coin]) -> Result<()> {
    let mut prev: Option<&Coin> = None;
    for coin in coins {
        validate_denom(&coin.denom)
            .map_err(|e| SdkError::InvalidCoins(e.to_string()))?;
        if let Some(prev) = prev {
            match coin.denom.cmp(&prev.denom) {
                Ordering::Equal => {
                    return Err(SdkError::InvalidCoins(format!(
                        "duplicate denomination {}",
                        coin.denom
                    )))
                }
                Ordering::Less => {
                    return Err(SdkError::InvalidCoins(format!(
                        "denomination {} is not sorted",
                        coin.denom
                    )))
                }
                Ordering::Greater => {}
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

/// A canonical collection of coins: sorted by denomination, without
/// duplicates, and without zero or negative amounts
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Coin>", into = "Vec<Coin>")]
pub struct Coins(Vec<Coin>);

impl Coins {
    /// Build canonical coins from any sequence. Repeated denoms are summed
    /// and zero amounts are dropped.
    pub fn new(coins: impl IntoIterator<Item = Coin>) -> Result<Self> {
        let mut coins: Vec<Coin> = coins.into_iter().collect();
        for coin in &coins {
            coin.validate()?;
        }
        coins.sort_by(|a, b| a.denom.cmp(&b.denom));

        let mut merged: Vec<Coin> = Vec::with_capacity(coins.len());
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

    /// Create an empty Coins collection
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Coin> {
        self.0.iter()
    }

    /// Get coins as slice
    pub fn as_slice(&self) -> &[Coin] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<Coin> {
        self.0
    }

    pub fn denoms(&self) -> Vec<&str> {
        self.0.iter().map(|c| c.denom.as_str()).collect()
    }

    /// Re-check the canonical rules, e.g. after the denom pattern changed
    pub fn validate(&self) -> Result<()> {
        validate_coins(&self.0)
    }

    pub fn add(&self, other: &Coins) -> Result<Coins> {
        let sum = merge_add(&self.0, &other.0)?;
        assert!(is_strictly_sorted(&sum), "coins merge produced unsorted output");
        Ok(Coins(sum))
    }

    pub fn add_coin(&self, coin: &Coin) -> Result<Coins> {
        self.add(&Coins::new([coin.clone()])?)
    }

    /// Pointwise difference; fails if any amount would become negative
    pub fn sub(&self, other: &Coins) -> Result<Coins> {
        let (diff, has_neg) = self.safe_sub(other)?;
        if has_neg {
            let negatives: Vec<String> = diff
                .iter()
                .filter(|c| c.is_negative())
                .map(|c| c.to_string())
                .collect();
            return Err(SdkError::NegativeCoin(negatives.join(",")));
        }
        Ok(Coins(diff))
    }

    /// Pointwise difference as raw coins, which may hold negative amounts,
    /// and whether any did
    pub fn safe_sub(&self, other: &Coins) -> Result<(Vec<Coin>, bool)> {
        let diff = merge_add(&self.0, &negated(&other.0))?;
        let has_neg = diff.iter().any(Coin::is_negative);
        Ok((diff, has_neg))
    }

    /// Amount held for `denom`, zero when absent
    pub fn amount_of(&self, denom: &str) -> Int {
        self.0
            .binary_search_by(|c| c.denom.as_str().cmp(denom))
            .map(|i| self.0[i].amount.clone())
            .unwrap_or_else(|_| Int::zero())
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(Coin::is_zero)
    }

    pub fn is_all_positive(&self) -> bool {
        !self.0.is_empty() && self.0.iter().all(Coin::is_positive)
    }

    pub fn is_any_negative(&self) -> bool {
        self.0.iter().any(Coin::is_negative)
    }

    pub fn is_any_nil(&self) -> bool {
        self.0.iter().any(Coin::is_nil)
    }

    pub fn is_equal(&self, other: &Coins) -> bool {
        self == other
    }

    /// Every denom held here is also held by `other`
    pub fn denoms_subset_of(&self, other: &Coins) -> bool {
        if self.len() > other.len() {
            return false;
        }
        self.0.iter().all(|c| !other.amount_of(&c.denom).is_zero())
    }

    /// Strictly more of every denom in `other`, all of which must be held here
    pub fn is_all_gt(&self, other: &Coins) -> bool {
        if self.is_empty() {
            return false;
        }
        if other.is_empty() {
            return true;
        }
        if !other.denoms_subset_of(self) {
            return false;
        }
        other
            .iter()
            .all(|c| self.amount_of(&c.denom) > c.amount)
    }

    /// At least as much of every denom in `other`
    pub fn is_all_gte(&self, other: &Coins) -> bool {
        if other.is_empty() {
            return true;
        }
        if self.is_empty() {
            return false;
        }
        other
            .iter()
            .all(|c| self.amount_of(&c.denom) >= c.amount)
    }

    pub fn is_all_lt(&self, other: &Coins) -> bool {
        other.is_all_gt(self)
    }

    pub fn is_all_lte(&self, other: &Coins) -> bool {
        other.is_all_gte(self)
    }

    /// Strictly more on some denom that `other` also holds
    pub fn is_any_gt(&self, other: &Coins) -> bool {
        if other.is_empty() {
            return false;
        }
        self.iter().any(|c| {
            let theirs = other.amount_of(&c.denom);
            !theirs.is_zero() && c.amount > theirs
        })
    }

    /// At least as much on some denom in `other`
    pub fn is_any_gte(&self, other: &Coins) -> bool {
        if other.is_empty() {
            return false;
        }
        other
            .iter()
            .any(|c| self.amount_of(&c.denom) >= c.amount)
    }

    /// Pointwise maximum over the union of denoms
    pub fn max(&self, other: &Coins) -> Coins {
        Coins(merge_with(
            &self.0,
            &other.0,
            |a: &Int, b: &Int| Some(std::cmp::max(a, b).clone()),
            Some,
        ))
    }

    /// Pointwise minimum over the denoms both hold
    pub fn min(&self, other: &Coins) -> Coins {
        Coins(merge_with(
            &self.0,
            &other.0,
            |a: &Int, b: &Int| Some(std::cmp::min(a, b).clone()),
            |_: Int| None,
        ))
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: Vec<String> = self.0.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", s.join(","))
    }
}

impl FromStr for Coins {
    type Err = SdkError;

    /// Parses a comma-separated list such as `"10uatom, 5uosmo"`. Zero
    /// amounts are dropped; repeating a denom is an error.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Coins::empty());
        }
        let mut builder = CoinsBuilder::new();
        for part in s.split(',') {
            let coin: Coin = part.parse()?;
            if !coin.is_zero() {
                builder.push(coin);
            }
        }
        builder.sort().build()
    }
}

impl TryFrom<Vec<Coin>> for Coins {
    type Error = SdkError;

    /// Accepts only coins already in canonical form
    fn try_from(coins: Vec<Coin>) -> Result<Self> {
        CoinsBuilder::from(coins).build()
    }
}

impl From<Coins> for Vec<Coin> {
    fn from(coins: Coins) -> Self {
        coins.0
    }
}

impl<'a> IntoIterator for &'a Coins {
    type Item = &'a Coin;
    type IntoIter = std::slice::Iter<'a, Coin>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Mutable staging area for coins that are not yet canonical
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CoinsBuilder(Vec<Coin>);

impl CoinsBuilder {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, coin: Coin) -> &mut Self {
        self.0.push(coin);
        self
    }

    /// Sort by denomination
    pub fn sort(&mut self) -> &mut Self {
        self.0.sort_by(|a, b| a.denom.cmp(&b.denom));
        self
    }

    /// Fails with `InvalidCoins` unless the coins are strictly sorted,
    /// positive and carry valid denoms
    pub fn validate(&self) -> Result<()> {
        validate_coins(&self.0)
    }

    pub fn build(&mut self) -> Result<Coins> {
        self.validate()?;
        Ok(Coins(std::mem::take(&mut self.0)))
    }
}

impl From<Vec<Coin>> for CoinsBuilder {
    fn from(coins: Vec<Coin>) -> Self {
        Self(coins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn coin(denom: &str, amount: i64) -> Coin {
        Coin {
            denom: denom.to_string(),
            amount: Int::new(amount),
        }
    }

    fn coins(s: &str) -> Coins {
        s.parse().unwrap()
    }

    #[test]
    fn test_coin_new() {
        assert!(Coin::new_i64("uatom", 10).is_ok());
        assert!(Coin::new_i64("uatom", 0).is_ok());
        assert!(matches!(
            Coin::new_i64("uatom", -1),
            Err(SdkError::InvalidCoin(_))
        ));
        assert_eq!(
            Coin::new_i64("1atom", 1),
            Err(SdkError::InvalidCoin("invalid denom: 1atom".to_string()))
        );
        assert!(Coin::new_i64("ibc/7F1D3FCF4AE79E1554D670D1AD949A9BA4E4A3C76C63093E17E446A46061A7A2", 1).is_ok());
    }

    #[test]
    fn test_coin_predicates() {
        assert!(Coin::default().is_nil());
        assert!(!coin("uatom", 0).is_nil());
        assert!(coin("uatom", 0).is_zero());
        assert!(coin("uatom", 3).is_positive());
        assert!(coin("uatom", -3).is_negative());
        assert!(!coin("uatom", -3).is_valid());
        assert!(!coin("a", 3).is_valid());
    }

    #[test]
    fn test_coin_arithmetic() {
        let a = coin("uatom", 10);
        let b = coin("uatom", 4);
        assert_eq!(a.add(&b).unwrap(), coin("uatom", 14));
        assert_eq!(a.sub(&b).unwrap(), coin("uatom", 6));
        assert_eq!(
            b.sub(&a),
            Err(SdkError::NegativeCoin("-6uatom".to_string()))
        );
        assert_eq!(
            a.add(&coin("uosmo", 1)),
            Err(SdkError::DenomMismatch("uatom".into(), "uosmo".into()))
        );
        assert!(a.is_gte(&b).unwrap());
        assert!(b.is_lt(&a).unwrap());
        assert!(!a.is_equal(&b).unwrap());
        assert!(a.is_equal(&coin("uatom", 10)).unwrap());
        assert!(a.is_equal(&coin("uosmo", 10)).is_err());
    }

    #[test]
    fn test_parse_coin() {
        assert_eq!("10uatom".parse::<Coin>().unwrap(), coin("uatom", 10));
        assert_eq!("  7 uosmo ".parse::<Coin>().unwrap(), coin("uosmo", 7));
        assert_eq!("0stake".parse::<Coin>().unwrap(), coin("stake", 0));
        for bad in ["", "uatom", "10", "-1uatom", "1.5uatom", "10 u atom"] {
            assert!(bad.parse::<Coin>().is_err(), "{bad:?}");
        }
        assert!(matches!(
            "5 1atom".parse::<Coin>(),
            Err(SdkError::InvalidCoin(_))
        ));
        let overflow = format!("{}uatom", "9".repeat(80));
        assert!(matches!(overflow.parse::<Coin>(), Err(SdkError::Math(_))));
    }

    #[test]
    fn test_coins_new_canonicalizes() {
        let c = Coins::new(vec![
            coin("uosmo", 5),
            coin("uatom", 0),
            coin("stake", 2),
            coin("uosmo", 3),
        ])
        .unwrap();
        assert_eq!(c.as_slice(), &[coin("stake", 2), coin("uosmo", 8)]);
        assert!(c.validate().is_ok());

        assert!(matches!(
            Coins::new(vec![coin("uatom", -1)]),
            Err(SdkError::InvalidCoin(_))
        ));
        assert!(matches!(
            Coins::new(vec![coin("!!", 1)]),
            Err(SdkError::InvalidCoin(_))
        ));
        assert_eq!(Coins::new(Vec::new()).unwrap(), Coins::empty());
    }

    #[test]
    fn test_validate_rejects_non_canonical() {
        let unsorted = CoinsBuilder::from(vec![coin("btc", 1), coin("atom", 2)]);
        assert!(matches!(unsorted.validate(), Err(SdkError::InvalidCoins(_))));

        let duplicate = CoinsBuilder::from(vec![coin("atom", 2), coin("atom", 1)]);
        assert!(matches!(duplicate.validate(), Err(SdkError::InvalidCoins(_))));

        let zero = CoinsBuilder::from(vec![coin("atom", 0)]);
        assert!(matches!(zero.validate(), Err(SdkError::InvalidCoins(_))));

        let negative = CoinsBuilder::from(vec![coin("atom", 1), coin("btc", -1)]);
        assert!(matches!(negative.validate(), Err(SdkError::InvalidCoins(_))));

        let bad_denom = CoinsBuilder::from(vec![coin("a", 1)]);
        assert!(matches!(bad_denom.validate(), Err(SdkError::InvalidCoins(_))));

        assert!(CoinsBuilder::new().validate().is_ok());
        let mut sorted = CoinsBuilder::from(vec![coin("btc", 1), coin("atom", 2)]);
        let built = sorted.sort().build().unwrap();
        assert_eq!(built.to_string(), "2atom,1btc");
    }

    #[test]
    fn test_add_sub_round_trip() {
        let a = coins("100uatom,50uosmo");
        let b = coins("25uatom");
        let sum = a.add(&b).unwrap();
        assert_eq!(sum.to_string(), "125uatom,50uosmo");
        assert_eq!(sum.sub(&b).unwrap().to_string(), "100uatom,50uosmo");
    }

    #[test]
    fn test_add_drops_zero_and_merges() {
        let a = coins("1aaa,2ccc");
        let b = coins("3bbb,4ccc,5ddd");
        assert_eq!(a.add(&b).unwrap().to_string(), "1aaa,3bbb,6ccc,5ddd");
        assert_eq!(a.add(&Coins::empty()).unwrap(), a);
        assert_eq!(Coins::empty().add(&a).unwrap(), a);
        assert_eq!(
            a.add_coin(&coin("bbb", 1)).unwrap().to_string(),
            "1aaa,1bbb,2ccc"
        );
        assert_eq!(a.add_coin(&coin("bbb", 0)).unwrap(), a);
    }

    #[test]
    fn test_sub() {
        let a = coins("10aaa,5bbb");
        assert_eq!(a.sub(&coins("10aaa")).unwrap().to_string(), "5bbb");
        assert_eq!(a.sub(&a).unwrap(), Coins::empty());
        assert_eq!(
            a.sub(&coins("11aaa")),
            Err(SdkError::NegativeCoin("-1aaa".to_string()))
        );
        assert_eq!(
            a.sub(&coins("1ccc")),
            Err(SdkError::NegativeCoin("-1ccc".to_string()))
        );

        let (diff, has_neg) = a.safe_sub(&coins("1ccc,6bbb")).unwrap();
        assert!(has_neg);
        assert_eq!(diff, vec![coin("aaa", 10), coin("bbb", -1), coin("ccc", -1)]);
    }

    #[test]
    fn test_amount_of() {
        let c = coins("1aaa,2bbb,3ccc,4ddd");
        assert_eq!(c.amount_of("aaa"), Int::new(1));
        assert_eq!(c.amount_of("ccc"), Int::new(3));
        assert_eq!(c.amount_of("ddd"), Int::new(4));
        assert_eq!(c.amount_of("eee"), Int::zero());
        assert_eq!(Coins::empty().amount_of("aaa"), Int::zero());
    }

    #[test]
    fn test_partial_orders() {
        let empty = Coins::empty();
        let one = coins("1aaa");
        let two = coins("2aaa");
        let both = coins("2aaa,2bbb");
        let other = coins("1bbb");

        assert!(one.is_all_gte(&one));
        assert!(!one.is_all_gt(&one));
        assert!(two.is_all_gt(&one));
        assert!(!one.is_all_gt(&two));
        assert!(!one.is_all_gt(&other));
        assert!(both.is_all_gt(&one));
        assert!(one.is_all_gt(&empty));
        assert!(!empty.is_all_gt(&empty));
        assert!(empty.is_all_gte(&empty));
        assert!(!empty.is_all_gte(&one));
        assert!(one.is_all_lt(&two));
        assert!(one.is_all_lte(&one));
        assert!(!two.is_all_lte(&one));

        assert!(both.is_any_gt(&one));
        assert!(!one.is_any_gt(&other));
        assert!(!one.is_any_gt(&empty));
        assert!(both.is_any_gte(&coins("2bbb,9ccc")));
        assert!(!one.is_any_gte(&coins("2aaa,1bbb")));
        assert!(!one.is_any_gte(&empty));
    }

    #[test]
    fn test_predicates_and_subsets() {
        let c = coins("1aaa,2bbb");
        assert!(c.is_all_positive());
        assert!(!Coins::empty().is_all_positive());
        assert!(!c.is_any_negative());
        assert!(!c.is_any_nil());
        assert!(Coins::empty().is_zero());
        assert!(!c.is_zero());
        assert!(c.is_equal(&coins("2bbb,1aaa")));
        assert!(!c.is_equal(&coins("1aaa")));
        assert!(coins("1aaa").denoms_subset_of(&c));
        assert!(!coins("1ccc").denoms_subset_of(&c));
        assert_eq!(c.denoms(), vec!["aaa", "bbb"]);
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn test_max_min() {
        let a = coins("1aaa,5bbb");
        let b = coins("3aaa,2ccc");
        assert_eq!(a.max(&b).to_string(), "3aaa,5bbb,2ccc");
        assert_eq!(a.min(&b).to_string(), "1aaa");
    }

    #[test]
    fn test_parse_coins() {
        assert_eq!(coins("").to_string(), "");
        assert_eq!(coins("  ").to_string(), "");
        assert_eq!(coins("5uosmo, 10uatom").to_string(), "10uatom,5uosmo");
        assert_eq!(coins("0uatom,3stake").to_string(), "3stake");
        assert!(matches!(
            "1uatom,2uatom".parse::<Coins>(),
            Err(SdkError::InvalidCoins(_))
        ));
        assert!("1uatom,,2uosmo".parse::<Coins>().is_err());
        assert!("1uatom;2uosmo".parse::<Coins>().is_err());
    }

    #[test]
    fn test_coins_json() {
        let c = coins("10uatom,5uosmo");
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(
            json,
            r#"[{"denom":"uatom","amount":"10"},{"denom":"uosmo","amount":"5"}]"#
        );
        assert_eq!(serde_json::from_str::<Coins>(&json).unwrap(), c);
        assert_eq!(serde_json::to_string(&Coins::empty()).unwrap(), "[]");

        let unsorted = r#"[{"denom":"uosmo","amount":"5"},{"denom":"uatom","amount":"10"}]"#;
        assert!(serde_json::from_str::<Coins>(unsorted).is_err());
    }

    #[test]
    fn test_coin_json_validates() {
        let ok: Coin = serde_json::from_str(r#"{"denom":"uatom","amount":"0"}"#).unwrap();
        assert_eq!(ok, coin("uatom", 0));

        for bad in [
            r#"{"denom":"1!","amount":"5"}"#,
            r#"{"denom":"uatom","amount":"-5"}"#,
            r#"{"denom":"1!","amount":"-5"}"#,
        ] {
            assert!(serde_json::from_str::<Coin>(bad).is_err(), "{bad}");
        }
    }

    fn arb_coins() -> impl Strategy<Value = Coins> {
        prop::collection::vec(
            (prop::sample::select(vec!["aaa", "bbb", "ccc", "ddd"]), 0i64..1_000_000),
            0..6,
        )
        .prop_map(|items| {
            Coins::new(items.into_iter().map(|(d, a)| coin(d, a))).unwrap()
        })
    }

    proptest! {
        #[test]
        fn prop_new_is_canonical(c in arb_coins()) {
            prop_assert!(c.validate().is_ok());
        }

        #[test]
        fn prop_add_laws(a in arb_coins(), b in arb_coins(), c in arb_coins()) {
            prop_assert_eq!(a.add(&b).unwrap(), b.add(&a).unwrap());
            let left = a.add(&b).unwrap().add(&c).unwrap();
            let right = a.add(&b.add(&c).unwrap()).unwrap();
            prop_assert_eq!(left, right);
            prop_assert_eq!(a.add(&b).unwrap().sub(&b).unwrap(), a.clone());
        }

        #[test]
        fn prop_amount_of_additive(a in arb_coins(), b in arb_coins()) {
            let sum = a.add(&b).unwrap();
            for denom in ["aaa", "bbb", "ccc", "ddd"] {
                let expected = a.amount_of(denom).checked_add(&b.amount_of(denom)).unwrap();
                prop_assert_eq!(sum.amount_of(denom), expected);
            }
        }

        #[test]
        fn prop_orders_reflexive(a in arb_coins()) {
            prop_assert!(a.is_all_gte(&a));
            prop_assert!(!a.is_all_gt(&a));
        }

        #[test]
        fn prop_text_and_json_round_trip(a in arb_coins()) {
            prop_assert_eq!(a.to_string().parse::<Coins>().unwrap(), a.clone());
            let json = serde_json::to_string(&a).unwrap();
            prop_assert_eq!(serde_json::from_str::<Coins>(&json).unwrap(), a);
        }
    }
}
