//! Sorted two-finger merge shared by `Coins` and `DecCoins`

use crate::coin::Coin;
use crate::dec_coin::DecCoin;
use crate::error::Result;
use abacus_math::{Dec, Int, MathError};
use std::cmp::Ordering;

/// Amount arithmetic the merge needs
pub(crate) trait CoinAmount: Clone {
    fn checked_add(&self, other: &Self) -> std::result::Result<Self, MathError>;
    fn is_zero(&self) -> bool;
    fn negate(&self) -> Self;
}

impl CoinAmount for Int {
    fn checked_add(&self, other: &Self) -> std::result::Result<Self, MathError> {
        Int::checked_add(self, other)
    }

    fn is_zero(&self) -> bool {
        Int::is_zero(self)
    }

    fn negate(&self) -> Self {
        -self
    }
}

impl CoinAmount for Dec {
    fn checked_add(&self, other: &Self) -> std::result::Result<Self, MathError> {
        Dec::checked_add(self, other)
    }

    fn is_zero(&self) -> bool {
        Dec::is_zero(self)
    }

    fn negate(&self) -> Self {
        -self
    }
}

/// A denom paired with an amount
pub(crate) trait DenomCoin: Sized {
    type Amount: CoinAmount;

    fn denom(&self) -> &str;
    fn amount(&self) -> &Self::Amount;
    fn from_parts(denom: &str, amount: Self::Amount) -> Self;
}

impl DenomCoin for Coin {
    type Amount = Int;

    fn denom(&self) -> &str {
        &self.denom
    }

    fn amount(&self) -> &Int {
        &self.amount
    }

    fn from_parts(denom: &str, amount: Int) -> Self {
        Coin {
            denom: denom.to_string(),
            amount,
        }
    }
}

impl DenomCoin for DecCoin {
    type Amount = Dec;

    fn denom(&self) -> &str {
        &self.denom
    }

    fn amount(&self) -> &Dec {
        &self.amount
    }

    fn from_parts(denom: &str, amount: Dec) -> Self {
        DecCoin {
            denom: denom.to_string(),
            amount,
        }
    }
}

// Merge two denom-sorted slices. `both` decides the amount for shared denoms
// and `one` for denoms present on a single side; `None` drops the entry.
pub(crate) fn merge_with<C, B, O>(a: &[C], b: &[C], mut both: B, mut one: O) -> Vec<C>
where
    C: DenomCoin,
    B: FnMut(&C::Amount, &C::Amount) -> Option<C::Amount>,
    O: FnMut(C::Amount) -> Option<C::Amount>,
{
    let mut out = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    let push = |out: &mut Vec<C>, denom: &str, amount: Option<C::Amount>| {
        if let Some(amount) = amount {
            out.push(C::from_parts(denom, amount));
        }
    };
    while i < a.len() && j < b.len() {
        match a[i].denom().cmp(b[j].denom()) {
            Ordering::Less => {
                push(&mut out, a[i].denom(), one(a[i].amount().clone()));
                i += 1;
            }
            Ordering::Greater => {
                push(&mut out, b[j].denom(), one(b[j].amount().clone()));
                j += 1;
            }
            Ordering::Equal => {
                push(&mut out, a[i].denom(), both(a[i].amount(), b[j].amount()));
                i += 1;
                j += 1;
            }
        }
    }
    for c in a[i..].iter().chain(&b[j..]) {
        push(&mut out, c.denom(), one(c.amount().clone()));
    }
    out
}

/// Sum shared denoms and drop zero results
pub(crate) fn merge_add<C: DenomCoin>(a: &[C], b: &[C]) -> Result<Vec<C>> {
    let mut overflow = None;
    let sum = merge_with(
        a,
        b,
        |x: &C::Amount, y: &C::Amount| match x.checked_add(y) {
            Ok(s) if s.is_zero() => None,
            Ok(s) => Some(s),
            Err(e) => {
                overflow.get_or_insert(e);
                None
            }
        },
        |x: C::Amount| if x.is_zero() { None } else { Some(x) },
    );
    match overflow {
        Some(e) => Err(e.into()),
        None => Ok(sum),
    }
}

pub(crate) fn negated<C: DenomCoin>(coins: &[C]) -> Vec<C> {
    coins
        .iter()
        .map(|c| C::from_parts(c.denom(), c.amount().negate()))
        .collect()
}

pub(crate) fn is_strictly_sorted<C: DenomCoin>(coins: &[C]) -> bool {
    coins.windows(2).all(|w| w[0].denom() < w[1].denom())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coin(denom: &str, amount: i64) -> Coin {
        Coin::from_parts(denom, Int::new(amount))
    }

    fn dec_coin(denom: &str, amount: &str) -> DecCoin {
        DecCoin::from_parts(denom, amount.parse().unwrap())
    }

    #[test]
    fn test_merge_add_int_and_dec() {
        let a = [coin("aaa", 1), coin("ccc", 3)];
        let b = [coin("aaa", -1), coin("bbb", 2)];
        assert_eq!(merge_add(&a, &b).unwrap(), vec![coin("bbb", 2), coin("ccc", 3)]);

        let a = [dec_coin("aaa", "0.5"), dec_coin("ccc", "1")];
        let b = [dec_coin("aaa", "0.25"), dec_coin("bbb", "0")];
        assert_eq!(
            merge_add(&a, &b).unwrap(),
            vec![dec_coin("aaa", "0.75"), dec_coin("ccc", "1")]
        );
    }

    #[test]
    fn test_merge_add_overflow() {
        let max: Int = "57896044618658097711785492504343953926634992332820282019728792003956564819967"
            .parse()
            .unwrap();
        let a = [Coin::from_parts("aaa", max)];
        assert!(matches!(
            merge_add(&a, &a),
            Err(crate::error::SdkError::Math(MathError::Overflow))
        ));
    }

    #[test]
    fn test_negated_and_sorted() {
        let a = [coin("aaa", 1), coin("bbb", -2)];
        assert_eq!(negated(&a), vec![coin("aaa", -1), coin("bbb", 2)]);
        assert!(is_strictly_sorted(&a));
        assert!(!is_strictly_sorted(&[coin("bbb", 1), coin("aaa", 1)]));
        assert!(!is_strictly_sorted(&[coin("aaa", 1), coin("aaa", 2)]));
    }
}
