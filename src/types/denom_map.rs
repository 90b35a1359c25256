use std::collections::{btree_map, BTreeMap};

use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};

use crate::helpers::math;

/// Amount per denomination. A missing key reads as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DenomMap(BTreeMap<String, BigDecimal>);

impl DenomMap {
    pub fn new() -> Self {
        DenomMap(BTreeMap::new())
    }

    pub fn add(&mut self, denom: &str, amount: &BigDecimal) {
        match self.0.get_mut(denom) {
            Some(value) => *value = math::plus(value, amount),
            None => {
                self.0.insert(denom.to_owned(), amount.clone());
            },
        }
    }

    /// Denomination-wise addition of `other` into `self`.
    pub fn merge(&mut self, other: &DenomMap) {
        for (denom, amount) in &other.0 {
            self.add(denom, amount);
        }
    }

    pub fn merged(mut self, other: &DenomMap) -> DenomMap {
        self.merge(other);
        self
    }

    pub fn get(&self, denom: &str) -> Option<&BigDecimal> {
        self.0.get(denom)
    }

    pub fn get_or_zero(&self, denom: &str) -> BigDecimal {
        self.0.get(denom).cloned().unwrap_or_else(BigDecimal::zero)
    }

    pub fn insert(&mut self, denom: String, amount: BigDecimal) {
        self.0.insert(denom, amount);
    }

    pub fn keys(&self) -> btree_map::Keys<'_, String, BigDecimal> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, BigDecimal)> for DenomMap {
    fn from_iter<I: IntoIterator<Item = (String, BigDecimal)>>(
        iter: I,
    ) -> Self {
        let mut map = DenomMap::new();
        for (denom, amount) in iter {
            map.add(&denom, &amount);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(items: &[(&str, &str)]) -> DenomMap {
        items
            .iter()
            .map(|(denom, amount)| {
                (denom.to_string(), math::parse(amount).unwrap())
            })
            .collect()
    }

    #[test]
    fn test_merge_is_commutative() {
        let a = map(&[("uluna", "100"), ("uusd", "5")]);
        let b = map(&[("uusd", "7"), ("ukrw", "1000")]);

        assert_eq!(a.clone().merged(&b), b.clone().merged(&a));
        assert_eq!(
            a.merged(&b),
            map(&[("uluna", "100"), ("uusd", "12"), ("ukrw", "1000")])
        );
    }

    #[test]
    fn test_merge_is_associative() {
        let a = map(&[("uluna", "1")]);
        let b = map(&[("uluna", "2"), ("uusd", "3")]);
        let c = map(&[("uusd", "4.5")]);

        let left = a.clone().merged(&b).merged(&c);
        let right = a.merged(&b.merged(&c));
        assert_eq!(left, right);
    }

    #[test]
    fn test_absent_denom_reads_zero() {
        let a = map(&[("uluna", "1")]);
        assert_eq!(a.get_or_zero("uusd"), BigDecimal::zero());
        assert!(a.get("uusd").is_none());
    }

    #[test]
    fn test_from_iter_sums_duplicates() {
        let a = map(&[("uusd", "1"), ("uusd", "2")]);
        assert_eq!(a.len(), 1);
        assert_eq!(math::format(&a.get_or_zero("uusd")), "3");
    }

    #[test]
    fn test_deserialize_from_strings() {
        let a: DenomMap =
            serde_json::from_str(r#"{"uluna":"100","uusd":"0.5"}"#).unwrap();
        assert_eq!(a, map(&[("uluna", "100"), ("uusd", "0.5")]));
    }
}
