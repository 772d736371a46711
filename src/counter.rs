//! Insertion-ordered tallies of terms
//!
//! Counts (or summed weights) are kept in first-seen order so that `most_common` can break ties
//! by insertion order with a stable sort.
use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;
use std::iter::FromIterator;
use std::ops::AddAssign;

use crate::farm::{new_farm, FarmMap};

/// Anything that can be tallied: integer counts or floating point weights
pub trait Count: Copy + Default + PartialOrd + AddAssign {
    fn one() -> Self;
}

impl Count for u64 {
    fn one() -> Self { 1 }
}
impl Count for usize {
    fn one() -> Self { 1 }
}
impl Count for f64 {
    fn one() -> Self { 1.0 }
}

#[derive(Clone)]
pub struct Counter<K, V = u64> {
    index: FarmMap<K, usize>,
    entries: Vec<(K, V)>,
}

impl<K: Hash + Eq + Clone, V: Count> Counter<K, V> {
    pub fn new() -> Self {
        Counter {
            index: new_farm(),
            entries: vec![],
        }
    }

    /// Add `amount` to the tally of `key`, inserting it at the end if unseen
    pub fn add(&mut self, key: K, amount: V) {
        match self.index.get(&key) {
            Some(&slot) => self.entries[slot].1 += amount,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, amount));
            }
        }
    }

    pub fn increment(&mut self, key: K) {
        self.add(key, V::one());
    }

    /// Fold in another set of (key, amount) pairs, like `Counter.update(dict)`
    pub fn update<I: IntoIterator<Item = (K, V)>>(&mut self, pairs: I) {
        for (key, amount) in pairs {
            self.add(key, amount);
        }
    }

    /// The tally for a key, zero when absent
    pub fn get(&self, key: &K) -> V {
        self.index
            .get(key)
            .map(|&slot| self.entries[slot].1)
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all tallies
    pub fn total(&self) -> V {
        let mut sum = V::default();
        for &(_, v) in &self.entries {
            sum += v;
        }
        sum
    }

    /// Entries in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&K, V)> {
        self.entries.iter().map(|(k, v)| (k, *v))
    }

    /// The `n` largest tallies (all of them if `None`), largest first.
    ///
    /// Equal tallies keep the order in which their keys were first seen.
    pub fn most_common(&self, n: Option<usize>) -> Vec<(K, V)> {
        let mut ranked = self.entries.clone();
        // sort_by is stable, which is what keeps ties in insertion order
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        if let Some(n) = n {
            ranked.truncate(n);
        }
        ranked
    }
}

impl<K: Hash + Eq + Clone, V: Count> Default for Counter<K, V> {
    fn default() -> Self {
        Counter::new()
    }
}

impl<K: Hash + Eq + Clone, V: Count> Extend<K> for Counter<K, V> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, keys: I) {
        for key in keys {
            self.increment(key);
        }
    }
}

impl<K: Hash + Eq + Clone, V: Count> FromIterator<K> for Counter<K, V> {
    fn from_iter<I: IntoIterator<Item = K>>(keys: I) -> Self {
        let mut counter = Counter::new();
        counter.extend(keys);
        counter
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Counter<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("Counter(")?;
        f.debug_map()
            .entries(self.entries.iter().map(|(k, v)| (k, v)))
            .finish()?;
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_equals_number_of_items() {
        let lemmas = vec!["a", "b", "a", "c", "a", "b"];
        let counter: Counter<&str> = lemmas.iter().cloned().collect();
        assert_eq!(counter.total(), lemmas.len() as u64);
        assert_eq!(counter.get(&"a"), 3);
        assert_eq!(counter.get(&"z"), 0);
    }

    #[test]
    fn most_common_is_bounded_and_descending() {
        let counter: Counter<char> = "mississippi".chars().collect();
        for k in 0..6 {
            let top = counter.most_common(Some(k));
            assert!(top.len() <= k);
            for pair in top.windows(2) {
                assert!(pair[0].1 >= pair[1].1);
            }
        }
        assert_eq!(counter.most_common(None).len(), 4);
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let counter: Counter<&str> = vec!["b", "a", "a", "b", "c"].into_iter().collect();
        assert_eq!(counter.most_common(Some(2)), vec![("b", 2), ("a", 2)]);
    }

    #[test]
    fn weights_accumulate() {
        let mut weights: Counter<String, f64> = Counter::new();
        weights.update(vec![("wage".to_string(), 0.5), ("job".to_string(), 0.25)]);
        weights.update(vec![("job".to_string(), 0.5)]);
        assert_eq!(weights.most_common(Some(1)), vec![("job".to_string(), 0.75)]);
        assert!((weights.total() - 1.25).abs() < 1e-12);
    }
}
