//! Memoized selectors
//!
//! A selector is a pure projection over state. [`Memo`] remembers the last
//! input key and the value computed for it, so repeated renders over an
//! unchanged state reuse the previous result.
//!
//! Keys should be cheap to compare: a revision counter bumped whenever the
//! source collection changes works well.
//!
//! # Example
//!
//! ```
//! use tidy_core::selector::Memo;
//!
//! let items = vec![1, 2, 3, 4];
//! let revision = 1_u64;
//!
//! let mut evens = Memo::new();
//! let first = *evens.get_or_compute(revision, || items.iter().filter(|n| *n % 2 == 0).count());
//! let second = *evens.get_or_compute(revision, || unreachable!());
//!
//! assert_eq!(first, 2);
//! assert_eq!(second, 2);
//! assert_eq!(evens.hits(), 1);
//! assert_eq!(evens.misses(), 1);
//! ```

/// Single-entry memoization cache keyed by the selector's inputs
#[derive(Debug, Clone)]
pub struct Memo<K, V> {
    entry: Option<(K, V)>,
    hits: u64,
    misses: u64,
}

impl<K, V> Memo<K, V>
where
    K: PartialEq,
{
    /// Create an empty cache
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entry: None,
            hits: 0,
            misses: 0,
        }
    }

    /// Return the cached value for `key`, computing it with `compute` on a miss
    pub fn get_or_compute<F>(&mut self, key: K, compute: F) -> &V
    where
        F: FnOnce() -> V,
    {
        let fresh = matches!(&self.entry, Some((cached, _)) if *cached == key);

        if fresh {
            self.hits += 1;
        } else {
            self.misses += 1;
            self.entry = None;
        }

        let (_, value) = self.entry.get_or_insert_with(|| (key, compute()));
        value
    }

    /// Drop the cached entry so the next lookup recomputes
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    /// Number of lookups served from the cache
    #[must_use]
    pub const fn hits(&self) -> u64 {
        self.hits
    }

    /// Number of lookups that had to recompute
    #[must_use]
    pub const fn misses(&self) -> u64 {
        self.misses
    }
}

impl<K, V> Default for Memo<K, V>
where
    K: PartialEq,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn recomputes_only_when_key_changes() {
        let mut memo: Memo<(u64, bool), Vec<u32>> = Memo::new();
        let mut calls = 0;

        let mut lookup = |memo: &mut Memo<(u64, bool), Vec<u32>>, key| {
            memo.get_or_compute(key, || {
                calls += 1;
                vec![1, 2]
            })
            .len()
        };

        assert_eq!(lookup(&mut memo, (1, true)), 2);
        assert_eq!(lookup(&mut memo, (1, true)), 2);
        assert_eq!(lookup(&mut memo, (1, false)), 2);
        assert_eq!(lookup(&mut memo, (2, false)), 2);

        assert_eq!(calls, 3);
        assert_eq!(memo.hits(), 1);
        assert_eq!(memo.misses(), 3);
    }

    #[test]
    fn invalidate_forces_recompute() {
        let mut memo = Memo::new();
        let _ = memo.get_or_compute(1_u8, || "a");
        memo.invalidate();
        let value = *memo.get_or_compute(1_u8, || "b");

        assert_eq!(value, "b");
        assert_eq!(memo.misses(), 2);
        assert_eq!(memo.hits(), 0);
    }

    proptest! {
        #[test]
        fn always_returns_value_for_current_key(keys in proptest::collection::vec(0_u8..4, 1..40)) {
            let mut memo = Memo::new();
            let mut computed = 0_u64;

            for key in &keys {
                let value = *memo.get_or_compute(*key, || {
                    computed += 1;
                    u32::from(*key) * 10
                });
                prop_assert_eq!(value, u32::from(*key) * 10);
            }

            prop_assert_eq!(memo.misses(), computed);
            prop_assert_eq!(memo.hits() + memo.misses(), keys.len() as u64);
        }
    }
}
