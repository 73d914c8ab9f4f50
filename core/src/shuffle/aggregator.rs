//! Defines the Aggregator trait for combining values in shuffle operations.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Aggregator trait for combining values for a key.
/// Used by reduce-by-key on both sides of a shuffle: map tasks combine their
/// own values before writing, reduce tasks merge the combiners they read.
///
/// V: Input value type
/// C: Combiner (intermediate/output) type
///
/// `merge_combiners` must be associative and commutative; partitions are
/// merged in no particular order.
pub trait Aggregator<V, C>: Send + Sync + Debug {
    /// Create a combiner from the first value for a key.
    fn create_combiner(&self, v: V) -> C;

    /// Merge a new value into an existing combiner.
    fn merge_value(&self, c: C, v: V) -> C;

    /// Merge two combiners.
    fn merge_combiners(&self, c1: C, c2: C) -> C;
}

/// Sums the values per key
#[derive(Clone, Debug)]
pub struct SumAggregator<V> {
    _phantom: std::marker::PhantomData<V>,
}

impl<V> SumAggregator<V> {
    pub fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<V> Default for SumAggregator<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Aggregator<V, V> for SumAggregator<V>
where
    V: Send + Sync + Debug + std::ops::Add<Output = V>,
{
    fn create_combiner(&self, v: V) -> V {
        v
    }

    fn merge_value(&self, c: V, v: V) -> V {
        c + v
    }

    fn merge_combiners(&self, c1: V, c2: V) -> V {
        c1 + c2
    }
}

/// Combine raw values per key (the map side of reduce-by-key).
pub fn combine_values_by_key<K, V, C, A, I>(aggregator: &A, pairs: I) -> HashMap<K, C>
where
    K: Hash + Eq,
    A: Aggregator<V, C> + ?Sized,
    I: IntoIterator<Item = (K, V)>,
{
    let mut combined: HashMap<K, C> = HashMap::new();
    for (key, value) in pairs {
        let next = match combined.remove(&key) {
            Some(c) => aggregator.merge_value(c, value),
            None => aggregator.create_combiner(value),
        };
        combined.insert(key, next);
    }
    combined
}

/// Merge already-combined values per key (the reduce side of reduce-by-key).
pub fn merge_combiners_by_key<K, V, C, A, I>(aggregator: &A, pairs: I) -> HashMap<K, C>
where
    K: Hash + Eq,
    A: Aggregator<V, C> + ?Sized,
    I: IntoIterator<Item = (K, C)>,
{
    let mut merged: HashMap<K, C> = HashMap::new();
    for (key, combiner) in pairs {
        let next = match merged.remove(&key) {
            Some(c) => aggregator.merge_combiners(c, combiner),
            None => combiner,
        };
        merged.insert(key, next);
    }
    merged
}
