//! Defines partitioners for distributing data in a shuffle.

use std::collections::hash_map::DefaultHasher;
use std::fmt::Debug;
use std::hash::{Hash, Hasher};

/// Assigns every key to one of a fixed number of reduce partitions.
///
/// All records sharing a key must land in the same partition, which is what
/// lets a reduce task join or aggregate its keys without seeing the others.
pub trait Partitioner<K: ?Sized>: Send + Sync + Debug {
    fn num_partitions(&self) -> u32;

    fn get_partition(&self, key: &K) -> u32;
}

/// A partitioner that uses the hash of the key to distribute data.
///
/// `DefaultHasher::new()` is unkeyed, so the same key maps to the same
/// partition in every run.
#[derive(Clone, Debug)]
pub struct HashPartitioner {
    num_partitions: u32,
    seed: u64,
}

impl HashPartitioner {
    pub fn new(num_partitions: u32) -> Self {
        assert!(num_partitions > 0, "Number of partitions must be positive.");
        Self {
            num_partitions,
            seed: 0,
        }
    }

    pub fn with_seed(num_partitions: u32, seed: u64) -> Self {
        assert!(num_partitions > 0, "Number of partitions must be positive.");
        Self {
            num_partitions,
            seed,
        }
    }
}

impl<K: Hash + ?Sized> Partitioner<K> for HashPartitioner {
    fn num_partitions(&self) -> u32 {
        self.num_partitions
    }

    fn get_partition(&self, key: &K) -> u32 {
        let mut s = DefaultHasher::new();
        self.seed.hash(&mut s);
        key.hash(&mut s);
        (s.finish() % self.num_partitions as u64) as u32
    }
}
