//! Partitioned in-memory collections
//!
//! A `ParallelCollection` splits a sequence of records into contiguous
//! partitions. It is the input side of every partitioned job: map tasks read
//! one partition each and never see the rest of the data.

use crate::traits::{BasicPartition, Data, JobError, JobResult, Partition};
use std::borrow::Cow;
use std::fmt::Debug;

/// A read-only collection split into `num_partitions` contiguous slices.
///
/// The collection either owns its records or borrows them from the caller,
/// so large relations can be partitioned without copying.
#[derive(Clone)]
pub struct ParallelCollection<'a, T: Data> {
    data: Cow<'a, [T]>,
    num_partitions: usize,
}

impl<T: Data> Debug for ParallelCollection<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParallelCollection")
            .field("data_len", &self.data.len())
            .field("num_partitions", &self.num_partitions)
            .finish()
    }
}

impl<'a, T: Data> ParallelCollection<'a, T> {
    /// Create a collection with a single partition
    pub fn new(data: impl Into<Cow<'a, [T]>>) -> Self {
        Self::with_partitions(data, 1)
    }

    /// Create a collection with the specified number of partitions; zero means one.
    pub fn with_partitions(data: impl Into<Cow<'a, [T]>>, num_partitions: usize) -> Self {
        Self {
            data: data.into(),
            num_partitions: num_partitions.max(1),
        }
    }

    /// Records of the given partition.
    pub fn compute(&self, partition: &dyn Partition) -> JobResult<&[T]> {
        let partition_index = partition.index();
        if partition_index >= self.num_partitions {
            return Err(JobError::InvalidPartition(partition_index));
        }

        let data_len = self.data.len();
        let partition_size = data_len.div_ceil(self.num_partitions);
        let start = partition_index * partition_size;
        let end = std::cmp::min(start + partition_size, data_len);

        if start >= data_len {
            Ok(&[])
        } else {
            Ok(&self.data[start..end])
        }
    }

    /// Get the list of partitions for this collection
    pub fn partitions(&self) -> Vec<BasicPartition> {
        (0..self.num_partitions).map(BasicPartition::new).collect()
    }

    pub fn num_partitions(&self) -> usize {
        self.num_partitions
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partitions_cover_all_records() {
        let data: Vec<i32> = (1..=10).collect();
        let collection = ParallelCollection::with_partitions(&data[..], 3);
        assert_eq!(collection.num_partitions(), 3);

        let mut seen = Vec::new();
        for partition in collection.partitions() {
            seen.extend_from_slice(collection.compute(&partition).unwrap());
        }
        assert_eq!(seen, data);
    }

    #[test]
    fn test_more_partitions_than_records() {
        let collection = ParallelCollection::with_partitions(vec![1, 2], 5);
        let sizes: Vec<usize> = collection
            .partitions()
            .iter()
            .map(|p| collection.compute(p).unwrap().len())
            .collect();
        assert_eq!(sizes, vec![1, 1, 0, 0, 0]);
    }

    #[test]
    fn test_zero_partitions_means_one() {
        let collection = ParallelCollection::with_partitions(vec!["a".to_string()], 0);
        assert_eq!(collection.num_partitions(), 1);
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn test_invalid_partition() {
        let collection = ParallelCollection::new(vec![1, 2, 3]);
        let err = collection.compute(&BasicPartition::new(1)).unwrap_err();
        assert_eq!(err, JobError::InvalidPartition(1));
    }

    #[test]
    fn test_empty_collection() {
        let collection: ParallelCollection<'_, u8> = ParallelCollection::with_partitions(vec![], 2);
        assert!(collection.is_empty());
        assert!(collection.compute(&BasicPartition::new(0)).unwrap().is_empty());
    }
}
