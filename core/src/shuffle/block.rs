//! Shuffle blocks: map output bucketed by reduce partition.
//!
//! A map task routes each record to a reduce partition with a `Partitioner`
//! and encodes every bucket as one bincode block. Reduce tasks decode the
//! blocks addressed to them from every map task. Tasks never share in-memory
//! state; only encoded blocks cross the stage boundary.

use crate::shuffle::Partitioner;
use crate::traits::{Data, JobError, JobResult};
use serde::Serialize;
use std::fmt;

/// Address of one shuffle block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShuffleBlockId {
    pub shuffle_id: usize,
    pub map_id: usize,
    pub reduce_id: usize,
}

impl fmt::Display for ShuffleBlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "shuffle_{}_{}_{}",
            self.shuffle_id, self.map_id, self.reduce_id
        )
    }
}

/// Encoded records for one (map task, reduce partition) pair.
#[derive(Debug, Clone)]
pub struct ShuffleBlock {
    id: ShuffleBlockId,
    bytes: Vec<u8>,
    records: usize,
}

impl ShuffleBlock {
    fn encode<T: Serialize>(id: ShuffleBlockId, records: &[T]) -> JobResult<Self> {
        let bytes = bincode::serde::encode_to_vec(records, bincode::config::standard())
            .map_err(|e| JobError::ShuffleError(format!("failed to encode block {id}: {e}")))?;
        Ok(Self {
            id,
            bytes,
            records: records.len(),
        })
    }

    fn decode<T: Data>(&self) -> JobResult<Vec<T>> {
        bincode::serde::decode_from_slice::<Vec<T>, _>(&self.bytes, bincode::config::standard())
            .map(|(records, _)| records)
            .map_err(|e| {
                JobError::ShuffleError(format!("failed to decode block {}: {e}", self.id))
            })
    }

    pub fn len_bytes(&self) -> usize {
        self.bytes.len()
    }

    pub fn num_records(&self) -> usize {
        self.records
    }
}

/// Everything one map task wrote: one block per reduce partition.
#[derive(Debug, Clone)]
pub struct MapStatus {
    pub map_id: usize,
    blocks: Vec<ShuffleBlock>,
}

impl MapStatus {
    pub fn bytes_written(&self) -> usize {
        self.blocks.iter().map(ShuffleBlock::len_bytes).sum()
    }

    pub fn records_written(&self) -> usize {
        self.blocks.iter().map(ShuffleBlock::num_records).sum()
    }
}

/// Bucket `records` by `key_fn` and encode each bucket.
///
/// Records may be borrowed; a `&T` block decodes as `T` on the reduce side.
pub fn write_map_output<T, K, I, F, P>(
    shuffle_id: usize,
    map_id: usize,
    records: I,
    key_fn: F,
    partitioner: &P,
) -> JobResult<MapStatus>
where
    T: Serialize,
    K: ?Sized,
    I: IntoIterator<Item = T>,
    F: Fn(&T) -> &K,
    P: Partitioner<K> + ?Sized,
{
    let num_partitions = partitioner.num_partitions() as usize;
    let mut buckets: Vec<Vec<T>> = (0..num_partitions).map(|_| Vec::new()).collect();
    for record in records {
        let reduce_id = partitioner.get_partition(key_fn(&record)) as usize;
        buckets[reduce_id].push(record);
    }

    let blocks = buckets
        .iter()
        .enumerate()
        .map(|(reduce_id, bucket)| {
            let id = ShuffleBlockId {
                shuffle_id,
                map_id,
                reduce_id,
            };
            ShuffleBlock::encode(id, bucket)
        })
        .collect::<JobResult<Vec<_>>>()?;

    Ok(MapStatus { map_id, blocks })
}

/// The complete output of one shuffle, indexed by reduce partition on read.
#[derive(Debug, Clone)]
pub struct ShuffleOutput {
    shuffle_id: usize,
    num_reduce_partitions: usize,
    map_statuses: Vec<MapStatus>,
}

impl ShuffleOutput {
    pub fn new(
        shuffle_id: usize,
        num_reduce_partitions: usize,
        map_statuses: Vec<MapStatus>,
    ) -> Self {
        Self {
            shuffle_id,
            num_reduce_partitions,
            map_statuses,
        }
    }

    pub fn shuffle_id(&self) -> usize {
        self.shuffle_id
    }

    pub fn num_reduce_partitions(&self) -> usize {
        self.num_reduce_partitions
    }

    /// Decode every block addressed to `reduce_id`.
    pub fn read<T: Data>(&self, reduce_id: usize) -> JobResult<Vec<T>> {
        if reduce_id >= self.num_reduce_partitions {
            return Err(JobError::InvalidPartition(reduce_id));
        }

        let mut records = Vec::new();
        for status in &self.map_statuses {
            let block = status.blocks.get(reduce_id).ok_or_else(|| {
                JobError::ShuffleError(format!(
                    "map task {} of shuffle {} has no block for reduce partition {reduce_id}",
                    status.map_id, self.shuffle_id
                ))
            })?;
            records.extend(block.decode::<T>()?);
        }
        Ok(records)
    }

    pub fn bytes_written(&self) -> usize {
        self.map_statuses.iter().map(MapStatus::bytes_written).sum()
    }

    pub fn records_written(&self) -> usize {
        self.map_statuses.iter().map(MapStatus::records_written).sum()
    }
}
