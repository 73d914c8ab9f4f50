//! Core traits for the partitioned execution engine
//!
//! This module defines the partition abstraction, the bound on data that can
//! cross a shuffle, and the error type shared by every job.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Error types for job execution
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JobError {
    #[error("Invalid partition: {0}")]
    InvalidPartition(usize),

    #[error("Shuffle error: {0}")]
    ShuffleError(String),

    #[error("Scheduler error: {0}")]
    SchedulerError(String),

    #[error("Task for partition {partition} failed: {message}")]
    TaskFailed { partition: usize, message: String },
}

/// Result type for job execution
pub type JobResult<T> = Result<T, JobError>;

/// Partition represents a logical slice of a dataset
pub trait Partition: Send + Sync + Debug {
    /// Get the partition index
    fn index(&self) -> usize;

    /// Get a unique identifier for this partition
    fn id(&self) -> String {
        format!("partition_{}", self.index())
    }
}

/// Basic partition implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicPartition {
    index: usize,
}

impl BasicPartition {
    pub fn new(index: usize) -> Self {
        Self { index }
    }
}

impl Partition for BasicPartition {
    fn index(&self) -> usize {
        self.index
    }
}

/// A data type that can be partitioned and shuffled.
pub trait Data:
    Send + Sync + Clone + Debug + Serialize + for<'de> Deserialize<'de> + 'static
{
}
impl<T> Data for T where
    T: Send + Sync + Clone + Debug + Serialize + for<'de> Deserialize<'de> + 'static
{
}
