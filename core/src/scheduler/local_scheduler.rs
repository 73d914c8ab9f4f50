//! Local Task Scheduler
//!
//! This module provides a local task scheduler that runs partition tasks on a
//! dedicated Rayon thread pool.

use crate::traits::{BasicPartition, JobError, JobResult, Partition};
use rayon::prelude::*;
use std::fmt::Debug;

/// Type alias for the function a task runs against its partition
pub type ComputeFn<'a, R> = Box<dyn Fn(&dyn Partition) -> JobResult<R> + Send + Sync + 'a>;

/// Task represents a unit of work bound to one partition
pub struct Task<'a, R> {
    pub partition: BasicPartition,
    pub compute_fn: ComputeFn<'a, R>,
}

impl<R> Debug for Task<'_, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task")
            .field("partition", &self.partition)
            .field("compute_fn", &"<function>")
            .finish()
    }
}

impl<'a, R> Task<'a, R> {
    pub fn new<F>(partition: BasicPartition, compute_fn: F) -> Self
    where
        F: Fn(&dyn Partition) -> JobResult<R> + Send + Sync + 'a,
    {
        Self {
            partition,
            compute_fn: Box::new(compute_fn),
        }
    }

    /// Run the task; failures are tagged with the partition they came from.
    pub fn execute(&self) -> JobResult<R> {
        (self.compute_fn)(&self.partition).map_err(|e| match e {
            JobError::TaskFailed { .. } => e,
            other => JobError::TaskFailed {
                partition: self.partition.index(),
                message: other.to_string(),
            },
        })
    }
}

/// LocalScheduler manages parallel execution of tasks using its own Rayon pool
#[derive(Debug)]
pub struct LocalScheduler {
    pool: rayon::ThreadPool,
    num_threads: usize,
}

impl LocalScheduler {
    /// Create a new LocalScheduler with the specified number of threads
    pub fn new(num_threads: usize) -> JobResult<Self> {
        let num_threads = num_threads.max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|i| format!("gamestats-worker-{i}"))
            .build()
            .map_err(|e| JobError::SchedulerError(e.to_string()))?;
        Ok(Self { pool, num_threads })
    }

    /// Get the number of threads
    pub fn num_threads(&self) -> usize {
        self.num_threads
    }

    /// Execute tasks in parallel, returning results in partition order.
    ///
    /// The first failing task fails the whole batch; no partial results are
    /// returned.
    pub fn execute_tasks<R>(&self, tasks: Vec<Task<'_, R>>) -> JobResult<Vec<R>>
    where
        R: Send,
    {
        self.pool
            .install(|| tasks.into_par_iter().map(|task| task.execute()).collect())
    }

    /// Execute tasks and concatenate their outputs
    pub fn execute_and_collect<T>(&self, tasks: Vec<Task<'_, Vec<T>>>) -> JobResult<Vec<T>>
    where
        T: Send,
    {
        let partition_results = self.execute_tasks(tasks)?;
        Ok(partition_results.into_iter().flatten().collect())
    }
}
