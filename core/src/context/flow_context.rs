//! FlowContext - execution context for partitioned jobs
//!
//! A context owns the worker thread pool and hands out shuffle ids. It is
//! created explicitly, passed by reference to whatever runs on it, and
//! released with [`FlowContext::stop`] once the batch is done.

use crate::rdd::ParallelCollection;
use crate::scheduler::LocalScheduler;
use crate::traits::{Data, JobResult};
use gamestats_common::StatsConfig;
use std::borrow::Cow;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info};
use uuid::Uuid;

/// FlowContext manages partitioned execution on a local thread pool
#[derive(Debug)]
pub struct FlowContext {
    app_name: String,
    job_id: String,
    default_parallelism: usize,
    scheduler: LocalScheduler,
    next_shuffle_id: AtomicUsize,
    stopped: bool,
}

impl FlowContext {
    /// Create a context with its own pool of `num_threads` workers.
    pub fn new(
        app_name: impl Into<String>,
        num_threads: usize,
        default_parallelism: usize,
    ) -> JobResult<Self> {
        let app_name = app_name.into();
        let job_id = format!("{}-{}", app_name, Uuid::new_v4());
        let scheduler = LocalScheduler::new(num_threads)?;
        let default_parallelism = default_parallelism.max(1);

        info!(
            job_id = %job_id,
            threads = scheduler.num_threads(),
            default_parallelism,
            "Started flow context"
        );

        Ok(Self {
            app_name,
            job_id,
            default_parallelism,
            scheduler,
            next_shuffle_id: AtomicUsize::new(0),
            stopped: false,
        })
    }

    /// Create a context from the thread and partition counts of a run configuration.
    pub fn from_config(app_name: impl Into<String>, config: &StatsConfig) -> JobResult<Self> {
        Self::new(app_name, config.num_threads, config.num_partitions)
    }

    /// Run `f` on a fresh context and stop the context afterwards, whether
    /// `f` succeeded or not.
    pub fn run<R, F>(
        app_name: impl Into<String>,
        num_threads: usize,
        default_parallelism: usize,
        f: F,
    ) -> JobResult<R>
    where
        F: FnOnce(&FlowContext) -> JobResult<R>,
    {
        let context = Self::new(app_name, num_threads, default_parallelism)?;
        let result = f(&context);
        context.stop();
        result
    }

    /// Get the application name
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn default_parallelism(&self) -> usize {
        self.default_parallelism
    }

    pub fn scheduler(&self) -> &LocalScheduler {
        &self.scheduler
    }

    /// Split records into the default number of partitions
    pub fn parallelize<'a, T: Data>(
        &self,
        data: impl Into<Cow<'a, [T]>>,
    ) -> ParallelCollection<'a, T> {
        self.parallelize_with_partitions(data, self.default_parallelism)
    }

    /// Split records into the specified number of partitions
    pub fn parallelize_with_partitions<'a, T: Data>(
        &self,
        data: impl Into<Cow<'a, [T]>>,
        num_partitions: usize,
    ) -> ParallelCollection<'a, T> {
        ParallelCollection::with_partitions(data, num_partitions)
    }

    /// Allocate an id for a new shuffle
    pub fn new_shuffle_id(&self) -> usize {
        self.next_shuffle_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Release the context and its worker threads.
    pub fn stop(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        info!(
            job_id = %self.job_id,
            shuffles = self.next_shuffle_id.load(Ordering::SeqCst),
            "Stopped flow context"
        );
    }
}

impl Drop for FlowContext {
    fn drop(&mut self) {
        if !self.stopped {
            debug!(job_id = %self.job_id, "Flow context dropped without stop()");
            self.release();
        }
    }
}
