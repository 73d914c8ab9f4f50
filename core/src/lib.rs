//! Gamestats Core - tag aggregation engine
//!
//! Provides the recommendation-driven tag aggregation in two strategies: a
//! single-pass in-memory one and a partitioned map/reduce job executed on a
//! [`FlowContext`]. Also hosts the tabular reports over games and
//! recommendations.

pub mod aggregate;
pub mod analytics;
pub mod context;
pub mod instrument;
pub mod rdd;
pub mod scheduler;
pub mod shuffle;
pub mod traits;

pub use aggregate::{
    InMemoryAggregator, PartitionedAggregator, StrategyComparison, TagAggregator, TagCount,
    TagRank, TopKResult, aggregator_for, compare_strategies, select_top_k,
};
pub use context::FlowContext;
pub use instrument::{Timed, timed};
pub use rdd::ParallelCollection;
pub use scheduler::{LocalScheduler, Task};
pub use traits::{BasicPartition, Data, JobError, JobResult, Partition};
