//! Core components for shuffle operations.

pub mod aggregator;
pub mod block;
pub mod partitioner;

pub use aggregator::*;
pub use block::*;
pub use partitioner::*;
