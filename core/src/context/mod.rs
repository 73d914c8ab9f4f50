//! Context module
//!
//! This module provides the execution context for partitioned jobs.

pub mod flow_context;

pub use flow_context::*;
