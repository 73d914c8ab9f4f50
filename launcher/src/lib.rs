//! Gamestats Launcher
//!
//! Command-line parsing and report tasks for the `gamestats` binary.

pub mod cli;
pub mod report;

pub use cli::{Cli, ReportTask};
pub use report::run_task;
