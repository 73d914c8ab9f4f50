use anyhow::Result;
use clap::Parser;
use gamestats_launcher::{Cli, run_task};
use std::io::Write;
use tracing::info;

fn main() -> Result<()> {
    // Logs go to stderr so stdout carries only the reports.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.to_config()?;
    info!(
        task = ?cli.task,
        data_dir = %config.data_dir.display(),
        strategy = %config.strategy,
        "Starting gamestats"
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_task(cli.task, &config, &mut out)?;
    out.flush()?;
    Ok(())
}
