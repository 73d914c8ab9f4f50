//! Command-line arguments and their mapping onto a [`StatsConfig`].

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use gamestats_common::{StatsConfig, Strategy};
use std::path::PathBuf;

/// Which report to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportTask {
    /// Every report below, except the strategy comparison
    All,
    /// Average final price by release year
    AvgPrice,
    /// Most common tags over all games
    Tags,
    /// Positive recommendations per price bucket
    PriceBuckets,
    /// Most common tags over positively recommended games
    RecommendedTags,
    /// Share of positive recommendations for well-reviewed titles
    PositiveReviews,
    /// Run both aggregation strategies and compare results and timings
    Compare,
}

#[derive(Parser, Debug)]
#[command(name = "gamestats")]
#[command(about = "Game catalogue statistics and tag-recommendation ranking", long_about = None)]
pub struct Cli {
    /// Report to produce
    #[arg(value_enum, default_value = "all")]
    pub task: ReportTask,

    /// JSON configuration file; flags below override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory holding the input files
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    #[arg(long)]
    pub games_file: Option<String>,

    #[arg(long)]
    pub recommendations_file: Option<String>,

    #[arg(long)]
    pub metadata_file: Option<String>,

    /// Number of tags to report; zero or less reports none
    #[arg(short = 'k', long, allow_negative_numbers = true)]
    pub top: Option<i64>,

    /// Aggregation strategy: in-memory or partitioned
    #[arg(short, long)]
    pub strategy: Option<Strategy>,

    #[arg(short, long)]
    pub partitions: Option<usize>,

    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Separator of tags stored as one joined string
    #[arg(long)]
    pub delimiter: Option<String>,

    /// Titles need strictly more recommendations than this to be reported
    #[arg(long)]
    pub min_reviews: Option<u64>,
}

impl Cli {
    /// The configuration file (or defaults) with every given flag applied.
    pub fn to_config(&self) -> Result<StatsConfig> {
        let mut config = match &self.config {
            Some(path) => StatsConfig::from_json_file(path)
                .with_context(|| format!("Failed to read configuration {}", path.display()))?,
            None => StatsConfig::default(),
        };

        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(file) = &self.games_file {
            config.games_file = file.clone();
        }
        if let Some(file) = &self.recommendations_file {
            config.recommendations_file = file.clone();
        }
        if let Some(file) = &self.metadata_file {
            config.metadata_file = file.clone();
        }
        if let Some(top) = self.top {
            config.top_k = top;
        }
        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }
        if let Some(partitions) = self.partitions {
            config.num_partitions = partitions;
        }
        if let Some(threads) = self.threads {
            config.num_threads = threads;
        }
        if let Some(delimiter) = &self.delimiter {
            config.tag_delimiter = delimiter.clone();
        }
        if let Some(min_reviews) = self.min_reviews {
            config.min_reviews = min_reviews;
        }

        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}
