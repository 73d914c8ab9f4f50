//! Run configuration.
//!
//! Every knob is an explicit field. A JSON file can provide any subset of
//! them; missing fields take the defaults below. The launcher applies its
//! command-line overrides on top.

use crate::error::{CommonError, Result};
use crate::tags::DEFAULT_TAG_DELIMITER;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_TOP_K: i64 = 10;
pub const DEFAULT_MIN_REVIEWS: u64 = 500;

/// How the tag-recommendation aggregation is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Single pass over the joined rows on the calling thread.
    #[default]
    InMemory,
    /// Shuffle-based join and reduce-by-key over partitions.
    Partitioned,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::InMemory => "in-memory",
            Strategy::Partitioned => "partitioned",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "in-memory" | "inmemory" | "memory" | "local" => Ok(Strategy::InMemory),
            "partitioned" | "distributed" => Ok(Strategy::Partitioned),
            other => Err(CommonError::configuration_error(format!(
                "unknown strategy '{other}', expected 'in-memory' or 'partitioned'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    pub data_dir: PathBuf,
    pub games_file: String,
    pub recommendations_file: String,
    pub metadata_file: String,
    /// Number of entries in top-K results. Values <= 0 yield empty results.
    pub top_k: i64,
    pub tag_delimiter: String,
    pub strategy: Strategy,
    pub num_partitions: usize,
    pub num_threads: usize,
    /// Titles need strictly more reviews than this to get a positive percentage.
    pub min_reviews: u64,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            games_file: "games.csv".to_string(),
            recommendations_file: "recommendations.csv".to_string(),
            metadata_file: "games_metadata.json".to_string(),
            top_k: DEFAULT_TOP_K,
            tag_delimiter: DEFAULT_TAG_DELIMITER.to_string(),
            strategy: Strategy::default(),
            num_partitions: num_cpus::get(),
            num_threads: num_cpus::get(),
            min_reviews: DEFAULT_MIN_REVIEWS,
        }
    }
}

impl StatsConfig {
    /// Read a configuration file, filling absent fields with defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            CommonError::configuration_error_with_source(
                format!("cannot read config file {}", path.display()),
                e,
            )
        })?;
        let config: StatsConfig = serde_json::from_str(&raw).map_err(|e| {
            CommonError::configuration_error_with_source(
                format!("invalid config file {}", path.display()),
                e,
            )
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_partitions == 0 {
            return Err(CommonError::configuration_error(
                "num_partitions must be positive",
            ));
        }
        if self.num_threads == 0 {
            return Err(CommonError::configuration_error(
                "num_threads must be positive",
            ));
        }
        Ok(())
    }

    /// K as a selection size; negative values select nothing.
    pub fn top_k(&self) -> usize {
        usize::try_from(self.top_k).unwrap_or(0)
    }

    pub fn games_path(&self) -> PathBuf {
        self.data_dir.join(&self.games_file)
    }

    pub fn recommendations_path(&self) -> PathBuf {
        self.data_dir.join(&self.recommendations_file)
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.data_dir.join(&self.metadata_file)
    }
}
