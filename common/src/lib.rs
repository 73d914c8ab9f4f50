//! Common building blocks for the gamestats workspace.
//!
//! Typed records for the games, recommendations and metadata relations, the
//! loaders that produce them, tag normalization and run configuration.

pub mod config;
pub mod error;
pub mod loader;
pub mod records;
pub mod tags;

pub use config::{StatsConfig, Strategy};
pub use error::{CommonError, Result};
pub use loader::{
    Loaded, Relations, load_games, load_metadata, load_recommendations, load_relations,
};
pub use records::{AppId, GameRecord, MetadataRecord, RecommendationRecord};
pub use tags::{expand_tags, normalize_tag};
