//! Typed records for the three input relations.
//!
//! Rows are validated when they are loaded; everything downstream works on
//! these structures instead of loosely typed columns.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a game, shared by every relation as the join key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppId(pub u64);

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AppId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(AppId)
    }
}

impl From<u64> for AppId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Tags attached to one game. Entries may be null and may repeat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRecord {
    pub app_id: AppId,
    pub tags: Vec<Option<String>>,
}

impl MetadataRecord {
    pub fn new(app_id: impl Into<AppId>, tags: Vec<Option<String>>) -> Self {
        Self {
            app_id: app_id.into(),
            tags,
        }
    }

    /// Build a record from non-null tags.
    pub fn with_tags<I, S>(app_id: impl Into<AppId>, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(app_id, tags.into_iter().map(|t| Some(t.into())).collect())
    }
}

/// One recommendation event written by a user for a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationRecord {
    pub app_id: AppId,
    pub is_recommended: bool,
}

impl RecommendationRecord {
    pub fn new(app_id: impl Into<AppId>, is_recommended: bool) -> Self {
        Self {
            app_id: app_id.into(),
            is_recommended,
        }
    }
}

/// Pricing and release information for one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub app_id: AppId,
    pub title: String,
    pub year_release: Option<i32>,
    pub price_final: f64,
}

impl GameRecord {
    pub fn new(
        app_id: impl Into<AppId>,
        title: impl Into<String>,
        year_release: Option<i32>,
        price_final: f64,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            title: title.into(),
            year_release,
            price_final,
        }
    }
}

/// Parse a recommendation flag the way the source files spell it.
///
/// Surrounding whitespace is ignored and the comparison is case-insensitive.
/// Anything other than `true` / `false` yields `None`.
pub fn parse_flag(raw: &str) -> Option<bool> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Release year from a date such as `2008-11-21`: the first four characters.
pub fn parse_release_year(raw: &str) -> Option<i32> {
    raw.trim().get(..4)?.parse().ok()
}
