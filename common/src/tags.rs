//! Tag normalization shared by every aggregation.

use serde::Deserialize;

/// Default separator when tags arrive as one joined string.
pub const DEFAULT_TAG_DELIMITER: &str = ",";

/// Trim a raw tag; null and blank tags yield `None`.
///
/// Tags are case-sensitive. Blank entries are dropped without a report.
pub fn normalize_tag(tag: Option<&str>) -> Option<&str> {
    let tag = tag?.trim();
    if tag.is_empty() { None } else { Some(tag) }
}

/// Every countable tag of a record, in order, duplicates included.
pub fn expand_tags(tags: &[Option<String>]) -> impl Iterator<Item = &str> {
    tags.iter().filter_map(|t| normalize_tag(t.as_deref()))
}

/// Split a delimiter-joined tag string into raw entries.
///
/// Entries keep their whitespace; [`normalize_tag`] trims them later. An
/// empty delimiter keeps the string as a single entry.
pub fn split_joined(raw: &str, delimiter: &str) -> Vec<Option<String>> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    if delimiter.is_empty() {
        return vec![Some(raw.to_string())];
    }
    raw.split(delimiter).map(|t| Some(t.to_string())).collect()
}

/// Tags as they appear in source files: a list, a joined string, or nothing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawTags {
    List(Vec<Option<String>>),
    Joined(String),
}

impl RawTags {
    pub fn into_tags(self, delimiter: &str) -> Vec<Option<String>> {
        match self {
            RawTags::List(tags) => tags,
            RawTags::Joined(raw) => split_joined(&raw, delimiter),
        }
    }
}
