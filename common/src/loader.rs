//! Relation loaders.
//!
//! Each loader turns one source file into typed records. Rows that do not fit
//! the schema are skipped and counted; only a file that cannot be read at all,
//! or that lacks a required column, fails the load.

use crate::error::{CommonError, Result};
use crate::records::{
    AppId, GameRecord, MetadataRecord, RecommendationRecord, parse_flag, parse_release_year,
};
use crate::tags::RawTags;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use tracing::{debug, info, warn};

pub const GAMES: &str = "games";
pub const RECOMMENDATIONS: &str = "recommendations";
pub const METADATA: &str = "metadata";

/// Records parsed from one relation, with the number of rows left out.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<T> {
    pub records: Vec<T>,
    pub skipped: usize,
}

impl<T> Loaded<T> {
    fn finish(relation: &'static str, records: Vec<T>, skipped: usize) -> Self {
        if skipped > 0 {
            warn!(relation, skipped, "Skipped malformed rows");
        }
        info!(relation, rows = records.len(), "Loaded relation");
        Self { records, skipped }
    }
}

/// The three relations used by the reports.
#[derive(Debug, Clone, Default)]
pub struct Relations {
    pub games: Vec<GameRecord>,
    pub recommendations: Vec<RecommendationRecord>,
    pub metadata: Vec<MetadataRecord>,
}

/// Load `games.csv`: `app_id`, `title`, `date_release` and `price_final` are required.
pub fn load_games(path: impl AsRef<Path>) -> Result<Loaded<GameRecord>> {
    let mut reader = open_csv(GAMES, path.as_ref())?;
    let columns = required_columns(
        GAMES,
        &mut reader,
        &["app_id", "title", "date_release", "price_final"],
    )?;

    let mut records = Vec::new();
    let mut skipped = 0;
    for (line, row) in reader.records().enumerate() {
        let parsed = row.ok().and_then(|row| {
            let app_id = row.get(columns[0])?.parse::<AppId>().ok()?;
            let title = row.get(columns[1])?.trim().to_string();
            let year_release = parse_release_year(row.get(columns[2])?);
            let price_final = row.get(columns[3])?.trim().parse::<f64>().ok()?;
            Some(GameRecord::new(app_id, title, year_release, price_final))
        });
        match parsed {
            Some(record) => records.push(record),
            None => {
                debug!(relation = GAMES, line = line + 2, "Skipping malformed row");
                skipped += 1;
            }
        }
    }
    Ok(Loaded::finish(GAMES, records, skipped))
}

/// Load `recommendations.csv`: `app_id` and `is_recommended` are required.
///
/// Rows whose flag is neither `true` nor `false` are skipped.
pub fn load_recommendations(path: impl AsRef<Path>) -> Result<Loaded<RecommendationRecord>> {
    let mut reader = open_csv(RECOMMENDATIONS, path.as_ref())?;
    let columns = required_columns(RECOMMENDATIONS, &mut reader, &["app_id", "is_recommended"])?;

    let mut records = Vec::new();
    let mut skipped = 0;
    for (line, row) in reader.records().enumerate() {
        let parsed = row.ok().and_then(|row| {
            let app_id = row.get(columns[0])?.parse::<AppId>().ok()?;
            let is_recommended = parse_flag(row.get(columns[1])?)?;
            Some(RecommendationRecord::new(app_id, is_recommended))
        });
        match parsed {
            Some(record) => records.push(record),
            None => {
                debug!(
                    relation = RECOMMENDATIONS,
                    line = line + 2,
                    "Skipping malformed row"
                );
                skipped += 1;
            }
        }
    }
    Ok(Loaded::finish(RECOMMENDATIONS, records, skipped))
}

#[derive(Debug, Deserialize)]
struct RawMetadata {
    app_id: serde_json::Value,
    #[serde(default)]
    tags: Option<RawTags>,
}

impl RawMetadata {
    fn into_record(self, delimiter: &str) -> Option<MetadataRecord> {
        let app_id = match &self.app_id {
            serde_json::Value::Number(n) => AppId(n.as_u64()?),
            serde_json::Value::String(s) => s.parse().ok()?,
            _ => return None,
        };
        let tags = self
            .tags
            .map(|t| t.into_tags(delimiter))
            .unwrap_or_default();
        Some(MetadataRecord::new(app_id, tags))
    }
}

/// Load game metadata from a JSON array of objects or from JSON lines.
///
/// `tags` may be a list (null entries allowed), a string joined with
/// `delimiter`, or absent.
pub fn load_metadata(
    path: impl AsRef<Path>,
    delimiter: &str,
) -> Result<Loaded<MetadataRecord>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        CommonError::relation_unavailable_with_source(
            METADATA,
            format!("cannot open {}", path.display()),
            e,
        )
    })?;
    let mut reader = BufReader::new(file);
    let unreadable = |e: std::io::Error| {
        CommonError::relation_unavailable_with_source(
            METADATA,
            format!("cannot read {}", path.display()),
            e,
        )
    };

    if starts_with_array(&mut reader).map_err(unreadable)? {
        let mut raw = Vec::new();
        reader.read_to_end(&mut raw).map_err(unreadable)?;
        let rows: Vec<serde_json::Value> = serde_json::from_slice(&raw).map_err(|e| {
            CommonError::relation_unavailable_with_source(
                METADATA,
                format!("{} is not a valid JSON array", path.display()),
                e,
            )
        })?;

        let mut records = Vec::with_capacity(rows.len());
        let mut skipped = 0;
        for (index, row) in rows.into_iter().enumerate() {
            match parse_metadata_value(row, delimiter) {
                Some(record) => records.push(record),
                None => {
                    debug!(relation = METADATA, index, "Skipping malformed row");
                    skipped += 1;
                }
            }
        }
        return Ok(Loaded::finish(METADATA, records, skipped));
    }

    // Lines are split as bytes so a row with invalid UTF-8 is skipped like any
    // other malformed row.
    let mut records = Vec::new();
    let mut skipped = 0;
    for (line, bytes) in reader.split(b'\n').enumerate() {
        let bytes = bytes.map_err(unreadable)?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        let parsed = serde_json::from_slice::<serde_json::Value>(&bytes)
            .ok()
            .and_then(|row| parse_metadata_value(row, delimiter));
        match parsed {
            Some(record) => records.push(record),
            None => {
                debug!(relation = METADATA, line = line + 1, "Skipping malformed row");
                skipped += 1;
            }
        }
    }
    Ok(Loaded::finish(METADATA, records, skipped))
}

/// Load all three relations from the paths of a configuration.
pub fn load_relations(config: &crate::config::StatsConfig) -> Result<Relations> {
    let games = load_games(config.games_path())?;
    let recommendations = load_recommendations(config.recommendations_path())?;
    let metadata = load_metadata(config.metadata_path(), &config.tag_delimiter)?;
    Ok(Relations {
        games: games.records,
        recommendations: recommendations.records,
        metadata: metadata.records,
    })
}

fn parse_metadata_value(row: serde_json::Value, delimiter: &str) -> Option<MetadataRecord> {
    serde_json::from_value::<RawMetadata>(row)
        .ok()?
        .into_record(delimiter)
}

fn starts_with_array<R: BufRead>(reader: &mut R) -> std::io::Result<bool> {
    loop {
        let buf = reader.fill_buf()?;
        if buf.is_empty() {
            return Ok(false);
        }
        match buf.iter().position(|b| !b.is_ascii_whitespace()) {
            Some(pos) => return Ok(buf[pos] == b'['),
            None => {
                let len = buf.len();
                reader.consume(len);
            }
        }
    }
}

fn open_csv(relation: &'static str, path: &Path) -> Result<csv::Reader<File>> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| {
            CommonError::relation_unavailable_with_source(
                relation,
                format!("cannot open {}", path.display()),
                e,
            )
        })
}

fn required_columns<const N: usize>(
    relation: &'static str,
    reader: &mut csv::Reader<File>,
    names: &[&str; N],
) -> Result<[usize; N]> {
    let headers = reader.headers().map_err(|e| {
        CommonError::relation_unavailable_with_source(relation, "cannot read header", e)
    })?;
    let mut columns = [0; N];
    for (slot, name) in columns.iter_mut().zip(names) {
        *slot = headers
            .iter()
            .position(|h| h.trim() == *name)
            .ok_or_else(|| {
                CommonError::relation_unavailable(relation, format!("missing column '{name}'"))
            })?;
    }
    Ok(columns)
}
