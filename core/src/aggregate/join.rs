//! Hash join between relations.
//!
//! The build side is indexed by key once; the probe side is streamed through
//! the index. Every (build, probe) pair sharing a key is produced, so
//! duplicate keys on either side multiply like a relational inner join.

use gamestats_common::{AppId, MetadataRecord, RecommendationRecord};
use std::collections::HashMap;
use std::hash::Hash;

/// Inner equi-join of `build` and `probe`, yielding `(build_row, probe_row)` pairs.
///
/// Keys present on only one side produce nothing.
pub fn hash_join<'b, 'p, B, P, K, BK, PK>(
    build: &'b [B],
    build_key: BK,
    probe: &'p [P],
    probe_key: PK,
) -> impl Iterator<Item = (&'b B, &'p P)>
where
    K: Hash + Eq,
    BK: Fn(&B) -> K,
    PK: Fn(&P) -> K,
{
    let mut index: HashMap<K, Vec<&'b B>> = HashMap::new();
    for row in build {
        index.entry(build_key(row)).or_default().push(row);
    }

    probe.iter().flat_map(move |p| {
        index
            .get(&probe_key(p))
            .map(|matches| matches.iter().map(move |b| (*b, p)).collect::<Vec<_>>())
            .unwrap_or_default()
    })
}

/// One metadata record paired with one recommendation event for the same game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinedRecord<'a> {
    pub app_id: AppId,
    pub tags: &'a [Option<String>],
    pub is_recommended: bool,
}

/// Join metadata with recommendation events on app id.
pub fn join_recommendations<'a>(
    metadata: &'a [MetadataRecord],
    recommendations: &'a [RecommendationRecord],
) -> impl Iterator<Item = JoinedRecord<'a>> {
    hash_join(
        metadata,
        |m: &MetadataRecord| m.app_id,
        recommendations,
        |r: &RecommendationRecord| r.app_id,
    )
    .map(|(m, r)| JoinedRecord {
        app_id: m.app_id,
        tags: &m.tags,
        is_recommended: r.is_recommended,
    })
}

/// Joined records whose recommendation is positive.
pub fn recommended_records<'a>(
    metadata: &'a [MetadataRecord],
    recommendations: &'a [RecommendationRecord],
) -> impl Iterator<Item = JoinedRecord<'a>> {
    join_recommendations(metadata, recommendations).filter(|joined| joined.is_recommended)
}
