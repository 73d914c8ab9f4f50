//! Single-pass aggregation on the calling thread.

use crate::aggregate::join::recommended_records;
use crate::aggregate::{TagAggregator, TagCount};
use crate::traits::JobResult;
use gamestats_common::{MetadataRecord, RecommendationRecord};
use tracing::debug;

/// Joins, filters, expands and counts in one pass with a single accumulator.
///
/// The metadata relation is the hash-join build side; recommendation events
/// are streamed against it.
#[derive(Debug, Clone, Copy, Default)]
pub struct InMemoryAggregator;

impl InMemoryAggregator {
    pub fn new() -> Self {
        Self
    }
}

impl TagAggregator for InMemoryAggregator {
    fn name(&self) -> &'static str {
        "in-memory"
    }

    fn count_tags(
        &self,
        metadata: &[MetadataRecord],
        recommendations: &[RecommendationRecord],
    ) -> JobResult<TagCount> {
        let mut counts = TagCount::new();
        let mut joined_rows = 0usize;
        for joined in recommended_records(metadata, recommendations) {
            counts.add_tags(joined.tags);
            joined_rows += 1;
        }
        debug!(
            joined_rows,
            distinct_tags = counts.len(),
            "Counted recommended tags"
        );
        Ok(counts)
    }
}
