//! Tag-recommendation aggregation.
//!
//! Joins game metadata with recommendation events on app id, keeps positive
//! recommendations, expands each game's tags into one contribution per tag
//! and ranks tags by total contributions.
//!
//! Two strategies implement [`TagAggregator`]: [`InMemoryAggregator`] runs a
//! single pass on the calling thread, [`PartitionedAggregator`] runs a
//! shuffle-based job on a [`FlowContext`]. Both produce the same counts and,
//! because ranking ties are broken by tag, the same top-K in the same order.

pub mod compare;
pub mod in_memory;
pub mod join;
pub mod partitioned;
pub mod tag_count;

pub use compare::{StrategyComparison, compare_strategies};
pub use in_memory::InMemoryAggregator;
pub use join::{JoinedRecord, hash_join, join_recommendations, recommended_records};
pub use partitioned::PartitionedAggregator;
pub use tag_count::{TagCount, TagRank, TopKResult, select_top_k};

use crate::context::FlowContext;
use crate::traits::JobResult;
use gamestats_common::{MetadataRecord, RecommendationRecord, Strategy};

/// Computes tag counts over positively recommended games.
pub trait TagAggregator {
    /// Short name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Count every (joined, recommended, usable tag) occurrence per tag.
    fn count_tags(
        &self,
        metadata: &[MetadataRecord],
        recommendations: &[RecommendationRecord],
    ) -> JobResult<TagCount>;

    /// The `k` most frequent tags. `k == 0` returns an empty result.
    fn top_tags(
        &self,
        metadata: &[MetadataRecord],
        recommendations: &[RecommendationRecord],
        k: usize,
    ) -> JobResult<TopKResult> {
        if k == 0 {
            return Ok(TopKResult::default());
        }
        Ok(self.count_tags(metadata, recommendations)?.top_k(k))
    }
}

/// The aggregator for a strategy. The partitioned strategy runs on `context`.
pub fn aggregator_for<'c>(
    strategy: Strategy,
    context: &'c FlowContext,
) -> Box<dyn TagAggregator + 'c> {
    match strategy {
        Strategy::InMemory => Box::new(InMemoryAggregator::new()),
        Strategy::Partitioned => Box::new(PartitionedAggregator::new(context)),
    }
}
