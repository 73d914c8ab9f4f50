//! Single-machine reports over the loaded relations.
//!
//! These run directly on slices without a [`FlowContext`](crate::FlowContext).

pub mod price;
pub mod reviews;

pub use price::{
    BucketCount, PriceBucket, YearAverage, average_price_by_year, recommendations_by_price_bucket,
};
pub use reviews::{ReviewShare, positive_review_percentage};

use crate::aggregate::{TagCount, TopKResult};
use gamestats_common::MetadataRecord;

/// The `k` most common tags across all metadata rows, without any join.
pub fn tag_frequency(metadata: &[MetadataRecord], k: usize) -> TopKResult {
    let mut counts = TagCount::new();
    for record in metadata {
        counts.add_tags(&record.tags);
    }
    counts.top_k(k)
}
