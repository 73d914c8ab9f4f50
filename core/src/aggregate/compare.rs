//! Side-by-side run of both aggregation strategies.

use crate::aggregate::{TagAggregator, TopKResult, aggregator_for};
use crate::context::FlowContext;
use crate::instrument::{Timed, timed};
use crate::traits::JobResult;
use gamestats_common::{MetadataRecord, RecommendationRecord, Strategy};
use tracing::{info, warn};

/// Top-K results and timings of the in-memory and partitioned strategies.
#[derive(Debug, Clone)]
pub struct StrategyComparison {
    pub in_memory: Timed<TopKResult>,
    pub partitioned: Timed<TopKResult>,
}

impl StrategyComparison {
    /// Whether both strategies returned the same tags, counts and order.
    pub fn identical(&self) -> bool {
        self.in_memory.value == self.partitioned.value
    }
}

/// Run the same top-K query through both strategies and time each run.
pub fn compare_strategies(
    context: &FlowContext,
    metadata: &[MetadataRecord],
    recommendations: &[RecommendationRecord],
    k: usize,
) -> JobResult<StrategyComparison> {
    let run = |strategy: Strategy| {
        let aggregator = aggregator_for(strategy, context);
        timed(aggregator.name(), || {
            aggregator.top_tags(metadata, recommendations, k)
        })
        .transpose()
    };
    let in_memory = run(Strategy::InMemory)?;
    let partitioned = run(Strategy::Partitioned)?;

    let comparison = StrategyComparison {
        in_memory,
        partitioned,
    };
    if comparison.identical() {
        info!(
            in_memory_ms = comparison.in_memory.elapsed.as_millis() as u64,
            partitioned_ms = comparison.partitioned.elapsed.as_millis() as u64,
            "Strategies agree"
        );
    } else {
        warn!("Strategies returned different rankings");
    }
    Ok(comparison)
}
