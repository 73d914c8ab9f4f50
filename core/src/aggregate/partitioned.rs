//! Shuffle-based aggregation over partitions.
//!
//! The job runs in three stages on the context's scheduler:
//!
//! 1. map: both relations are split into partitions and every partition is
//!    shuffled by app id, so the records of one game meet in one reduce
//!    partition;
//! 2. join: each co-located partition is hash joined, filtered to positive
//!    recommendations and expanded into `(tag, 1)` contributions, which are
//!    combined locally and shuffled again by tag;
//! 3. reduce: each tag partition merges its partial counts and keeps its own
//!    top-K; the driver merges those candidates into the final ranking.
//!
//! Tag partitions are disjoint, so the global top-K is always among the
//! per-partition candidates.

use crate::aggregate::join::recommended_records;
use crate::aggregate::{TagAggregator, TagCount, TagRank, TopKResult, select_top_k};
use crate::context::FlowContext;
use crate::scheduler::Task;
use crate::shuffle::{
    HashPartitioner, ShuffleOutput, SumAggregator, combine_values_by_key, merge_combiners_by_key,
    write_map_output,
};
use crate::traits::{BasicPartition, Data, JobResult, Partition};
use gamestats_common::{AppId, MetadataRecord, RecommendationRecord, expand_tags};
use std::collections::HashMap;
use tracing::{debug, info};

/// Runs the aggregation as a partitioned map/reduce job on a [`FlowContext`].
#[derive(Debug, Clone, Copy)]
pub struct PartitionedAggregator<'c> {
    context: &'c FlowContext,
    num_partitions: usize,
}

impl<'c> PartitionedAggregator<'c> {
    /// Use the context's default parallelism for every stage.
    pub fn new(context: &'c FlowContext) -> Self {
        Self::with_partitions(context, context.default_parallelism())
    }

    pub fn with_partitions(context: &'c FlowContext, num_partitions: usize) -> Self {
        Self {
            context,
            num_partitions: num_partitions.max(1),
        }
    }

    pub fn num_partitions(&self) -> usize {
        self.num_partitions
    }

    fn partitioner(&self) -> HashPartitioner {
        HashPartitioner::new(self.num_partitions as u32)
    }

    /// Stage 1: route every record to the reduce partition of its app id.
    fn shuffle_by_app_id<T, F>(
        &self,
        relation: &'static str,
        records: &[T],
        key_fn: F,
    ) -> JobResult<ShuffleOutput>
    where
        T: Data,
        F: Fn(&T) -> &AppId + Send + Sync,
    {
        let shuffle_id = self.context.new_shuffle_id();
        let partitioner = self.partitioner();
        let input = self
            .context
            .parallelize_with_partitions(records, self.num_partitions);

        let tasks = input
            .partitions()
            .into_iter()
            .map(|partition| {
                let input = &input;
                let key_fn = &key_fn;
                let partitioner = &partitioner;
                Task::new(partition, move |p: &dyn Partition| {
                    let rows = input.compute(p)?;
                    write_map_output(
                        shuffle_id,
                        p.index(),
                        rows.iter(),
                        |row: &&T| key_fn(*row),
                        partitioner,
                    )
                })
            })
            .collect();

        let statuses = self.context.scheduler().execute_tasks(tasks)?;
        let output = ShuffleOutput::new(shuffle_id, self.num_partitions, statuses);
        debug!(
            shuffle_id,
            relation,
            records = output.records_written(),
            bytes = output.bytes_written(),
            "Shuffled relation by app id"
        );
        Ok(output)
    }

    /// Stage 2: join co-located partitions and shuffle combined tag counts by tag.
    fn join_and_shuffle_tags(
        &self,
        metadata: &ShuffleOutput,
        recommendations: &ShuffleOutput,
    ) -> JobResult<ShuffleOutput> {
        let shuffle_id = self.context.new_shuffle_id();
        let partitioner = self.partitioner();

        let tasks = (0..self.num_partitions)
            .map(|reduce_id| {
                let partitioner = &partitioner;
                Task::new(BasicPartition::new(reduce_id), move |p: &dyn Partition| {
                    let games: Vec<MetadataRecord> = metadata.read(p.index())?;
                    let events: Vec<RecommendationRecord> = recommendations.read(p.index())?;

                    let contributions = recommended_records(&games, &events)
                        .flat_map(|joined| expand_tags(joined.tags))
                        .map(|tag| (tag, 1u64));
                    let combined: HashMap<&str, u64> =
                        combine_values_by_key(&SumAggregator::new(), contributions);

                    write_map_output(
                        shuffle_id,
                        p.index(),
                        combined,
                        |(tag, _): &(&str, u64)| *tag,
                        partitioner,
                    )
                })
            })
            .collect();

        let statuses = self.context.scheduler().execute_tasks(tasks)?;
        let output = ShuffleOutput::new(shuffle_id, self.num_partitions, statuses);
        debug!(
            shuffle_id,
            partial_counts = output.records_written(),
            bytes = output.bytes_written(),
            "Shuffled partial tag counts by tag"
        );
        Ok(output)
    }

    /// Stage 3: merge the partial counts of every tag partition, turn each
    /// partition's counter into rows with `finish` and concatenate the rows.
    fn reduce_tag_counts<R, F>(
        &self,
        metadata: &[MetadataRecord],
        recommendations: &[RecommendationRecord],
        finish: F,
    ) -> JobResult<Vec<R>>
    where
        R: Send,
        F: Fn(TagCount) -> Vec<R> + Send + Sync,
    {
        let metadata_shuffle =
            self.shuffle_by_app_id("metadata", metadata, |m: &MetadataRecord| &m.app_id)?;
        let recommendation_shuffle = self.shuffle_by_app_id(
            "recommendations",
            recommendations,
            |r: &RecommendationRecord| &r.app_id,
        )?;
        let tag_shuffle = self.join_and_shuffle_tags(&metadata_shuffle, &recommendation_shuffle)?;

        let tasks = (0..self.num_partitions)
            .map(|reduce_id| {
                let tag_shuffle = &tag_shuffle;
                let finish = &finish;
                Task::new(BasicPartition::new(reduce_id), move |p: &dyn Partition| {
                    let partials: Vec<(String, u64)> = tag_shuffle.read(p.index())?;
                    let merged: HashMap<String, u64> =
                        merge_combiners_by_key::<_, u64, _, _, _>(&SumAggregator::new(), partials);
                    Ok(finish(TagCount::from(merged)))
                })
            })
            .collect();

        self.context.scheduler().execute_and_collect(tasks)
    }
}

impl TagAggregator for PartitionedAggregator<'_> {
    fn name(&self) -> &'static str {
        "partitioned"
    }

    fn count_tags(
        &self,
        metadata: &[MetadataRecord],
        recommendations: &[RecommendationRecord],
    ) -> JobResult<TagCount> {
        // Tag partitions are disjoint, so the rows never repeat a tag.
        let rows: Vec<(String, u64)> =
            self.reduce_tag_counts(metadata, recommendations, |counts| {
                counts.into_iter().collect()
            })?;
        Ok(TagCount::from(rows.into_iter().collect::<HashMap<_, _>>()))
    }

    fn top_tags(
        &self,
        metadata: &[MetadataRecord],
        recommendations: &[RecommendationRecord],
        k: usize,
    ) -> JobResult<TopKResult> {
        if k == 0 {
            return Ok(TopKResult::default());
        }

        let candidates: Vec<TagRank> =
            self.reduce_tag_counts(metadata, recommendations, |counts| {
                counts.top_k(k).into_vec()
            })?;

        let top = select_top_k(candidates.iter().map(|r| (r.tag.as_str(), r.count)), k);
        info!(
            app = self.context.app_name(),
            job_id = %self.context.job_id(),
            partitions = self.num_partitions,
            candidates = candidates.len(),
            selected = top.len(),
            "Partitioned top-K finished"
        );
        Ok(top)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Vec<MetadataRecord>, Vec<RecommendationRecord>) {
        let metadata = vec![
            MetadataRecord::with_tags(1, ["action", "rpg"]),
            MetadataRecord::with_tags(2, ["action"]),
            MetadataRecord::new(3, vec![Some("indie".into()), None, Some("indie".into())]),
        ];
        let recommendations = vec![
            RecommendationRecord::new(1, true),
            RecommendationRecord::new(1, false),
            RecommendationRecord::new(2, true),
            RecommendationRecord::new(3, true),
            RecommendationRecord::new(4, true),
        ];
        (metadata, recommendations)
    }

    #[test]
    fn test_partitioned_counts() {
        let context = FlowContext::new("partitioned-counts", 2, 3).unwrap();
        let (metadata, recommendations) = sample();

        let counts = PartitionedAggregator::new(&context)
            .count_tags(&metadata, &recommendations)
            .unwrap();
        assert_eq!(counts.get("action"), 2);
        assert_eq!(counts.get("rpg"), 1);
        assert_eq!(counts.get("indie"), 2);
        assert_eq!(counts.total(), 5);
        context.stop();
    }

    #[test]
    fn test_partitioned_top_k() {
        let context = FlowContext::new("partitioned-top-k", 2, 4).unwrap();
        let (metadata, recommendations) = sample();

        let top = PartitionedAggregator::new(&context)
            .top_tags(&metadata, &recommendations, 2)
            .unwrap();
        assert_eq!(top.pairs(), vec![("action", 2), ("indie", 2)]);
        context.stop();
    }

    #[test]
    fn test_zero_k_skips_the_job() {
        let context = FlowContext::new("partitioned-zero", 1, 2).unwrap();
        let (metadata, recommendations) = sample();

        let top = PartitionedAggregator::new(&context)
            .top_tags(&metadata, &recommendations, 0)
            .unwrap();
        assert!(top.is_empty());
        assert_eq!(context.new_shuffle_id(), 0);
    }

    #[test]
    fn test_more_partitions_than_records() {
        let context = FlowContext::new("partitioned-sparse", 2, 1).unwrap();
        let (metadata, recommendations) = sample();

        let counts = PartitionedAggregator::with_partitions(&context, 16)
            .count_tags(&metadata, &recommendations)
            .unwrap();
        assert_eq!(counts.total(), 5);
    }

    #[test]
    fn test_counts_are_collected_from_every_tag_partition() {
        let context = FlowContext::new("partitioned-collect", 3, 5).unwrap();
        let metadata: Vec<MetadataRecord> = (0..40u64)
            .map(|id| MetadataRecord::with_tags(id, [format!("tag-{}", id % 13)]))
            .collect();
        let recommendations: Vec<RecommendationRecord> =
            (0..40u64).map(|id| RecommendationRecord::new(id, true)).collect();

        let counts = PartitionedAggregator::new(&context)
            .count_tags(&metadata, &recommendations)
            .unwrap();
        assert_eq!(counts.len(), 13);
        assert_eq!(counts.total(), 40);
        assert_eq!(counts.get("tag-0"), 4);
        assert_eq!(counts.get("tag-12"), 3);
        context.stop();
    }
}
