//! Report tasks: load the relations a task needs, run it and print the result.

use crate::cli::ReportTask;
use anyhow::{Context, Result};
use gamestats_common::{
    GameRecord, MetadataRecord, RecommendationRecord, StatsConfig, Strategy, load_games,
    load_metadata, load_recommendations, load_relations,
};
use gamestats_core::analytics::{
    average_price_by_year, positive_review_percentage, recommendations_by_price_bucket,
    tag_frequency,
};
use gamestats_core::{
    FlowContext, InMemoryAggregator, PartitionedAggregator, TagAggregator, compare_strategies,
    timed,
};
use std::io::Write;
use tracing::info;

const APP_NAME: &str = "gamestats";

const ALL_TASKS: [ReportTask; 5] = [
    ReportTask::AvgPrice,
    ReportTask::Tags,
    ReportTask::PriceBuckets,
    ReportTask::RecommendedTags,
    ReportTask::PositiveReviews,
];

/// Relations loaded for a run. Only the ones some task reads are loaded.
#[derive(Debug, Default)]
struct Inputs {
    games: Vec<GameRecord>,
    recommendations: Vec<RecommendationRecord>,
    metadata: Vec<MetadataRecord>,
}

impl Inputs {
    fn load(config: &StatsConfig, tasks: &[ReportTask]) -> Result<Self> {
        let needs = |wanted: &[ReportTask]| tasks.iter().any(|t| wanted.contains(t));
        let needs_games = needs(&[
            ReportTask::AvgPrice,
            ReportTask::PriceBuckets,
            ReportTask::PositiveReviews,
        ]);
        let needs_recommendations = needs(&[
            ReportTask::PriceBuckets,
            ReportTask::RecommendedTags,
            ReportTask::PositiveReviews,
            ReportTask::Compare,
        ]);
        let needs_metadata = needs(&[
            ReportTask::Tags,
            ReportTask::RecommendedTags,
            ReportTask::Compare,
        ]);

        if needs_games && needs_recommendations && needs_metadata {
            let relations = load_relations(config).context("Failed to load relations")?;
            return Ok(Inputs {
                games: relations.games,
                recommendations: relations.recommendations,
                metadata: relations.metadata,
            });
        }

        let mut inputs = Inputs::default();
        if needs_games {
            inputs.games = load_games(config.games_path())
                .context("Failed to load games")?
                .records;
        }
        if needs_recommendations {
            inputs.recommendations = load_recommendations(config.recommendations_path())
                .context("Failed to load recommendations")?
                .records;
        }
        if needs_metadata {
            inputs.metadata = load_metadata(config.metadata_path(), &config.tag_delimiter)
                .context("Failed to load game metadata")?
                .records;
        }
        Ok(inputs)
    }
}

/// Run `task` with `config`, writing its report to `out`.
pub fn run_task(task: ReportTask, config: &StatsConfig, out: &mut dyn Write) -> Result<()> {
    let inputs = match task {
        ReportTask::All => Inputs::load(config, &ALL_TASKS)?,
        other => Inputs::load(config, &[other])?,
    };
    report(task, config, &inputs, out)
}

fn report(
    task: ReportTask,
    config: &StatsConfig,
    inputs: &Inputs,
    out: &mut dyn Write,
) -> Result<()> {
    let k = config.top_k();
    match task {
        ReportTask::All => {
            for task in ALL_TASKS {
                report(task, config, inputs, out)?;
                writeln!(out)?;
            }
            return Ok(());
        }
        ReportTask::AvgPrice => {
            let averages = timed("avg-price", || average_price_by_year(&inputs.games));
            writeln!(out, "Average price by release year")?;
            for average in averages.value.iter().take(k) {
                writeln!(out, "{average}")?;
            }
        }
        ReportTask::Tags => {
            let top = timed("tags", || tag_frequency(&inputs.metadata, k));
            writeln!(out, "Most common tags")?;
            write!(out, "{}", top.value)?;
        }
        ReportTask::PriceBuckets => {
            let buckets = timed("price-buckets", || {
                recommendations_by_price_bucket(&inputs.games, &inputs.recommendations)
            });
            writeln!(out, "Recommendations by price")?;
            for bucket in buckets.value.iter().take(k) {
                writeln!(out, "{bucket}")?;
            }
        }
        ReportTask::RecommendedTags => {
            // Only the partitioned strategy needs a context and its worker pool.
            let top = timed("recommended-tags", || match config.strategy {
                Strategy::InMemory => InMemoryAggregator::new().top_tags(
                    &inputs.metadata,
                    &inputs.recommendations,
                    k,
                ),
                Strategy::Partitioned => FlowContext::run(
                    APP_NAME,
                    config.num_threads,
                    config.num_partitions,
                    |context| {
                        PartitionedAggregator::new(context).top_tags(
                            &inputs.metadata,
                            &inputs.recommendations,
                            k,
                        )
                    },
                ),
            })
            .transpose()
            .context("Tag aggregation failed")?;
            writeln!(out, "Most recommended tags ({})", config.strategy)?;
            write!(out, "{}", top.value)?;
        }
        ReportTask::PositiveReviews => {
            let shares = timed("positive-reviews", || {
                positive_review_percentage(
                    &inputs.games,
                    &inputs.recommendations,
                    config.min_reviews,
                )
            });
            writeln!(
                out,
                "Positive recommendations (more than {} reviews)",
                config.min_reviews
            )?;
            for share in shares.value.iter().take(k) {
                writeln!(out, "{share}")?;
            }
        }
        ReportTask::Compare => {
            let context = FlowContext::from_config(APP_NAME, config)
                .context("Failed to start flow context")?;
            let comparison =
                compare_strategies(&context, &inputs.metadata, &inputs.recommendations, k);
            context.stop();
            let comparison = comparison.context("Strategy comparison failed")?;

            writeln!(out, "Strategy comparison")?;
            for (name, run) in [
                ("in-memory", &comparison.in_memory),
                ("partitioned", &comparison.partitioned),
            ] {
                writeln!(out, "{name}: {:.3} s", run.elapsed.as_secs_f64())?;
            }
            writeln!(out, "identical: {}", comparison.identical())?;
            write!(out, "{}", comparison.partitioned.value)?;
        }
    }
    info!(task = ?task, "Report written");
    Ok(())
}
