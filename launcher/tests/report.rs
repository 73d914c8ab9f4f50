//! End-to-end runs of the report tasks over small input files.

use gamestats_common::{StatsConfig, Strategy};
use gamestats_launcher::{ReportTask, run_task};
use std::fs;
use tempfile::TempDir;
use tracing_test::traced_test;

fn write_dataset() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("games.csv"),
        "app_id,title,date_release,win,price_final\n\
         1,Star Quest,2015-03-01,true,19.99\n\
         2,Farm Days,2015-07-12,true,9.99\n\
         3,Free Arena,2020-01-30,true,0.0\n\
         oops,Broken,2020-01-01,true,1.0\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("recommendations.csv"),
        "app_id,helpful,is_recommended,user_id\n\
         1,0,true,100\n\
         1,2,false,101\n\
         2,1,true,102\n\
         3,0,true,103\n\
         9,0,true,104\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("games_metadata.json"),
        "{\"app_id\":1,\"description\":\"\",\"tags\":[\"action\",\"rpg\"]}\n\
         {\"app_id\":2,\"tags\":[\"action\"]}\n\
         {\"app_id\":3,\"tags\":\"Indie, Shooter\"}\n",
    )
    .unwrap();
    dir
}

fn config_for(dir: &TempDir) -> StatsConfig {
    StatsConfig {
        data_dir: dir.path().to_path_buf(),
        num_partitions: 3,
        num_threads: 2,
        min_reviews: 1,
        ..StatsConfig::default()
    }
}

fn render(task: ReportTask, config: &StatsConfig) -> String {
    let mut out = Vec::new();
    run_task(task, config, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_recommended_tags_with_both_strategies() {
    let dir = write_dataset();
    let mut config = config_for(&dir);
    config.top_k = 2;

    let in_memory = render(ReportTask::RecommendedTags, &config);
    config.strategy = Strategy::Partitioned;
    let partitioned = render(ReportTask::RecommendedTags, &config);

    let lines = |report: &str| report.lines().skip(1).map(str::to_string).collect::<Vec<_>>();
    assert_eq!(lines(&in_memory), vec!["action: 2", "Indie: 1"]);
    assert_eq!(lines(&in_memory), lines(&partitioned));
    assert!(partitioned.starts_with("Most recommended tags (partitioned)"));
}

#[test]
fn test_non_positive_top_k_prints_no_tags() {
    let dir = write_dataset();
    let mut config = config_for(&dir);
    config.top_k = -1;

    let report = render(ReportTask::RecommendedTags, &config);
    assert_eq!(report.lines().count(), 1);
}

#[test]
fn test_all_reports() {
    let dir = write_dataset();
    let report = render(ReportTask::All, &config_for(&dir));

    assert!(report.contains("2015: 14.99"));
    assert!(report.contains("2020: 0.00"));
    assert!(report.contains("10-19: 1\n"));
    assert!(report.contains("0-9: 1\n"));
    assert!(report.contains("Star Quest: 50.00% (1/2)"));
    assert!(!report.contains("Farm Days:"));
}

#[test]
fn test_compare_reports_identical_results() {
    let dir = write_dataset();
    let report = render(ReportTask::Compare, &config_for(&dir));
    assert!(report.contains("identical: true"));
}

#[test]
fn test_missing_input_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut out = Vec::new();
    let err = run_task(ReportTask::AvgPrice, &config_for(&dir), &mut out).unwrap_err();
    assert!(err.to_string().contains("Failed to load games"));
}

#[traced_test]
#[test]
fn test_in_memory_strategy_starts_no_context() {
    let dir = write_dataset();
    let config = config_for(&dir);
    assert_eq!(config.strategy, Strategy::InMemory);

    let report = render(ReportTask::RecommendedTags, &config);
    assert!(report.contains("action: 2"));
    assert!(!logs_contain("Started flow context"));
}

#[traced_test]
#[test]
fn test_partitioned_strategy_stops_its_context() {
    let dir = write_dataset();
    let mut config = config_for(&dir);
    config.strategy = Strategy::Partitioned;

    render(ReportTask::RecommendedTags, &config);
    assert!(logs_contain("Started flow context"));
    assert!(logs_contain("Stopped flow context"));
}

#[test]
fn test_tabular_reports_are_capped_at_top_k() {
    let dir = write_dataset();
    let mut config = config_for(&dir);
    config.top_k = 1;

    let averages = render(ReportTask::AvgPrice, &config);
    assert_eq!(
        averages.lines().collect::<Vec<_>>(),
        vec!["Average price by release year", "2015: 14.99"]
    );
    let buckets = render(ReportTask::PriceBuckets, &config);
    assert_eq!(buckets.lines().count(), 2);

    config.top_k = 0;
    let reviews = render(ReportTask::PositiveReviews, &config);
    assert_eq!(reviews.lines().count(), 1);
}
