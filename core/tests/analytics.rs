//! Integration tests for the tabular reports

mod common;

use common::*;
use gamestats_core::analytics::{
    PriceBucket, average_price_by_year, positive_review_percentage,
    recommendations_by_price_bucket, tag_frequency,
};

#[test]
fn test_average_price_by_year() {
    let games = create_test_games();
    let averages = average_price_by_year(&games);

    let years: Vec<i32> = averages.iter().map(|a| a.year).collect();
    assert_eq!(years, vec![2019, 2021]);
    assert!((averages[0].average_price - 19.99).abs() < 1e-9);
    assert!((averages[1].average_price - 32.49).abs() < 1e-9);
}

#[test]
fn test_tag_frequency_ignores_recommendations() {
    let metadata = create_test_metadata();
    let top = tag_frequency(&metadata, 3);
    assert_eq!(top.pairs(), vec![("Action", 2), ("Indie", 2), ("RPG", 2)]);
}

#[test]
fn test_price_buckets() {
    let games = create_test_games();
    let recommendations = create_test_recommendations();

    let buckets = recommendations_by_price_bucket(&games, &recommendations);
    let rendered: Vec<String> = buckets.iter().map(ToString::to_string).collect();
    assert_eq!(
        rendered,
        vec!["0-9: 3", "20-29: 3", "50-59: 2", "10-19: 0", "30-39: 0", "40-49: 0", "60+: 0"]
    );
    assert_eq!(buckets.iter().map(|b| b.count).sum::<u64>(), 8);
    assert_eq!(buckets[0].bucket, PriceBucket::UpTo10);
}

#[test]
fn test_positive_review_percentage() {
    let games = create_test_games();
    let recommendations = create_test_recommendations();

    let shares = positive_review_percentage(&games, &recommendations, 3);
    let titles: Vec<&str> = shares.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["Skyreach", "Bullet Storm", "Block Logic"]);
    assert_eq!(shares[0].percentage, 75.0);
    assert_eq!(shares[1].percentage, 50.0);
    assert_eq!(shares[2].positive, 0);
    assert_eq!(shares[2].total, 5);

    assert!(positive_review_percentage(&games, &recommendations, 500).is_empty());
}
