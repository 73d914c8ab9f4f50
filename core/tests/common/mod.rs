//! Common test utilities and helpers for integration tests

use gamestats_common::{GameRecord, MetadataRecord, RecommendationRecord};
use gamestats_core::FlowContext;

/// Create a test context with a given name
#[allow(dead_code)]
pub fn create_test_context(name: &str) -> FlowContext {
    FlowContext::new(name, 2, 4).expect("failed to start test context")
}

/// Create a test context with specific thread and partition counts
#[allow(dead_code)] // Used by a subset of the integration test crates
pub fn create_test_context_with(name: &str, threads: usize, partitions: usize) -> FlowContext {
    FlowContext::new(name, threads, partitions).expect("failed to start test context")
}

/// Metadata with repeated, blank, null and unmatched tags.
#[allow(dead_code)]
pub fn create_test_metadata() -> Vec<MetadataRecord> {
    vec![
        MetadataRecord::with_tags(10, ["Action", "RPG", "Open World"]),
        MetadataRecord::with_tags(20, ["Action", "Shooter"]),
        MetadataRecord::new(
            30,
            vec![Some(" Indie ".into()), None, Some("".into()), Some("Indie".into())],
        ),
        MetadataRecord::with_tags(40, ["Puzzle"]),
        MetadataRecord::new(50, Vec::new()),
        MetadataRecord::with_tags(60, ["Strategy", "RPG"]),
    ]
}

/// Recommendation events, including unknown app ids and negative reviews.
#[allow(dead_code)]
pub fn create_test_recommendations() -> Vec<RecommendationRecord> {
    let mut events = Vec::new();
    for (app_id, positive, negative) in [
        (10u64, 3usize, 1usize),
        (20, 2, 2),
        (30, 1, 0),
        (40, 0, 5),
        (50, 4, 0),
        (60, 2, 1),
        (99, 7, 0),
    ] {
        events.extend(std::iter::repeat_n(RecommendationRecord::new(app_id, true), positive));
        events.extend(std::iter::repeat_n(RecommendationRecord::new(app_id, false), negative));
    }
    events
}

/// A larger synthetic dataset with many ties.
#[allow(dead_code)]
pub fn create_synthetic_relations(
    games: u64,
    events_per_game: u64,
) -> (Vec<MetadataRecord>, Vec<RecommendationRecord>) {
    const TAGS: [&str; 7] = ["Action", "Adventure", "Casual", "Indie", "RPG", "Simulation", "Sports"];

    let metadata = (0..games)
        .map(|id| {
            let tags = (0..(id % 4) as usize)
                .map(|i| TAGS[(id as usize + i) % TAGS.len()])
                .collect::<Vec<_>>();
            MetadataRecord::with_tags(id, tags)
        })
        .collect();
    let recommendations = (0..games + 5)
        .flat_map(|id| {
            (0..events_per_game).map(move |n| RecommendationRecord::new(id, (id + n) % 3 != 0))
        })
        .collect();
    (metadata, recommendations)
}

#[allow(dead_code)]
pub fn create_test_games() -> Vec<GameRecord> {
    vec![
        GameRecord::new(10, "Skyreach", Some(2019), 29.99),
        GameRecord::new(20, "Bullet Storm", Some(2019), 9.99),
        GameRecord::new(30, "Tiny Garden", Some(2021), 4.99),
        GameRecord::new(40, "Block Logic", None, 0.0),
        GameRecord::new(60, "Empire Forge", Some(2021), 59.99),
    ]
}
