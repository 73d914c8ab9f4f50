//! Share of positive recommendations per title.

use crate::aggregate::hash_join;
use gamestats_common::{GameRecord, RecommendationRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Positive and total recommendation counts for one title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewShare {
    pub title: String,
    pub positive: u64,
    pub total: u64,
    pub percentage: f64,
}

impl fmt::Display for ReviewShare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {:.2}% ({}/{})",
            self.title, self.percentage, self.positive, self.total
        )
    }
}

/// Percentage of positive recommendations for titles with more than
/// `min_reviews` recommendations.
///
/// Games sharing a title are grouped together. Sorted by percentage
/// descending, then title ascending.
pub fn positive_review_percentage(
    games: &[GameRecord],
    recommendations: &[RecommendationRecord],
    min_reviews: u64,
) -> Vec<ReviewShare> {
    let mut by_title: HashMap<&str, (u64, u64)> = HashMap::new();
    let joined = hash_join(
        games,
        |g: &GameRecord| g.app_id,
        recommendations,
        |r: &RecommendationRecord| r.app_id,
    );
    for (game, recommendation) in joined {
        let entry = by_title.entry(game.title.as_str()).or_default();
        entry.0 += u64::from(recommendation.is_recommended);
        entry.1 += 1;
    }

    let mut shares: Vec<ReviewShare> = by_title
        .into_iter()
        .filter(|(_, (_, total))| *total > min_reviews)
        .map(|(title, (positive, total))| ReviewShare {
            title: title.to_string(),
            positive,
            total,
            percentage: positive as f64 / total as f64 * 100.0,
        })
        .collect();
    shares.sort_by(|a, b| {
        b.percentage
            .total_cmp(&a.percentage)
            .then_with(|| a.title.cmp(&b.title))
    });
    shares
}
