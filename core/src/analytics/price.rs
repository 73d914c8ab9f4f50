//! Price reports: average price per release year and recommendations per
//! price bucket.

use crate::aggregate::hash_join;
use gamestats_common::{GameRecord, RecommendationRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Mean final price of the games released in one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearAverage {
    pub year: i32,
    pub games: usize,
    pub average_price: f64,
}

impl fmt::Display for YearAverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:.2}", self.year, self.average_price)
    }
}

/// Average `price_final` per release year, ascending by year.
///
/// Games without a release year are left out.
pub fn average_price_by_year(games: &[GameRecord]) -> Vec<YearAverage> {
    let mut by_year: BTreeMap<i32, (f64, usize)> = BTreeMap::new();
    for game in games {
        if let Some(year) = game.year_release {
            let entry = by_year.entry(year).or_insert((0.0, 0));
            entry.0 += game.price_final;
            entry.1 += 1;
        }
    }

    by_year
        .into_iter()
        .map(|(year, (sum, games))| YearAverage {
            year,
            games,
            average_price: sum / games as f64,
        })
        .collect()
}

/// Right-closed price ranges. Declaration order is the report's tie order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PriceBucket {
    UpTo10,
    UpTo20,
    UpTo30,
    UpTo40,
    UpTo50,
    UpTo60,
    Over60,
}

impl PriceBucket {
    pub const ALL: [PriceBucket; 7] = [
        PriceBucket::UpTo10,
        PriceBucket::UpTo20,
        PriceBucket::UpTo30,
        PriceBucket::UpTo40,
        PriceBucket::UpTo50,
        PriceBucket::UpTo60,
        PriceBucket::Over60,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PriceBucket::UpTo10 => "0-9",
            PriceBucket::UpTo20 => "10-19",
            PriceBucket::UpTo30 => "20-29",
            PriceBucket::UpTo40 => "30-39",
            PriceBucket::UpTo50 => "40-49",
            PriceBucket::UpTo60 => "50-59",
            PriceBucket::Over60 => "60+",
        }
    }

    /// Bucket for a price, with edges `0, 10, 20, 30, 40, 50, 60, 61`.
    ///
    /// Each bucket excludes its lower edge and includes its upper edge, so a
    /// free game (price 0) and anything above 61 fall in no bucket.
    pub fn from_price(price: f64) -> Option<Self> {
        if !(price > 0.0 && price <= 61.0) {
            return None;
        }
        let bucket = match price {
            p if p <= 10.0 => PriceBucket::UpTo10,
            p if p <= 20.0 => PriceBucket::UpTo20,
            p if p <= 30.0 => PriceBucket::UpTo30,
            p if p <= 40.0 => PriceBucket::UpTo40,
            p if p <= 50.0 => PriceBucket::UpTo50,
            p if p <= 60.0 => PriceBucket::UpTo60,
            _ => PriceBucket::Over60,
        };
        Some(bucket)
    }
}

impl fmt::Display for PriceBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Positive recommendations counted in one price bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketCount {
    pub bucket: PriceBucket,
    pub count: u64,
}

impl fmt::Display for BucketCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.bucket, self.count)
    }
}

/// Positive recommendations per price bucket of the recommended game.
///
/// Every bucket is reported, empty ones with a zero count, ordered by count
/// descending and then by bucket.
pub fn recommendations_by_price_bucket(
    games: &[GameRecord],
    recommendations: &[RecommendationRecord],
) -> Vec<BucketCount> {
    let mut counts: BTreeMap<PriceBucket, u64> =
        PriceBucket::ALL.iter().map(|bucket| (*bucket, 0)).collect();

    let joined = hash_join(
        games,
        |g: &GameRecord| g.app_id,
        recommendations,
        |r: &RecommendationRecord| r.app_id,
    );
    for (game, recommendation) in joined {
        if !recommendation.is_recommended {
            continue;
        }
        if let Some(bucket) = PriceBucket::from_price(game.price_final) {
            *counts.entry(bucket).or_default() += 1;
        }
    }

    let mut result: Vec<BucketCount> = counts
        .into_iter()
        .map(|(bucket, count)| BucketCount { bucket, count })
        .collect();
    result.sort_by(|a, b| b.count.cmp(&a.count).then(a.bucket.cmp(&b.bucket)));
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_price_by_year() {
        let games = vec![
            GameRecord::new(1, "A", Some(2010), 10.0),
            GameRecord::new(2, "B", Some(2008), 4.0),
            GameRecord::new(3, "C", Some(2010), 20.0),
            GameRecord::new(4, "D", None, 99.0),
        ];
        let averages = average_price_by_year(&games);
        assert_eq!(averages.len(), 2);
        assert_eq!(averages[0].year, 2008);
        assert_eq!(averages[0].average_price, 4.0);
        assert_eq!(averages[1].year, 2010);
        assert_eq!(averages[1].games, 2);
        assert_eq!(averages[1].average_price, 15.0);
        assert_eq!(averages[1].to_string(), "2010: 15.00");
    }

    #[test]
    fn test_bucket_edges_are_right_closed() {
        assert_eq!(PriceBucket::from_price(0.0), None);
        assert_eq!(PriceBucket::from_price(0.99), Some(PriceBucket::UpTo10));
        assert_eq!(PriceBucket::from_price(10.0), Some(PriceBucket::UpTo10));
        assert_eq!(PriceBucket::from_price(10.01), Some(PriceBucket::UpTo20));
        assert_eq!(PriceBucket::from_price(60.0), Some(PriceBucket::UpTo60));
        assert_eq!(PriceBucket::from_price(60.5), Some(PriceBucket::Over60));
        assert_eq!(PriceBucket::from_price(61.0), Some(PriceBucket::Over60));
        assert_eq!(PriceBucket::from_price(69.99), None);
        assert_eq!(PriceBucket::from_price(f64::NAN), None);
    }

    #[test]
    fn test_recommendations_by_price_bucket() {
        let games = vec![
            GameRecord::new(1, "Cheap", None, 4.99),
            GameRecord::new(2, "Mid", None, 19.99),
            GameRecord::new(3, "Free", None, 0.0),
        ];
        let recommendations = vec![
            RecommendationRecord::new(1, true),
            RecommendationRecord::new(1, true),
            RecommendationRecord::new(1, false),
            RecommendationRecord::new(2, true),
            RecommendationRecord::new(3, true),
            RecommendationRecord::new(8, true),
        ];

        let buckets = recommendations_by_price_bucket(&games, &recommendations);
        assert_eq!(buckets.len(), PriceBucket::ALL.len());
        assert_eq!(buckets[0].to_string(), "0-9: 2");
        assert_eq!(buckets[1].to_string(), "10-19: 1");
        assert_eq!(buckets[2].bucket, PriceBucket::UpTo30);
        assert_eq!(buckets[2].count, 0);
        assert_eq!(buckets.last().map(|b| b.bucket), Some(PriceBucket::Over60));
    }
}
