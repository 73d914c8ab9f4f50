//! Tag counters and top-K selection.
//!
//! Ranking is a total order: higher count first, then tag ascending by byte
//! order. Every strategy ranks through [`select_top_k`], so equal inputs give
//! identical output, ties included.

use gamestats_common::expand_tags;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::fmt;

/// Number of contributions per tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    counts: HashMap<String, u64>,
}

impl TagCount {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one contribution for an already normalized tag.
    pub fn add(&mut self, tag: &str) {
        self.add_n(tag, 1);
    }

    pub fn add_n(&mut self, tag: &str, n: u64) {
        match self.counts.get_mut(tag) {
            Some(count) => *count += n,
            None => {
                self.counts.insert(tag.to_string(), n);
            }
        }
    }

    /// Count every usable tag of one record; returns the number counted.
    pub fn add_tags(&mut self, tags: &[Option<String>]) -> u64 {
        let mut added = 0;
        for tag in expand_tags(tags) {
            self.add(tag);
            added += 1;
        }
        added
    }

    /// Fold another counter into this one.
    pub fn merge(&mut self, other: TagCount) {
        if self.counts.is_empty() {
            self.counts = other.counts;
            return;
        }
        for (tag, n) in other.counts {
            *self.counts.entry(tag).or_insert(0) += n;
        }
    }

    pub fn get(&self, tag: &str) -> u64 {
        self.counts.get(tag).copied().unwrap_or(0)
    }

    /// Number of distinct tags
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(tag, n)| (tag.as_str(), *n))
    }

    pub fn top_k(&self, k: usize) -> TopKResult {
        select_top_k(self.iter(), k)
    }
}

impl From<HashMap<String, u64>> for TagCount {
    fn from(counts: HashMap<String, u64>) -> Self {
        Self { counts }
    }
}

impl IntoIterator for TagCount {
    type Item = (String, u64);
    type IntoIter = std::collections::hash_map::IntoIter<String, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.counts.into_iter()
    }
}

/// One entry of a ranking
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagRank {
    pub tag: String,
    pub count: u64,
}

impl TagRank {
    pub fn new(tag: impl Into<String>, count: u64) -> Self {
        Self {
            tag: tag.into(),
            count,
        }
    }
}

impl fmt::Display for TagRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.tag, self.count)
    }
}

/// `Less` means `(a_tag, a_count)` ranks ahead of `(b_tag, b_count)`.
fn rank_order(a_tag: &str, a_count: u64, b_tag: &str, b_count: u64) -> Ordering {
    b_count.cmp(&a_count).then_with(|| a_tag.cmp(b_tag))
}

// Heap entry ordered so the max-heap's top is the weakest retained entry.
#[derive(PartialEq, Eq)]
struct Ranked(TagRank);

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        rank_order(&self.0.tag, self.0.count, &other.0.tag, other.0.count)
    }
}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The K best-ranked tags, best first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopKResult(Vec<TagRank>);

impl TopKResult {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TagRank> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<TagRank> {
        self.0
    }

    /// `(tag, count)` pairs, convenient for comparisons in tests and reports.
    pub fn pairs(&self) -> Vec<(&str, u64)> {
        self.0.iter().map(|r| (r.tag.as_str(), r.count)).collect()
    }
}

impl fmt::Display for TopKResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in &self.0 {
            writeln!(f, "{rank}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a TopKResult {
    type Item = &'a TagRank;
    type IntoIter = std::slice::Iter<'a, TagRank>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Select the `k` best `(tag, count)` entries with a bounded heap.
///
/// Runs in O(n log k); only entries that enter the heap are copied. Tags are
/// expected to be distinct.
pub fn select_top_k<'a, I>(entries: I, k: usize) -> TopKResult
where
    I: IntoIterator<Item = (&'a str, u64)>,
{
    if k == 0 {
        return TopKResult::default();
    }

    let mut heap: BinaryHeap<Ranked> = BinaryHeap::new();
    for (tag, count) in entries {
        if heap.len() < k {
            heap.push(Ranked(TagRank::new(tag, count)));
            continue;
        }
        let beats_weakest = heap
            .peek()
            .is_some_and(|weakest| rank_order(tag, count, &weakest.0.tag, weakest.0.count).is_lt());
        if beats_weakest {
            heap.pop();
            heap.push(Ranked(TagRank::new(tag, count)));
        }
    }

    TopKResult(heap.into_sorted_vec().into_iter().map(|r| r.0).collect())
}
