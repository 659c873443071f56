use std::cmp::Reverse;

use super::engine::ScoredItem;

/// Scale every raw score by the largest one so the top item lands on 1.0.
/// An empty set or a zero maximum divides by 1 instead.
pub fn normalize(items: &mut [ScoredItem<'_>]) {
    let max_raw = items
        .iter()
        .map(|scored| scored.raw_score)
        .reduce(f64::max)
        .unwrap_or(0.0);
    let divisor = if max_raw == 0.0 { 1.0 } else { max_raw };

    for scored in items.iter_mut() {
        scored.normalized_score = scored.raw_score / divisor;
    }
}

/// Sort key for final placement; smaller sorts first.
///
/// Scores and min ranks are compared as scaled integers so that values
/// differing only by floating-point noise tie and fall through to the
/// next key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct PlacementKey {
    score: Reverse<i64>,
    list_count: Reverse<u32>,
    min_rank: i64,
    name: String,
    artist: String,
}

impl PlacementKey {
    pub fn of(scored: &ScoredItem<'_>) -> Self {
        // Validated ranks (>= 1) keep every score finite
        debug_assert!(
            scored.normalized_score.is_finite(),
            "non-finite score for {}",
            scored.item.name
        );
        Self {
            score: Reverse((scored.normalized_score * 1e8).round() as i64),
            list_count: Reverse(scored.item.list_count),
            min_rank: scored
                .min_rank
                .map(|rank| (rank * 100.0).round() as i64)
                .unwrap_or(i64::MAX),
            name: scored.item.name.to_lowercase(),
            artist: scored.item.artist.to_lowercase(),
        }
    }
}

/// Sort best-first by [`PlacementKey`] and number the result `1..=n`.
pub fn assign_ranks(mut items: Vec<ScoredItem<'_>>) -> Vec<ScoredItem<'_>> {
    items.sort_by_cached_key(PlacementKey::of);
    for (index, scored) in items.iter_mut().enumerate() {
        scored.rank = index + 1;
    }
    items
}
