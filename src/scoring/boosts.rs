use serde::Serialize;
use std::collections::BTreeMap;

use super::aggregate::Placement;
use super::config::RankingParameters;

/// The three independent multipliers applied to a base score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Multipliers {
    /// Breadth of coverage
    pub consensus: f64,
    /// Rank divergence across sources
    pub provocation: f64,
    /// Reach across source clusters
    pub cluster: f64,
}

impl Default for Multipliers {
    fn default() -> Self {
        Self {
            consensus: 1.0,
            provocation: 1.0,
            cluster: 1.0,
        }
    }
}

impl Multipliers {
    pub fn product(&self) -> f64 {
        self.consensus * self.provocation * self.cluster
    }
}

/// Per-cluster appearance counts, most frequent first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClusterSummary {
    /// Clusters of appearances within `cluster_threshold`
    pub qualifying: Vec<(String, usize)>,
    /// Clusters of every recognized appearance
    pub all: Vec<(String, usize)>,
}

impl ClusterSummary {
    pub fn from_placements(placements: &[Placement], threshold: u32) -> Self {
        let threshold = threshold as f64;
        Self {
            qualifying: count_clusters(placements.iter().filter(|p| p.rank <= threshold)),
            all: count_clusters(placements.iter()),
        }
    }

    pub fn best_qualifying(&self) -> Option<&str> {
        self.qualifying.first().map(|(name, _)| name.as_str())
    }

    pub fn best_overall(&self) -> Option<&str> {
        self.all.first().map(|(name, _)| name.as_str())
    }
}

fn count_clusters<'a>(placements: impl Iterator<Item = &'a Placement>) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for placement in placements {
        *counts.entry(placement.cluster.as_str()).or_insert(0) += 1;
    }
    let mut counts: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect();
    // BTreeMap order breaks count ties by name
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Population standard deviation (divides by n).
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

pub fn consensus_multiplier(list_len: usize, params: &RankingParameters, ln_max_list_count: f64) -> f64 {
    if list_len > 0 && ln_max_list_count > 0.0 {
        1.0 + params.consensus_boost * (list_len as f64).ln() / ln_max_list_count
    } else {
        1.0
    }
}

pub fn provocation_multiplier(ranks: &[f64], params: &RankingParameters) -> f64 {
    if ranks.len() > 1 {
        1.0 + params.provocation_boost * (population_std_dev(ranks) / 100.0)
    } else {
        1.0
    }
}

pub fn cluster_multiplier(qualifying_clusters: usize, params: &RankingParameters) -> f64 {
    if qualifying_clusters > 0 {
        1.0 + params.cluster_boost * (qualifying_clusters - 1) as f64
    } else {
        1.0
    }
}

/// Compute all three multipliers from an item's effective ranks and the
/// cluster summary of its placements.
pub fn calculate_boosts(
    ranks: &[f64],
    clusters: &ClusterSummary,
    params: &RankingParameters,
    ln_max_list_count: f64,
) -> Multipliers {
    Multipliers {
        consensus: consensus_multiplier(ranks.len(), params, ln_max_list_count),
        provocation: provocation_multiplier(ranks, params),
        cluster: cluster_multiplier(clusters.qualifying.len(), params),
    }
}
