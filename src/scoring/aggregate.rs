use serde::Serialize;

use super::config::{RankingParameters, SourceMap};
use super::decay::decay;
use crate::dataset::{Item, SourceAppearance};

/// One source's share of an item's base score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceContribution {
    pub source_name: String,
    pub rank: f64,
    pub contribution: f64,
}

/// A recognized appearance reduced to what boosts need.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub cluster: String,
    pub rank: f64,
}

/// Output of walking one item's appearances.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregate {
    pub base_score: f64,
    /// Effective ranks in appearance order
    pub ranks: Vec<f64>,
    pub placements: Vec<Placement>,
    /// Sorted by contribution, highest first
    pub contributions: Vec<SourceContribution>,
}

/// Effective rank of an appearance: the source's shadow rank for unranked
/// appearances, the reported rank otherwise. `None` when the source is
/// unknown or the needed rank is missing.
pub fn resolve_rank(appearance: &SourceAppearance, sources: &SourceMap) -> Option<f64> {
    let source = sources.get(&appearance.source_name)?;
    if appearance.uses_shadow_rank {
        source.shadow_rank
    } else {
        appearance.rank
    }
}

/// Sum weighted decay over an item's recognized appearances.
///
/// With a `rank_cutoff`, appearances ranked past it stay in `contributions`
/// at 0.0 but are left out of the score and of `ranks` and `placements`.
pub fn aggregate(
    item: &Item,
    params: &RankingParameters,
    sources: &SourceMap,
    rank_cutoff: Option<f64>,
) -> Aggregate {
    let mut result = Aggregate::default();

    for appearance in &item.sources {
        let Some(source) = sources.get(&appearance.source_name) else {
            tracing::debug!(
                song = %item.name,
                source = %appearance.source_name,
                "skipping appearance on unconfigured source"
            );
            continue;
        };
        let Some(rank) = resolve_rank(appearance, sources) else {
            tracing::debug!(
                song = %item.name,
                source = %appearance.source_name,
                "skipping appearance without a usable rank"
            );
            continue;
        };
        if rank_cutoff.is_some_and(|cutoff| rank > cutoff) {
            result.contributions.push(SourceContribution {
                source_name: appearance.source_name.clone(),
                rank,
                contribution: 0.0,
            });
            continue;
        }

        let contribution = decay(rank, params) * source.weight;
        result.base_score += contribution;
        result.ranks.push(rank);
        result.placements.push(Placement {
            cluster: source.cluster.clone(),
            rank,
        });
        result.contributions.push(SourceContribution {
            source_name: appearance.source_name.clone(),
            rank,
            contribution,
        });
    }

    // Stable: equal contributions keep appearance order
    result
        .contributions
        .sort_by(|a, b| b.contribution.total_cmp(&a.contribution));

    result
}
