use serde::Serialize;
use std::time::Instant;

use super::aggregate::{aggregate, SourceContribution};
use super::boosts::{calculate_boosts, ClusterSummary, Multipliers};
use super::config::ScoringConfig;
use super::rank::{assign_ranks, normalize};
use crate::dataset::{CorpusConstants, Item};

/// An item annotated with every intermediate of its score.
///
/// Built fresh on each pass; nothing here is updated in place across passes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredItem<'a> {
    pub item: &'a Item,
    pub base_score: f64,
    pub multipliers: Multipliers,
    pub raw_score: f64,
    pub normalized_score: f64,
    /// 1-based placement; 0 until ranks are assigned
    pub rank: usize,
    pub source_contributions: Vec<SourceContribution>,
    pub clusters: ClusterSummary,
    /// Lowest effective rank over recognized appearances
    pub min_rank: Option<f64>,
    /// Appearances that resolved to a configured source and rank
    pub recognized_count: usize,
}

/// Score one item: aggregate contributions, then apply the three boosts.
/// The result is unnormalized and unranked.
pub fn score_item<'a>(
    item: &'a Item,
    config: &ScoringConfig,
    corpus: &CorpusConstants,
    rank_cutoff: Option<f64>,
) -> ScoredItem<'a> {
    let params = &config.ranking;
    let agg = aggregate(item, params, &config.sources, rank_cutoff);
    let clusters = ClusterSummary::from_placements(&agg.placements, params.cluster_threshold);
    let multipliers = calculate_boosts(&agg.ranks, &clusters, params, corpus.ln_max_list_count);
    let min_rank = agg.ranks.iter().copied().reduce(f64::min);

    ScoredItem {
        item,
        base_score: agg.base_score,
        raw_score: agg.base_score * multipliers.product(),
        multipliers,
        normalized_score: 0.0,
        rank: 0,
        source_contributions: agg.contributions,
        clusters,
        min_rank,
        recognized_count: agg.ranks.len(),
    }
}

/// Run one full scoring pass and return every item sorted best-first with
/// dense ranks `1..=n`.
///
/// `rank_cutoff` drops appearances ranked past it from the score; see
/// [`aggregate`]. Pure: the same inputs always produce the same output.
pub fn compute_rankings<'a, I>(
    items: I,
    config: &ScoringConfig,
    corpus: &CorpusConstants,
    rank_cutoff: Option<f64>,
) -> Vec<ScoredItem<'a>>
where
    I: IntoIterator<Item = &'a Item>,
{
    let start = Instant::now();

    let mut scored: Vec<ScoredItem<'a>> = items
        .into_iter()
        .map(|item| score_item(item, config, corpus, rank_cutoff))
        .collect();

    normalize(&mut scored);
    let ranked = assign_ranks(scored);

    tracing::debug!(
        items = ranked.len(),
        mode = config.ranking.decay_mode.as_str(),
        "scoring pass finished in {:?}",
        start.elapsed()
    );

    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Media, SourceAppearance};
    use crate::scoring::{DecayMode, RankingParameters, SourceConfig, SourceMap, SourceType};

    fn source(weight: f64, cluster: &str) -> SourceConfig {
        SourceConfig {
            weight,
            cluster: cluster.to_string(),
            source_type: SourceType::Ranked,
            shadow_rank: None,
            song_count: 100,
            full_name: None,
        }
    }

    fn sample_item(name: &str, artist: &str, placements: &[(&str, f64)]) -> Item {
        Item {
            id: format!("ID-{}", name),
            name: name.to_string(),
            artist: artist.to_string(),
            sources: placements
                .iter()
                .map(|(source, rank)| SourceAppearance {
                    source_name: source.to_string(),
                    rank: Some(*rank),
                    uses_shadow_rank: false,
                    quote: None,
                })
                .collect(),
            list_count: placements.len() as u32,
            media: Media::default(),
        }
    }

    fn sample_config() -> ScoringConfig {
        let mut sources = SourceMap::new();
        sources.insert("Pitchfork".to_string(), source(1.0, "Tastemakers"));
        sources.insert("Stereogum".to_string(), source(0.7, "Tastemakers"));
        sources.insert("Rolling Stone".to_string(), source(1.0, "Critical Authority"));
        sources.insert("Variety".to_string(), source(0.5, "Mainstream"));
        ScoringConfig {
            ranking: RankingParameters {
                decay_mode: DecayMode::Consensus,
                k_value: 10.0,
                consensus_boost: 0.1,
                provocation_boost: 0.1,
                cluster_boost: 0.05,
                cluster_threshold: 25,
                rank1_bonus: 1.1,
                ..RankingParameters::default()
            },
            sources,
        }
    }

    #[test]
    fn test_single_item_example() {
        let items = vec![sample_item("Only", "Artist", &[("Pitchfork", 1.0)])];
        let corpus = CorpusConstants::from_items(&items);
        let ranked = compute_rankings(&items, &sample_config(), &corpus, None);

        assert_eq!(ranked.len(), 1);
        let top = &ranked[0];
        assert!((top.base_score - 1.1).abs() < 1e-12);
        assert_eq!(top.multipliers, Multipliers::default());
        assert!((top.raw_score - 1.1).abs() < 1e-12);
        assert_eq!(top.normalized_score, 1.0);
        assert_eq!(top.rank, 1);
        assert_eq!(top.min_rank, Some(1.0));
    }

    #[test]
    fn test_raw_score_is_base_times_all_boosts() {
        let items = vec![
            sample_item("Wide", "A", &[("Pitchfork", 2.0), ("Rolling Stone", 80.0), ("Variety", 5.0)]),
            sample_item("Narrow", "B", &[("Stereogum", 3.0)]),
        ];
        let corpus = CorpusConstants::from_items(&items);
        let ranked = compute_rankings(&items, &sample_config(), &corpus, None);

        let wide = ranked.iter().find(|s| s.item.name == "Wide").unwrap();
        assert!((wide.multipliers.consensus - 1.1).abs() < 1e-12);
        assert!(wide.multipliers.provocation > 1.0);
        // Rolling Stone at 80 misses the threshold: two qualifying clusters
        assert!((wide.multipliers.cluster - 1.05).abs() < 1e-12);
        let expected = wide.base_score
            * wide.multipliers.consensus
            * wide.multipliers.provocation
            * wide.multipliers.cluster;
        assert!((wide.raw_score - expected).abs() < 1e-12);
        assert_eq!(wide.clusters.all.len(), 3);
        assert_eq!(wide.recognized_count, 3);
    }

    #[test]
    fn test_item_without_recognized_sources_ranks_last() {
        let items = vec![
            sample_item("Ghost", "Nobody", &[("Unknown Zine", 1.0)]),
            sample_item("Real", "Somebody", &[("Variety", 40.0)]),
        ];
        let corpus = CorpusConstants::from_items(&items);
        let ranked = compute_rankings(&items, &sample_config(), &corpus, None);

        let last = &ranked[1];
        assert_eq!(last.item.name, "Ghost");
        assert_eq!(last.base_score, 0.0);
        assert_eq!(last.multipliers, Multipliers::default());
        assert_eq!(last.normalized_score, 0.0);
        assert_eq!(last.min_rank, None);
        assert_eq!(last.rank, 2);
    }

    #[test]
    fn test_all_zero_scores_normalize_to_zero() {
        let mut config = sample_config();
        for source in config.sources.values_mut() {
            source.weight = 0.0;
        }
        let items = vec![
            sample_item("One", "A", &[("Pitchfork", 1.0)]),
            sample_item("Two", "B", &[("Variety", 1.0)]),
        ];
        let corpus = CorpusConstants::from_items(&items);
        let ranked = compute_rankings(&items, &config, &corpus, None);

        assert!(ranked.iter().all(|s| s.normalized_score == 0.0));
        let ranks: Vec<usize> = ranked.iter().map(|s| s.rank).collect();
        assert_eq!(ranks, vec![1, 2]);
    }

    #[test]
    fn test_repeated_passes_are_identical() {
        let items = vec![
            sample_item("A", "X", &[("Pitchfork", 4.0), ("Variety", 9.0)]),
            sample_item("B", "Y", &[("Rolling Stone", 1.0)]),
            sample_item("C", "Z", &[("Stereogum", 2.0), ("Pitchfork", 30.0)]),
        ];
        let corpus = CorpusConstants::from_items(&items);
        let config = sample_config();
        let first = compute_rankings(&items, &config, &corpus, None);
        let second = compute_rankings(&items, &config, &corpus, None);
        assert_eq!(first, second);
    }

    #[test]
    fn test_conviction_mode_changes_scores() {
        let items = vec![sample_item("Deep", "A", &[("Pitchfork", 100.0)])];
        let corpus = CorpusConstants::from_items(&items);
        let mut config = sample_config();
        config.ranking.decay_mode = DecayMode::Conviction;
        config.ranking.p_exponent = 0.5;
        let ranked = compute_rankings(&items, &config, &corpus, None);
        assert!((ranked[0].base_score - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_empty_input() {
        let items: Vec<Item> = vec![];
        let corpus = CorpusConstants::from_items(&items);
        assert!(compute_rankings(&items, &sample_config(), &corpus, None).is_empty());
    }
}
