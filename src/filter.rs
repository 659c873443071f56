use serde::{Deserialize, Serialize};

use crate::dataset::Item;
use crate::scoring::{resolve_rank, SourceMap};

const MIN_SOURCES_FLOOR: u32 = 1;
const MIN_SOURCES_CEILING: u32 = 10;
const RANK_CUTOFF_CEILING: u32 = 100;

/// Which items take part in a scoring pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Filters {
    /// Minimum `list_count`, in [1, 10]
    pub min_sources: u32,
    /// Require an effective rank at or above this; 0 disables the check
    pub rank_cutoff: u32,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            min_sources: MIN_SOURCES_FLOOR,
            rank_cutoff: 0,
        }
    }
}

impl Filters {
    pub fn clamped(&self) -> Self {
        Self {
            min_sources: self.min_sources.clamp(MIN_SOURCES_FLOOR, MIN_SOURCES_CEILING),
            rank_cutoff: self.rank_cutoff.min(RANK_CUTOFF_CEILING),
        }
    }

    pub(crate) fn to_count(value: f64) -> u32 {
        value.max(0.0).min(u32::MAX as f64).round() as u32
    }

    /// The clamped cutoff as the scoring pass takes it; `None` when off.
    pub fn contribution_cutoff(&self) -> Option<f64> {
        match self.clamped().rank_cutoff {
            0 => None,
            cutoff => Some(cutoff as f64),
        }
    }

    /// `list_count` is checked as loaded, independent of the cutoff. An item
    /// with no appearance inside the cutoff would score nothing and is dropped.
    pub fn is_eligible(&self, item: &Item, sources: &SourceMap) -> bool {
        if item.list_count < self.min_sources {
            return false;
        }
        let Some(cutoff) = self.contribution_cutoff() else {
            return true;
        };
        item.sources
            .iter()
            .filter_map(|appearance| resolve_rank(appearance, sources))
            .any(|rank| rank <= cutoff)
    }
}

/// Items passing the (clamped) filters, in input order.
pub fn eligible_items<'a>(items: &'a [Item], sources: &SourceMap, filters: &Filters) -> Vec<&'a Item> {
    let filters = filters.clamped();
    items
        .iter()
        .filter(|item| filters.is_eligible(item, sources))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Media, SourceAppearance};
    use crate::scoring::{SourceConfig, SourceType};

    fn sources() -> SourceMap {
        let mut sources = SourceMap::new();
        sources.insert(
            "Pitchfork".to_string(),
            SourceConfig {
                weight: 1.0,
                cluster: "Tastemakers".to_string(),
                source_type: SourceType::Ranked,
                shadow_rank: None,
                song_count: 100,
                full_name: None,
            },
        );
        sources.insert(
            "NPR".to_string(),
            SourceConfig {
                weight: 1.0,
                cluster: "Critical Authority".to_string(),
                source_type: SourceType::Unranked,
                shadow_rank: Some(75.5),
                song_count: 100,
                full_name: None,
            },
        );
        sources
    }

    fn item(name: &str, placements: &[(&str, Option<f64>, bool)]) -> Item {
        Item {
            id: name.to_string(),
            name: name.to_string(),
            artist: "Artist".to_string(),
            sources: placements
                .iter()
                .map(|(source, rank, shadow)| SourceAppearance {
                    source_name: source.to_string(),
                    rank: *rank,
                    uses_shadow_rank: *shadow,
                    quote: None,
                })
                .collect(),
            list_count: placements.len() as u32,
            media: Media::default(),
        }
    }

    fn sample_items() -> Vec<Item> {
        vec![
            item("Solo", &[("Pitchfork", Some(3.0), false)]),
            item("Pair", &[("Pitchfork", Some(40.0), false), ("NPR", None, true)]),
            item("Shadow", &[("NPR", None, true)]),
        ]
    }

    fn eligible_names(filters: Filters) -> Vec<String> {
        let items = sample_items();
        eligible_items(&items, &sources(), &filters)
            .into_iter()
            .map(|i| i.name.clone())
            .collect()
    }

    #[test]
    fn test_default_filters_keep_everything() {
        assert_eq!(eligible_names(Filters::default()), vec!["Solo", "Pair", "Shadow"]);
    }

    #[test]
    fn test_min_sources() {
        let filters = Filters {
            min_sources: 2,
            rank_cutoff: 0,
        };
        assert_eq!(eligible_names(filters), vec!["Pair"]);
    }

    #[test]
    fn test_rank_cutoff_uses_effective_ranks() {
        let filters = Filters {
            min_sources: 1,
            rank_cutoff: 50,
        };
        // Shadow's only rank is 75.5
        assert_eq!(eligible_names(filters), vec!["Solo", "Pair"]);

        let filters = Filters {
            min_sources: 1,
            rank_cutoff: 1,
        };
        assert!(eligible_names(filters).is_empty());
    }

    #[test]
    fn test_min_sources_counts_lists_outside_the_cutoff() {
        // Pair's shadow rank of 75.5 is past the cutoff but still counts as a list
        let filters = Filters {
            min_sources: 2,
            rank_cutoff: 50,
        };
        assert_eq!(eligible_names(filters), vec!["Pair"]);
    }

    #[test]
    fn test_contribution_cutoff() {
        assert_eq!(Filters::default().contribution_cutoff(), None);
        let filters = Filters {
            min_sources: 1,
            rank_cutoff: 25,
        };
        assert_eq!(filters.contribution_cutoff(), Some(25.0));
        let filters = Filters {
            min_sources: 1,
            rank_cutoff: 400,
        };
        assert_eq!(filters.contribution_cutoff(), Some(100.0));
    }

    #[test]
    fn test_clamping() {
        let wild = Filters {
            min_sources: 0,
            rank_cutoff: 400,
        };
        assert_eq!(
            wild.clamped(),
            Filters {
                min_sources: 1,
                rank_cutoff: 100
            }
        );
        let high = Filters {
            min_sources: 99,
            rank_cutoff: 0,
        };
        assert_eq!(high.clamped().min_sources, 10);
    }

    #[test]
    fn test_to_count() {
        assert_eq!(Filters::to_count(-3.0), 0);
        assert_eq!(Filters::to_count(2.6), 3);
    }
}
