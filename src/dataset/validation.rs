use std::collections::BTreeMap;

use super::types::{Dataset, Item};
use crate::scoring::SourceType;

fn song_label(song: &Item) -> String {
    format!("{} - {}", song.artist, song.name)
}

/// Validate song placements before they reach the engine.
/// Returns all validation errors at once (not just the first).
///
/// Ranks must be finite and at least 1, and only unranked sources may be
/// read through their shadow rank. Appearances on unconfigured sources are
/// left to the unknown-source report.
pub fn validate_dataset(dataset: &Dataset) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    for (index, song) in dataset.songs.iter().enumerate() {
        for appearance in &song.sources {
            let path = format!("songs[{}].{}", index, appearance.source_name);

            if let Some(rank) = appearance.rank {
                if !rank.is_finite() || rank < 1.0 {
                    errors.push(format!(
                        "{} ({}): rank {} must be a finite number >= 1",
                        path,
                        song_label(song),
                        rank
                    ));
                }
            }

            let Some(source) = dataset.config.sources.get(&appearance.source_name) else {
                continue;
            };
            if appearance.uses_shadow_rank && source.source_type == SourceType::Ranked {
                errors.push(format!(
                    "{} ({}): uses_shadow_rank on ranked source",
                    path,
                    song_label(song)
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Soft inconsistencies that scoring tolerates but that point at a bad export.
pub fn dataset_warnings(dataset: &Dataset) -> Vec<String> {
    let mut warnings = Vec::new();
    let mut ids: BTreeMap<&str, usize> = BTreeMap::new();

    for song in &dataset.songs {
        *ids.entry(song.id.as_str()).or_insert(0) += 1;

        if song.list_count as usize != song.sources.len() {
            warnings.push(format!(
                "{}: list_count {} but {} source entries",
                song_label(song),
                song.list_count,
                song.sources.len()
            ));
        }

        for appearance in &song.sources {
            if appearance.rank.is_none() && !appearance.uses_shadow_rank {
                warnings.push(format!(
                    "{}: {} has neither rank nor uses_shadow_rank",
                    song_label(song),
                    appearance.source_name
                ));
            }
        }
    }

    for (id, count) in ids {
        if count > 1 {
            warnings.push(format!("song id '{}' appears {} times", id, count));
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Media, SourceAppearance};
    use crate::scoring::{ScoringConfig, SourceConfig};

    fn source(source_type: SourceType, shadow_rank: Option<f64>) -> SourceConfig {
        SourceConfig {
            weight: 1.0,
            cluster: "Tastemakers".to_string(),
            source_type,
            shadow_rank,
            song_count: 50,
            full_name: None,
        }
    }

    fn appearance(name: &str, rank: Option<f64>, shadow: bool) -> SourceAppearance {
        SourceAppearance {
            source_name: name.to_string(),
            rank,
            uses_shadow_rank: shadow,
            quote: None,
        }
    }

    fn song(id: &str, sources: Vec<SourceAppearance>) -> Item {
        Item {
            id: id.to_string(),
            name: format!("Song {}", id),
            artist: "Artist".to_string(),
            list_count: sources.len() as u32,
            sources,
            media: Media::default(),
        }
    }

    fn dataset(songs: Vec<Item>) -> Dataset {
        let mut config = ScoringConfig::default();
        config
            .sources
            .insert("Pitchfork".to_string(), source(SourceType::Ranked, None));
        config
            .sources
            .insert("NPR".to_string(), source(SourceType::Unranked, Some(20.0)));
        Dataset { config, songs }
    }

    #[test]
    fn test_valid_dataset() {
        let data = dataset(vec![
            song("a", vec![appearance("Pitchfork", Some(1.0), false)]),
            song("b", vec![appearance("NPR", None, true)]),
        ]);
        assert!(validate_dataset(&data).is_ok());
        assert!(dataset_warnings(&data).is_empty());
    }

    #[test]
    fn test_rank_below_one_rejected() {
        let data = dataset(vec![song("a", vec![appearance("Pitchfork", Some(0.0), false)])]);
        let errors = validate_dataset(&data).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("songs[0].Pitchfork"));
        assert!(errors[0].contains("rank 0 must be a finite number >= 1"));
    }

    #[test]
    fn test_non_finite_rank_rejected() {
        let data = dataset(vec![song("a", vec![appearance("Pitchfork", Some(f64::NAN), false)])]);
        assert!(validate_dataset(&data).is_err());
    }

    #[test]
    fn test_rank_checked_on_unknown_sources_too() {
        let data = dataset(vec![song("a", vec![appearance("Ghost Blog", Some(-2.0), false)])]);
        assert_eq!(validate_dataset(&data).unwrap_err().len(), 1);
    }

    #[test]
    fn test_shadow_rank_on_ranked_source_rejected() {
        let data = dataset(vec![song("a", vec![appearance("Pitchfork", None, true)])]);
        let errors = validate_dataset(&data).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("uses_shadow_rank on ranked source"));
    }

    #[test]
    fn test_collects_all_errors() {
        let data = dataset(vec![
            song("a", vec![appearance("Pitchfork", Some(0.5), false)]),
            song("b", vec![appearance("Pitchfork", Some(3.0), true)]),
        ]);
        assert_eq!(validate_dataset(&data).unwrap_err().len(), 2);
    }

    #[test]
    fn test_list_count_mismatch_warns() {
        let mut odd = song("a", vec![appearance("Pitchfork", Some(4.0), false)]);
        odd.list_count = 3;
        let data = dataset(vec![odd]);
        assert!(validate_dataset(&data).is_ok());

        let warnings = dataset_warnings(&data);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("list_count 3 but 1 source entries"));
    }

    #[test]
    fn test_duplicate_ids_warn() {
        let data = dataset(vec![
            song("dup", vec![appearance("Pitchfork", Some(4.0), false)]),
            song("dup", vec![appearance("Pitchfork", Some(5.0), false)]),
        ]);
        let warnings = dataset_warnings(&data);
        assert_eq!(warnings, vec!["song id 'dup' appears 2 times".to_string()]);
    }

    #[test]
    fn test_missing_rank_warns() {
        let data = dataset(vec![song("a", vec![appearance("Pitchfork", None, false)])]);
        assert!(validate_dataset(&data).is_ok());
        assert_eq!(dataset_warnings(&data).len(), 1);
    }
}
