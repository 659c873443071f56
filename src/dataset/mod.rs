mod types;
mod validation;

pub use types::{
    AppleMusicMedia, CorpusConstants, Dataset, Item, Media, SourceAppearance, SpotifyMedia,
    YoutubeMedia,
};
pub use validation::{dataset_warnings, validate_dataset};

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Load a dataset (`data.json`) from disk.
///
/// Only serde's structural checks run here; see [`validate_dataset`] for
/// rank checks. Appearances on unconfigured sources and other soft
/// inconsistencies are logged as warnings.
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open dataset at {}", path.display()))?;

    let dataset: Dataset = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse dataset: invalid JSON in {}", path.display()))?;

    tracing::info!(
        songs = dataset.songs.len(),
        sources = dataset.config.sources.len(),
        "Loaded dataset from {}",
        path.display()
    );

    for (source, count) in unknown_source_references(&dataset) {
        tracing::warn!("{} appearances reference unconfigured source '{}'", count, source);
    }
    for warning in dataset_warnings(&dataset) {
        tracing::warn!("{}", warning);
    }

    Ok(dataset)
}

/// Count appearances per source name that has no entry in the dataset config.
pub fn unknown_source_references(dataset: &Dataset) -> BTreeMap<&str, usize> {
    let mut unknown = BTreeMap::new();
    for song in &dataset.songs {
        for appearance in &song.sources {
            if !dataset.config.sources.contains_key(&appearance.source_name) {
                *unknown.entry(appearance.source_name.as_str()).or_insert(0) += 1;
            }
        }
    }
    unknown
}
