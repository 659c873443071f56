use serde::{Deserialize, Serialize};

use crate::scoring::ScoringConfig;

/// One song's placement on a source list.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct SourceAppearance {
    #[serde(rename = "name")]
    pub source_name: String,

    /// Position on the list; absent for unranked lists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<f64>,

    /// Take the source's shadow rank instead of `rank`
    #[serde(default)]
    pub uses_shadow_rank: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct YoutubeMedia {
    #[serde(default)]
    pub video_id: Option<String>,
    #[serde(default)]
    pub music_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct SpotifyMedia {
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct AppleMusicMedia {
    #[serde(default)]
    pub url: Option<String>,
}

/// Streaming links for a song. Only consumed by export.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Media {
    #[serde(default)]
    pub youtube: Option<YoutubeMedia>,
    #[serde(default)]
    pub spotify: Option<SpotifyMedia>,
    #[serde(default)]
    pub apple_music: Option<AppleMusicMedia>,
}

impl Media {
    pub fn youtube_video_id(&self) -> Option<&str> {
        self.youtube.as_ref()?.video_id.as_deref().filter(|s| !s.is_empty())
    }

    pub fn youtube_music_id(&self) -> Option<&str> {
        self.youtube.as_ref()?.music_id.as_deref().filter(|s| !s.is_empty())
    }

    pub fn spotify_id(&self) -> Option<&str> {
        self.spotify.as_ref()?.id.as_deref().filter(|s| !s.is_empty())
    }

    pub fn apple_music_url(&self) -> Option<&str> {
        self.apple_music.as_ref()?.url.as_deref().filter(|s| !s.is_empty())
    }
}

/// A song as loaded from the dataset. Never mutated by scoring.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Item {
    /// ISRC where known, otherwise a synthetic `prefix:...` id
    pub id: String,
    pub name: String,
    pub artist: String,
    #[serde(default)]
    pub sources: Vec<SourceAppearance>,
    pub list_count: u32,
    #[serde(default)]
    pub media: Media,
}

impl Item {
    /// The ISRC, if the id is one (synthetic ids contain a colon).
    pub fn isrc(&self) -> Option<&str> {
        if self.id.is_empty() || self.id.contains(':') {
            None
        } else {
            Some(&self.id)
        }
    }
}

/// The full dataset file: embedded default config plus songs.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Dataset {
    #[serde(default)]
    pub config: ScoringConfig,
    pub songs: Vec<Item>,
}

/// Values derived from the whole corpus once per load.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorpusConstants {
    /// `ln(max list_count)`, or 0 when no item sits on more than one list
    pub ln_max_list_count: f64,
}

impl CorpusConstants {
    pub fn from_items(items: &[Item]) -> Self {
        let max_list_count = items.iter().map(|item| item.list_count).max().unwrap_or(0);
        let ln_max_list_count = if max_list_count > 1 {
            (max_list_count as f64).ln()
        } else {
            0.0
        };
        Self { ln_max_list_count }
    }
}
