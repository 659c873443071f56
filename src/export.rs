//! Playlist export from a prefix of the ranked output.
//!
//! Two targets: a CSV for playlist importers, keyed by ISRC where known,
//! and a `watch_videos` URL that opens the songs as an anonymous YouTube
//! or YouTube Music playlist.

use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::Write;
use std::path::Path;

use crate::scoring::ScoredItem;

const YOUTUBE_PLAYLIST_BASE: &str = "https://www.youtube.com/watch_videos?video_ids=";
const YOUTUBE_MUSIC_PLAYLIST_BASE: &str = "https://music.youtube.com/watch_videos?video_ids=";

pub const CSV_HEADER: [&str; 8] = [
    "rank",
    "title",
    "artist",
    "isrc",
    "spotify_id",
    "youtube_id",
    "youtube_music_id",
    "apple_music_url",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaylistTarget {
    /// Prefers `video_id`, falls back to `music_id`
    Youtube,
    /// Prefers `music_id`, falls back to `video_id`
    YoutubeMusic,
}

/// A playlist URL plus the songs left out for lack of an id.
#[derive(Debug, Clone, PartialEq)]
pub struct Playlist {
    pub url: String,
    pub included: usize,
    pub missing: Vec<String>,
}

fn display_name(scored: &ScoredItem<'_>) -> String {
    format!("{} - {}", scored.item.artist, scored.item.name)
}

/// Build a playlist URL from ranked songs, skipping songs with no usable id.
pub fn build_playlist(items: &[ScoredItem<'_>], target: PlaylistTarget) -> Playlist {
    let mut ids = Vec::new();
    let mut missing = Vec::new();

    for scored in items {
        let media = &scored.item.media;
        let id = match target {
            PlaylistTarget::Youtube => media.youtube_video_id().or(media.youtube_music_id()),
            PlaylistTarget::YoutubeMusic => media.youtube_music_id().or(media.youtube_video_id()),
        };
        match id {
            Some(id) => ids.push(id),
            None => missing.push(display_name(scored)),
        }
    }

    let base = match target {
        PlaylistTarget::Youtube => YOUTUBE_PLAYLIST_BASE,
        PlaylistTarget::YoutubeMusic => YOUTUBE_MUSIC_PLAYLIST_BASE,
    };

    Playlist {
        url: format!("{}{}", base, ids.join(",")),
        included: ids.len(),
        missing,
    }
}

/// Songs whose id is not an ISRC, for reporting before import.
pub fn missing_isrc(items: &[ScoredItem<'_>]) -> Vec<String> {
    items
        .iter()
        .filter(|scored| scored.item.isrc().is_none())
        .map(display_name)
        .collect()
}

/// Write ranked songs as CSV with a header row.
pub fn write_csv<W: Write>(items: &[ScoredItem<'_>], writer: W) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new().from_writer(writer);
    csv_writer
        .write_record(CSV_HEADER)
        .context("Failed to write CSV header")?;

    for scored in items {
        let item = scored.item;
        let media = &item.media;
        let rank = scored.rank.to_string();
        csv_writer
            .write_record([
                rank.as_str(),
                item.name.as_str(),
                item.artist.as_str(),
                item.isrc().unwrap_or(""),
                media.spotify_id().unwrap_or(""),
                media.youtube_video_id().unwrap_or(""),
                media.youtube_music_id().unwrap_or(""),
                media.apple_music_url().unwrap_or(""),
            ])
            .with_context(|| format!("Failed to write CSV row for {}", display_name(scored)))?;
    }

    csv_writer.flush().context("Failed to flush CSV output")?;
    Ok(())
}

/// Write content to a file atomically; the file is never left half-written.
pub fn write_file_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(content)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    file.commit()
        .with_context(|| format!("Failed to save {}", path.display()))?;
    Ok(())
}

/// Default CSV file name for a top-N export.
pub fn default_csv_filename(count: usize) -> String {
    format!("consensus-best-songs-top-{}.csv", count)
}
