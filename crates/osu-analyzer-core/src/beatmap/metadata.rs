//! Beatmap metadata structures

use serde::{Deserialize, Serialize};

/// Contents of a beatmap's `[Metadata]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BeatmapMetadata {
    /// Romanised song title
    pub title: Option<String>,
    /// Unicode song title
    pub title_unicode: Option<String>,
    /// Romanised artist name
    pub artist: Option<String>,
    /// Unicode artist name
    pub artist_unicode: Option<String>,
    /// Beatmap creator username
    pub creator: Option<String>,
    /// Difficulty name
    pub version: Option<String>,
    /// Source (game, anime, etc.)
    pub source: Option<String>,
    /// Tags for searching
    pub tags: Option<Vec<String>>,
    /// Online beatmap ID
    pub beatmap_id: i32,
    /// Online beatmap set ID
    pub beatmap_set_id: i32,
}

impl BeatmapMetadata {
    /// Get display title (unicode if available, otherwise romanised)
    pub fn display_title(&self) -> &str {
        self.title_unicode
            .as_deref()
            .or(self.title.as_deref())
            .unwrap_or("Unknown")
    }

    /// Get display artist (unicode if available, otherwise romanised)
    pub fn display_artist(&self) -> &str {
        self.artist_unicode
            .as_deref()
            .or(self.artist.as_deref())
            .unwrap_or("Unknown")
    }
}
