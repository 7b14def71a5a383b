//! Configuration and replay/beatmap folder discovery

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::stats::ExportFormat;

/// Configuration for osu-analyzer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Folder scanned for `.osr` replays
    pub replays_dir: PathBuf,
    /// Folder scanned for `.osu` beatmaps
    pub beatmaps_dir: PathBuf,
    /// Format used when an export path has no recognised extension
    pub default_export_format: ExportFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            replays_dir: PathBuf::from("replays"),
            beatmaps_dir: PathBuf::from("beatmaps"),
            default_export_format: ExportFormat::Json,
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("osu-analyzer").join("config.json"))
    }

    /// Load config from disk, falling back to defaults if not found
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring unreadable config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load config from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid config {}: {}", path.display(), e)))
    }

    /// Save config to disk
    pub fn save(&self) -> Result<()> {
        match Self::config_path() {
            Some(path) => self.save_to(&path),
            None => Err(Error::Config(
                "No configuration directory on this platform".to_string(),
            )),
        }
    }

    /// Save config to a specific file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// `.osr` files directly inside the replays folder, sorted
    pub fn list_replays(&self) -> Vec<PathBuf> {
        list_files_with_extension(&self.replays_dir, "osr")
    }

    /// `.osu` files directly inside the beatmaps folder, sorted
    pub fn list_beatmaps(&self) -> Vec<PathBuf> {
        list_files_with_extension(&self.beatmaps_dir, "osu")
    }
}

fn list_files_with_extension(dir: &Path, extension: &str) -> Vec<PathBuf> {
    if !dir.is_dir() {
        tracing::debug!("Folder {} does not exist", dir.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case(extension))
                .unwrap_or(false)
        })
        .map(|e| e.into_path())
        .collect();

    files.sort();
    files
}
