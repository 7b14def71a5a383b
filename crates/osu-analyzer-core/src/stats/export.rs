//! Export of analysis reports

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::analyzer::HitErrorAnalyzer;
use super::model::{format_stat, HitErrorStats};
use crate::beatmap::{BeatmapInfo, HitObjectKind};
use crate::error::{Error, Result};
use crate::replay::ReplayInfo;

/// Summary of the replay side of an analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplaySummary {
    pub player_name: Option<String>,
    pub mode: String,
    pub mods: String,
    pub score: i32,
    pub max_combo: u16,
    pub accuracy: f64,
    pub grade: String,
    pub frame_count: usize,
    pub beatmap_hash: Option<String>,
}

/// Summary of the beatmap side of an analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeatmapSummary {
    pub title: String,
    pub artist: String,
    pub version: Option<String>,
    pub creator: Option<String>,
    pub circle_size: f64,
    pub overall_difficulty: f64,
    pub hit_objects: usize,
    pub circles: usize,
    pub md5_hash: Option<String>,
}

/// Everything produced by analyzing one replay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub replay: ReplaySummary,
    pub beatmap: BeatmapSummary,
    /// `None` when either hash is unknown
    pub hash_matches: Option<bool>,
    pub stats: HitErrorStats,
}

impl From<&ReplayInfo> for ReplaySummary {
    fn from(replay: &ReplayInfo) -> Self {
        Self {
            player_name: replay.player_name.clone(),
            mode: replay.mode.to_string(),
            mods: replay.mods.to_string(),
            score: replay.score,
            max_combo: replay.max_combo,
            accuracy: replay.accuracy(),
            grade: replay.grade().to_string(),
            frame_count: replay.frames.len(),
            beatmap_hash: replay.beatmap_hash.clone(),
        }
    }
}

impl From<&BeatmapInfo> for BeatmapSummary {
    fn from(beatmap: &BeatmapInfo) -> Self {
        Self {
            title: beatmap.metadata.display_title().to_string(),
            artist: beatmap.metadata.display_artist().to_string(),
            version: beatmap.metadata.version.clone(),
            creator: beatmap.metadata.creator.clone(),
            circle_size: beatmap.difficulty.circle_size,
            overall_difficulty: beatmap.difficulty.overall_difficulty,
            hit_objects: beatmap.hit_objects.len(),
            circles: beatmap.count_of(HitObjectKind::Circle),
            md5_hash: beatmap.md5_hash.clone(),
        }
    }
}

impl AnalysisReport {
    pub fn new(beatmap: &BeatmapInfo, replay: &ReplayInfo, stats: HitErrorStats) -> Self {
        Self {
            replay: ReplaySummary::from(replay),
            beatmap: BeatmapSummary::from(beatmap),
            hash_matches: HitErrorAnalyzer::check_beatmap_hash(beatmap, replay),
            stats,
        }
    }
}

/// Export a report to JSON format
pub fn export_json(report: &AnalysisReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| Error::Export(format!("Failed to serialize report: {}", e)))?;

    let mut file = File::create(path)?;
    file.write_all(json.as_bytes())?;

    tracing::info!("Exported analysis to {}", path.display());
    Ok(())
}

/// Export a report to CSV format as `section,metric,value` rows
pub fn export_csv(report: &AnalysisReport, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| Error::Export(format!("Failed to create CSV file: {}", e)))?;

    let replay = &report.replay;
    let beatmap = &report.beatmap;
    let stats = &report.stats;

    let rows: Vec<(&str, &str, String)> = vec![
        ("Replay", "Player", replay.player_name.clone().unwrap_or_default()),
        ("Replay", "Mode", replay.mode.clone()),
        ("Replay", "Mods", replay.mods.clone()),
        ("Replay", "Score", replay.score.to_string()),
        ("Replay", "Max Combo", replay.max_combo.to_string()),
        ("Replay", "Accuracy", format!("{:.2}", replay.accuracy)),
        ("Replay", "Grade", replay.grade.clone()),
        ("Beatmap", "Title", beatmap.title.clone()),
        ("Beatmap", "Artist", beatmap.artist.clone()),
        ("Beatmap", "Version", beatmap.version.clone().unwrap_or_default()),
        ("Beatmap", "Circle Size", beatmap.circle_size.to_string()),
        ("Beatmap", "Overall Difficulty", beatmap.overall_difficulty.to_string()),
        ("Beatmap", "Hit Objects", beatmap.hit_objects.to_string()),
        ("Hit Errors", "Early Average (ms)", format_stat(stats.negative_average)),
        ("Hit Errors", "Early Hits", stats.negative_count.to_string()),
        ("Hit Errors", "Late Average (ms)", format_stat(stats.positive_average)),
        ("Hit Errors", "Late Hits", stats.positive_count.to_string()),
        ("Hit Errors", "Mean (ms)", format_stat(stats.mean)),
        ("Hit Errors", "Unstable Rate", format_stat(stats.unstable_rate)),
    ];

    writer
        .write_record(["Section", "Metric", "Value"])
        .map_err(|e| Error::Export(format!("CSV write error: {}", e)))?;

    for (section, metric, value) in &rows {
        writer
            .write_record([*section, *metric, value.as_str()])
            .map_err(|e| Error::Export(format!("CSV write error: {}", e)))?;
    }

    writer
        .flush()
        .map_err(|e| Error::Export(format!("Failed to flush CSV: {}", e)))?;

    tracing::info!("Exported analysis to {}", path.display());
    Ok(())
}

/// Export format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "JSON"),
            ExportFormat::Csv => write!(f, "CSV"),
        }
    }
}

impl ExportFormat {
    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }

    /// Pick a format from a file extension, case-insensitively
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        if extension.eq_ignore_ascii_case("json") {
            Some(ExportFormat::Json)
        } else if extension.eq_ignore_ascii_case("csv") {
            Some(ExportFormat::Csv)
        } else {
            None
        }
    }

    /// Export a report using this format
    pub fn export(&self, report: &AnalysisReport, path: &Path) -> Result<()> {
        match self {
            ExportFormat::Json => export_json(report, path),
            ExportFormat::Csv => export_csv(report, path),
        }
    }
}
