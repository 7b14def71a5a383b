//! Hit error analysis
//!
//! Matches replay presses against beatmap hit objects and summarizes the
//! timing errors as averages and unstable rate.

mod analyzer;
mod export;
mod model;

pub use analyzer::{effective_overall_difficulty, effective_radius, hit_window_50, HitErrorAnalyzer};
pub use export::{export_csv, export_json, AnalysisReport, BeatmapSummary, ExportFormat, ReplaySummary};
pub use model::*;
