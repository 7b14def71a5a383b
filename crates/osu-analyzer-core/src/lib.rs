//! # osu-analyzer-core
//!
//! Core library for decoding osu! replays and beatmaps and measuring how
//! accurately a replay hit the beatmap's objects.
//!
//! ## Modules
//!
//! - [`beatmap`] - Beatmap data structures (metadata, difficulty, hit objects)
//! - [`config`] - Configuration and replay/beatmap folder discovery
//! - [`error`] - Error types and Result alias
//! - [`parser`] - `.osu` section document and beatmap parsing
//! - [`replay`] - `.osr` binary decoding, mods and input frames
//! - [`stats`] - Hit error analysis and report export
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use osu_analyzer_core::{parse_osu_file, read_replay_file, HitErrorAnalyzer};
//!
//! let beatmap = parse_osu_file(Path::new("map.osu")).expect("Failed to parse beatmap");
//! let replay = read_replay_file(Path::new("play.osr")).expect("Failed to read replay");
//! let stats = HitErrorAnalyzer::analyze(&beatmap, &replay).expect("Unsupported mods");
//! println!("{}", stats);
//! ```

pub mod beatmap;
pub mod config;
pub mod error;
pub mod parser;
pub mod replay;
pub mod stats;

pub use error::{Error, Result};

pub use beatmap::{
    BeatmapDifficulty, BeatmapInfo, BeatmapMetadata, GameMode, HitObject, HitObjectKind,
};

pub use config::Config;

pub use parser::{parse_beatmap_bytes, parse_beatmap_str, parse_osu_file, OsuDocument};

pub use replay::{
    decode_replay, parse_replay_bytes, read_replay_file, Grade, Inputs, LifeBarPoint, Mods,
    ReplayField, ReplayFrame, ReplayInfo,
};

pub use stats::{
    effective_overall_difficulty, effective_radius, export_csv, export_json, hit_window_50,
    AnalysisReport, ExportFormat, HitErrorAnalyzer, HitErrorStats,
};
