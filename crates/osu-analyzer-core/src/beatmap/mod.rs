//! Beatmap data structures and types

mod metadata;

pub use metadata::*;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Represents a game mode in osu!
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    Osu = 0,
    Taiko = 1,
    Catch = 2,
    Mania = 3,
}

impl Default for GameMode {
    fn default() -> Self {
        Self::Osu
    }
}

impl TryFrom<u8> for GameMode {
    type Error = u8;

    fn try_from(value: u8) -> std::result::Result<Self, u8> {
        match value {
            0 => Ok(Self::Osu),
            1 => Ok(Self::Taiko),
            2 => Ok(Self::Catch),
            3 => Ok(Self::Mania),
            other => Err(other),
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameMode::Osu => write!(f, "osu!"),
            GameMode::Taiko => write!(f, "osu!taiko"),
            GameMode::Catch => write!(f, "osu!catch"),
            GameMode::Mania => write!(f, "osu!mania"),
        }
    }
}

/// Difficulty settings for a beatmap
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BeatmapDifficulty {
    pub approach_rate: f64,
    pub circle_size: f64,
    pub hp_drain: f64,
    pub overall_difficulty: f64,
    pub slider_tick_rate: f64,
    pub slider_multiplier: f64,
}

/// Kind of a hit object, resolved from the type bit field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HitObjectKind {
    Circle,
    Slider,
    Spinner,
    ManiaNote,
}

impl HitObjectKind {
    /// Bits of the type field that select the object kind.
    /// The remaining bits carry new-combo and combo-colour-skip flags.
    pub const TYPE_MASK: i32 = 0b1000_1011;

    const CIRCLE: i32 = 1 << 0;
    const SLIDER: i32 = 1 << 1;
    const SPINNER: i32 = 1 << 3;
    const MANIA_NOTE: i32 = 1 << 7;

    /// Resolve the kind from an already parsed type field.
    ///
    /// Exactly one of the kind bits must be set.
    pub fn from_type_bits(bits: i32) -> Option<Self> {
        match bits & Self::TYPE_MASK {
            Self::CIRCLE => Some(Self::Circle),
            Self::SLIDER => Some(Self::Slider),
            Self::SPINNER => Some(Self::Spinner),
            Self::MANIA_NOTE => Some(Self::ManiaNote),
            _ => None,
        }
    }

    /// Parse and resolve a raw type field as it appears in a `[HitObjects]` line
    pub fn from_type_field(raw: &str) -> Result<Self> {
        let bits: i32 = raw.trim().parse().map_err(|e| {
            Error::malformed("HitObjects", "type", format!("\"{}\": {}", raw, e))
        })?;

        Self::from_type_bits(bits).ok_or_else(|| Error::UnrecognizedHitObjectType {
            raw: raw.to_string(),
        })
    }
}

impl fmt::Display for HitObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HitObjectKind::Circle => write!(f, "Circle"),
            HitObjectKind::Slider => write!(f, "Slider"),
            HitObjectKind::Spinner => write!(f, "Spinner"),
            HitObjectKind::ManiaNote => write!(f, "Mania note"),
        }
    }
}

/// A timed, positioned object the player has to react to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitObject {
    pub x: i32,
    pub y: i32,
    /// Start time in milliseconds
    pub time: f64,
    pub kind: HitObjectKind,
}

/// A decoded beatmap difficulty
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BeatmapInfo {
    pub metadata: BeatmapMetadata,
    pub difficulty: BeatmapDifficulty,
    /// Hit objects in file order
    pub hit_objects: Vec<HitObject>,
    /// MD5 of the raw `.osu` bytes, when decoded from bytes or a file
    pub md5_hash: Option<String>,
}

impl BeatmapInfo {
    /// Number of hit objects of the given kind
    pub fn count_of(&self, kind: HitObjectKind) -> usize {
        self.hit_objects.iter().filter(|h| h.kind == kind).count()
    }

    /// Time between the first and last hit object in milliseconds
    pub fn length_ms(&self) -> f64 {
        match (self.hit_objects.first(), self.hit_objects.last()) {
            (Some(first), Some(last)) => last.time - first.time,
            _ => 0.0,
        }
    }
}
