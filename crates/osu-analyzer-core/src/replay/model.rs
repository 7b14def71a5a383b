//! Replay data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::beatmap::GameMode;

use super::mods::{Inputs, Mods};

/// A decoded .osr replay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayInfo {
    /// Game mode
    pub mode: GameMode,
    /// Game version the replay was recorded with (e.g. 20210520)
    pub version: i32,
    /// MD5 hash of the beatmap
    pub beatmap_hash: Option<String>,
    /// Player name
    pub player_name: Option<String>,
    /// MD5 hash of the replay
    pub replay_hash: Option<String>,
    /// Number of 300s
    pub count_300: u16,
    /// Number of 100s
    pub count_100: u16,
    /// Number of 50s
    pub count_50: u16,
    /// Number of gekis (max 300s in mania)
    pub count_geki: u16,
    /// Number of katus (200s in mania)
    pub count_katu: u16,
    /// Number of misses
    pub count_miss: u16,
    /// Score achieved
    pub score: i32,
    /// Max combo
    pub max_combo: u16,
    /// Full combo flag
    pub perfect_combo: bool,
    pub mods: Mods,
    pub life_bar: Vec<LifeBarPoint>,
    /// When the play was set
    pub timestamp: DateTime<Utc>,
    /// Input frames with absolute times
    pub frames: Vec<ReplayFrame>,
    /// RNG seed used for the play
    pub seed: i32,
    /// Online score ID, 0 for offline plays
    pub score_id: i64,
}

impl ReplayInfo {
    /// Total judged objects
    pub fn total_hits(&self) -> u32 {
        u32::from(self.count_300)
            + u32::from(self.count_100)
            + u32::from(self.count_50)
            + u32::from(self.count_miss)
    }

    /// osu!standard accuracy in percent (0.0 to 100.0)
    pub fn accuracy(&self) -> f64 {
        let total_hits = self.total_hits();
        if total_hits == 0 {
            return 0.0;
        }

        let points = f64::from(self.count_300) * 300.0
            + f64::from(self.count_100) * 100.0
            + f64::from(self.count_50) * 50.0;
        points / (f64::from(total_hits) * 300.0) * 100.0
    }

    /// Grade derived from accuracy and misses
    pub fn grade(&self) -> Grade {
        Grade::from_accuracy(self.accuracy(), self.count_miss)
    }
}

/// A sample of the life bar graph
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LifeBarPoint {
    /// Time in milliseconds
    pub time_ms: i32,
    /// Life from 0.0 to 1.0
    pub percentage: f32,
}

/// Cursor position and held buttons at a point in the replay
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReplayFrame {
    pub x: f32,
    pub y: f32,
    /// Absolute time in milliseconds
    pub time: i64,
    pub inputs: Inputs,
}

/// Grade/rank achieved on a play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    SS,
    S,
    A,
    B,
    C,
    D,
}

impl Grade {
    /// Grade from accuracy thresholds; SS requires no misses
    pub fn from_accuracy(accuracy: f64, misses: u16) -> Self {
        if misses == 0 && accuracy >= 100.0 {
            Grade::SS
        } else if accuracy >= 93.0 {
            Grade::S
        } else if accuracy >= 80.0 {
            Grade::A
        } else if accuracy >= 70.0 {
            Grade::B
        } else if accuracy >= 60.0 {
            Grade::C
        } else {
            Grade::D
        }
    }

    /// Get display string
    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::SS => "SS",
            Grade::S => "S",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
