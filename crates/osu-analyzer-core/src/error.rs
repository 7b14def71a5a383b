//! Error types for osu-analyzer-core

use thiserror::Error;

use crate::replay::{Mods, ReplayField};

/// Main error type for decoding and analysis operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed beatmap field [{section}] {field}: {message}")]
    MalformedText {
        section: String,
        field: String,
        message: String,
    },

    #[error("Hit object \"{raw}\" has an unrecognized type field")]
    UnrecognizedHitObjectType { raw: String },

    #[error("Replay ended while reading {field}: needed {needed} bytes, {remaining} remaining")]
    TruncatedReplay {
        field: ReplayField,
        needed: usize,
        remaining: usize,
    },

    #[error("Invalid replay field {field}: {message}")]
    InvalidReplayField { field: ReplayField, message: String },

    #[error("Cannot decode score id from {remaining} trailing bytes (expected 4 or 8)")]
    UndefinedScoreIdWidth { remaining: usize },

    #[error("Unsupported mods combination: {0}")]
    UnsupportedModsCombination(Mods),

    #[error("Failed to export report: {0}")]
    Export(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Replay field that was being decoded when this error occurred
    pub fn replay_field(&self) -> Option<ReplayField> {
        match self {
            Error::TruncatedReplay { field, .. } | Error::InvalidReplayField { field, .. } => {
                Some(*field)
            }
            Error::UndefinedScoreIdWidth { .. } => Some(ReplayField::ScoreId),
            _ => None,
        }
    }

    pub(crate) fn malformed(
        section: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Error::MalformedText {
            section: section.into(),
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for osu-analyzer operations
pub type Result<T> = std::result::Result<T, Error>;
