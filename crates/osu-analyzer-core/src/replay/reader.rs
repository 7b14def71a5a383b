//! .osr replay decoding

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::beatmap::GameMode;
use crate::error::{Error, Result};

use super::binary::{ReplayCursor, ReplayField};
use super::frames::{decode_frames, decode_life_bar, FrameData};
use super::lzma;
use super::model::ReplayInfo;
use super::mods::Mods;

/// .NET ticks (100 ns) between 0001-01-01 and the Unix epoch
const UNIX_EPOCH_TICKS: i64 = 621_355_968_000_000_000;
/// .NET ticks of 9999-12-31T23:59:59.9999999
const MAX_TICKS: i64 = 3_155_378_975_999_999_999;
const TICKS_PER_SECOND: i64 = 10_000_000;

/// Read and decode a replay file
pub fn read_replay_file(path: &Path) -> Result<ReplayInfo> {
    tracing::debug!("Decoding replay {}", path.display());
    let file = File::open(path)?;
    decode_replay(BufReader::new(file))
}

/// Decode a replay from a byte source.
///
/// The source is consumed and dropped before this returns.
pub fn decode_replay<R: Read>(mut reader: R) -> Result<ReplayInfo> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    drop(reader);
    parse_replay_bytes(&data)
}

/// Decode a replay held in memory
pub fn parse_replay_bytes(data: &[u8]) -> Result<ReplayInfo> {
    let mut cursor = ReplayCursor::new(data);

    cursor.enter(ReplayField::Mode);
    let mode_byte = cursor.read_u8()?;
    let mode = GameMode::try_from(mode_byte)
        .map_err(|b| cursor.invalid(format!("unknown game mode {}", b)))?;

    cursor.enter(ReplayField::Version);
    let version = cursor.read_i32()?;

    cursor.enter(ReplayField::BeatmapHash);
    let beatmap_hash = cursor.read_string()?;

    cursor.enter(ReplayField::PlayerName);
    let player_name = cursor.read_string()?;

    cursor.enter(ReplayField::ReplayHash);
    let replay_hash = cursor.read_string()?;

    cursor.enter(ReplayField::Count300);
    let count_300 = cursor.read_u16()?;

    cursor.enter(ReplayField::Count100);
    let count_100 = cursor.read_u16()?;

    cursor.enter(ReplayField::Count50);
    let count_50 = cursor.read_u16()?;

    cursor.enter(ReplayField::CountGeki);
    let count_geki = cursor.read_u16()?;

    cursor.enter(ReplayField::CountKatu);
    let count_katu = cursor.read_u16()?;

    cursor.enter(ReplayField::CountMiss);
    let count_miss = cursor.read_u16()?;

    cursor.enter(ReplayField::Score);
    let score = cursor.read_i32()?;

    cursor.enter(ReplayField::MaxCombo);
    let max_combo = cursor.read_u16()?;

    cursor.enter(ReplayField::PerfectCombo);
    let perfect_combo = cursor.read_bool()?;

    cursor.enter(ReplayField::Mods);
    let mods = Mods::from_bits(cursor.read_u32()?);

    cursor.enter(ReplayField::LifeBarData);
    let life_bar = match cursor.read_string()? {
        Some(text) => decode_life_bar(&text)?,
        None => Vec::new(),
    };

    cursor.enter(ReplayField::Timestamp);
    let ticks = cursor.read_i64()?;
    let timestamp = datetime_from_ticks(ticks)
        .ok_or_else(|| cursor.invalid(format!("tick count {} is out of range", ticks)))?;

    cursor.enter(ReplayField::RawDataLength);
    let raw_data_length = cursor.read_i32()?;

    cursor.enter(ReplayField::RawData);
    let FrameData { frames, seed } = if raw_data_length <= 0 {
        FrameData::default()
    } else {
        let compressed = cursor.read_bytes(raw_data_length as usize)?;
        let text = lzma::decompress(compressed)?;
        if !text.is_ascii() {
            return Err(cursor.invalid("frame data is not ASCII text"));
        }
        // ASCII is always valid UTF-8
        decode_frames(&String::from_utf8_lossy(&text))?
    };

    cursor.enter(ReplayField::ScoreId);
    let score_id = match cursor.remaining() {
        4 => i64::from(cursor.read_i32()?),
        8 => cursor.read_i64()?,
        remaining => return Err(Error::UndefinedScoreIdWidth { remaining }),
    };

    tracing::debug!(
        "Decoded {} replay by {} with {} frames ({})",
        mode,
        player_name.as_deref().unwrap_or("Unknown"),
        frames.len(),
        mods
    );

    Ok(ReplayInfo {
        mode,
        version,
        beatmap_hash,
        player_name,
        replay_hash,
        count_300,
        count_100,
        count_50,
        count_geki,
        count_katu,
        count_miss,
        score,
        max_combo,
        perfect_combo,
        mods,
        life_bar,
        timestamp,
        frames,
        seed,
        score_id,
    })
}

/// Convert .NET ticks since 0001-01-01 UTC into a timestamp.
///
/// Negative tick counts clamp to the epoch itself; counts past year 9999
/// are rejected.
pub fn datetime_from_ticks(ticks: i64) -> Option<DateTime<Utc>> {
    let ticks = ticks.max(0);
    if ticks > MAX_TICKS {
        return None;
    }

    let unix_ticks = ticks - UNIX_EPOCH_TICKS;
    let seconds = unix_ticks.div_euclid(TICKS_PER_SECOND);
    let nanos = (unix_ticks.rem_euclid(TICKS_PER_SECOND) * 100) as u32;
    DateTime::from_timestamp(seconds, nanos)
}
