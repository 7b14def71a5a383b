//! .osu file decoding

use std::fs;
use std::io::BufRead;
use std::path::Path;
use std::str::FromStr;

use md5::{Digest, Md5};

use super::document::OsuDocument;
use crate::beatmap::{BeatmapDifficulty, BeatmapInfo, BeatmapMetadata, HitObject, HitObjectKind};
use crate::error::{Error, Result};

const METADATA_SECTION: &str = "Metadata";
const DIFFICULTY_SECTION: &str = "Difficulty";
const HIT_OBJECTS_SECTION: &str = "HitObjects";

/// Parse a .osu file and extract beatmap information
pub fn parse_osu_file(path: &Path) -> Result<BeatmapInfo> {
    let content = fs::read(path)?;
    tracing::debug!("Decoding beatmap {}", path.display());
    parse_beatmap_bytes(&content)
}

/// Decode a beatmap from raw bytes, recording their MD5 hash.
///
/// Invalid UTF-8 (legacy code pages in old maps) is replaced rather than
/// rejected; the hash is always taken over the raw bytes.
pub fn parse_beatmap_bytes(content: &[u8]) -> Result<BeatmapInfo> {
    let md5_hash = format!("{:x}", Md5::digest(content));
    let mut beatmap = parse_beatmap_str(&String::from_utf8_lossy(content))?;
    beatmap.md5_hash = Some(md5_hash);
    Ok(beatmap)
}

/// Decode a beatmap from a string
pub fn parse_beatmap_str(text: &str) -> Result<BeatmapInfo> {
    decode_document(&OsuDocument::parse(text))
}

/// Decode a beatmap from a buffered text source
pub fn decode_beatmap<R: BufRead>(reader: R) -> Result<BeatmapInfo> {
    let document = OsuDocument::from_reader(reader)?;
    decode_document(&document)
}

fn decode_document(document: &OsuDocument) -> Result<BeatmapInfo> {
    let metadata = decode_metadata(document)?;
    let difficulty = decode_difficulty(document)?;

    let hit_objects = document
        .entries(HIT_OBJECTS_SECTION)
        .map(|entry| parse_hit_object(&entry.raw))
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(
        "Decoded beatmap \"{}\" [{}] with {} hit objects",
        metadata.display_title(),
        metadata.version.as_deref().unwrap_or(""),
        hit_objects.len()
    );

    Ok(BeatmapInfo {
        metadata,
        difficulty,
        hit_objects,
        md5_hash: None,
    })
}

fn decode_metadata(document: &OsuDocument) -> Result<BeatmapMetadata> {
    let text = |key: &str| {
        document
            .get(METADATA_SECTION, key)
            .filter(|v| !v.is_empty())
            .map(String::from)
    };

    Ok(BeatmapMetadata {
        title: text("Title"),
        title_unicode: text("TitleUnicode"),
        artist: text("Artist"),
        artist_unicode: text("ArtistUnicode"),
        creator: text("Creator"),
        version: text("Version"),
        source: text("Source"),
        tags: text("Tags").map(|tags| tags.split_whitespace().map(String::from).collect()),
        beatmap_id: required(document, METADATA_SECTION, "BeatmapID")?,
        beatmap_set_id: required(document, METADATA_SECTION, "BeatmapSetID")?,
    })
}

fn decode_difficulty(document: &OsuDocument) -> Result<BeatmapDifficulty> {
    Ok(BeatmapDifficulty {
        approach_rate: required(document, DIFFICULTY_SECTION, "ApproachRate")?,
        circle_size: required(document, DIFFICULTY_SECTION, "CircleSize")?,
        hp_drain: required(document, DIFFICULTY_SECTION, "HPDrainRate")?,
        overall_difficulty: required(document, DIFFICULTY_SECTION, "OverallDifficulty")?,
        slider_tick_rate: required(document, DIFFICULTY_SECTION, "SliderTickRate")?,
        slider_multiplier: required(document, DIFFICULTY_SECTION, "SliderMultiplier")?,
    })
}

/// Look up and parse a required numeric value
fn required<T>(document: &OsuDocument, section: &str, key: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let value = document
        .get(section, key)
        .ok_or_else(|| Error::malformed(section, key, "missing required value"))?;

    value
        .parse()
        .map_err(|e| Error::malformed(section, key, format!("\"{}\": {}", value, e)))
}

/// Parse one `[HitObjects]` line.
///
/// Only `x,y,time,type` are read; curve points and hit sounds that follow are
/// ignored.
pub fn parse_hit_object(line: &str) -> Result<HitObject> {
    let mut fields = line.split(',');
    let mut next = |name: &str| {
        fields
            .next()
            .map(str::trim)
            .ok_or_else(|| {
                Error::malformed(HIT_OBJECTS_SECTION, name, format!("missing in \"{}\"", line))
            })
    };

    let x = next("x")?;
    let y = next("y")?;
    let time = next("time")?;
    let type_field = next("type")?;

    Ok(HitObject {
        x: parse_field(x, "x", line)?,
        y: parse_field(y, "y", line)?,
        time: parse_field(time, "time", line)?,
        kind: HitObjectKind::from_type_field(type_field)?,
    })
}

fn parse_field<T>(value: &str, name: &str, line: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e| {
        Error::malformed(
            HIT_OBJECTS_SECTION,
            name,
            format!("\"{}\" in \"{}\": {}", value, line, e),
        )
    })
}
