//! Text sub-formats embedded in replays: the life bar graph and the
//! decompressed frame stream
//!
//! Both are comma-separated lists of pipe-separated values. Pairs with the
//! wrong number of values are dropped silently.

use std::str::FromStr;

use crate::error::{Error, Result};

use super::binary::ReplayField;
use super::model::{LifeBarPoint, ReplayFrame};
use super::mods::Inputs;

const PAIR_DELIMITER: char = ',';
const VALUE_DELIMITER: char = '|';
/// Delta time marking the pair that carries the RNG seed instead of a frame
const SEED_MARKER: &str = "-12345";

/// Decode `time|percentage` pairs of the life bar graph
pub fn decode_life_bar(data: &str) -> Result<Vec<LifeBarPoint>> {
    let mut points = Vec::new();

    for pair in data.split(PAIR_DELIMITER) {
        let values: Vec<&str> = pair.split(VALUE_DELIMITER).collect();
        let [time, percentage] = values[..] else {
            if !pair.is_empty() {
                tracing::debug!("Dropping malformed life bar pair \"{}\"", pair);
            }
            continue;
        };

        points.push(LifeBarPoint {
            time_ms: parse_value(time, ReplayField::LifeBarData)?,
            percentage: parse_value(percentage, ReplayField::LifeBarData)?,
        });
    }

    Ok(points)
}

/// Frames decoded from the replay's raw data, plus the RNG seed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameData {
    pub frames: Vec<ReplayFrame>,
    pub seed: i32,
}

/// Decode `delta|x|y|inputs` pairs into frames with absolute times.
///
/// The seed pair (delta `-12345`) is not a frame and does not advance time.
pub fn decode_frames(data: &str) -> Result<FrameData> {
    let mut decoded = FrameData::default();
    let mut time: i64 = 0;
    let mut dropped = 0usize;

    for pair in data.split(PAIR_DELIMITER).filter(|p| !p.is_empty()) {
        let values: Vec<&str> = pair.split(VALUE_DELIMITER).collect();
        let [delta, x, y, inputs] = values[..] else {
            dropped += 1;
            continue;
        };

        if delta.trim() == SEED_MARKER {
            decoded.seed = parse_value(inputs, ReplayField::Seed)?;
            continue;
        }

        let delta: i32 = parse_value(delta, ReplayField::RawData)?;
        let inputs: i32 = parse_value(inputs, ReplayField::RawData)?;
        time += i64::from(delta);

        decoded.frames.push(ReplayFrame {
            x: parse_value(x, ReplayField::RawData)?,
            y: parse_value(y, ReplayField::RawData)?,
            time,
            // mania key states use every bit, keep them as-is
            inputs: Inputs::from_bits(inputs as u32),
        });
    }

    if dropped > 0 {
        tracing::debug!("Dropped {} malformed frame pairs", dropped);
    }

    Ok(decoded)
}

fn parse_value<T>(value: &str, field: ReplayField) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| Error::InvalidReplayField {
            field,
            message: format!("\"{}\": {}", value, e),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_life_bar_drops_malformed_pairs() {
        let points = decode_life_bar("1500|0.95,oops").unwrap();
        assert_eq!(
            points,
            vec![LifeBarPoint {
                time_ms: 1500,
                percentage: 0.95
            }]
        );
    }

    #[test]
    fn test_life_bar_trailing_comma_and_empty() {
        assert_eq!(decode_life_bar("0|1,200|0.5,").unwrap().len(), 2);
        assert!(decode_life_bar("").unwrap().is_empty());
    }

    #[test]
    fn test_life_bar_bad_number() {
        match decode_life_bar("abc|1") {
            Err(e) => assert_eq!(e.replay_field(), Some(ReplayField::LifeBarData)),
            Ok(points) => panic!("unexpected points: {:?}", points),
        }
    }

    #[test]
    fn test_frames_cumulative_time() {
        let data = decode_frames("0|256|-500|0,-1|256|-500|0,10|100.5|200.25|1,16|110|205|5,").unwrap();

        let times: Vec<i64> = data.frames.iter().map(|f| f.time).collect();
        assert_eq!(times, vec![0, -1, 9, 25]);
        assert_eq!(data.frames[2].x, 100.5);
        assert_eq!(data.frames[2].y, 200.25);
        assert_eq!(data.frames[3].inputs, Inputs::M1 | Inputs::K1);
        assert_eq!(data.seed, 0);
    }

    #[test]
    fn test_seed_pair_is_not_a_frame() {
        let data = decode_frames("10|1|2|0,-12345|0|0|42,5|3|4|1").unwrap();

        assert_eq!(data.seed, 42);
        assert_eq!(data.frames.len(), 2);
        assert_eq!(data.frames[1].time, 15);
    }

    #[test]
    fn test_frames_drop_wrong_arity() {
        let data = decode_frames("10|1|2,,5|3|4|1|9,7|0|0|2").unwrap();
        assert_eq!(data.frames.len(), 1);
        assert_eq!(data.frames[0].time, 7);
    }

    #[test]
    fn test_frame_errors_carry_field() {
        let raw = decode_frames("x|1|2|0").unwrap_err();
        assert_eq!(raw.replay_field(), Some(ReplayField::RawData));

        let seed = decode_frames("-12345|0|0|seed").unwrap_err();
        assert_eq!(seed.replay_field(), Some(ReplayField::Seed));
    }
}
