//! Hit error analysis of a replay against its beatmap

use crate::beatmap::{BeatmapInfo, HitObject};
use crate::error::{Error, Result};
use crate::replay::{Inputs, Mods, ReplayFrame, ReplayInfo};

use super::model::HitErrorStats;

/// Mods that change the overall difficulty used for hit windows
const OD_MODS: Mods = Mods::DOUBLE_TIME
    .union(Mods::HALF_TIME)
    .union(Mods::HARD_ROCK)
    .union(Mods::EASY);

/// Circle radius in osu!pixels for a circle size under the given mods.
///
/// Easy takes precedence when both Easy and Hard Rock are set.
pub fn effective_radius(circle_size: f64, mods: Mods) -> f64 {
    let circle_size = if mods.contains(Mods::EASY) {
        circle_size * 0.5
    } else if mods.contains(Mods::HARD_ROCK) {
        (circle_size * 1.3).max(10.0)
    } else {
        circle_size
    };
    54.4 - 4.48 * circle_size
}

/// Overall difficulty after applying rate and difficulty mods
pub fn effective_overall_difficulty(overall_difficulty: f64, mods: Mods) -> Result<f64> {
    let restricted = mods.intersection(OD_MODS);
    let (offset, multiplier) = match (
        restricted.contains(Mods::EASY),
        restricted.contains(Mods::HARD_ROCK),
        restricted.contains(Mods::DOUBLE_TIME),
        restricted.contains(Mods::HALF_TIME),
    ) {
        // (EZ, HR, DT, HT)
        (false, false, false, false) => (0.0, 1.0),
        (false, false, true, false) => (4.44444, 0.66667),
        (false, false, false, true) => (-4.44444, 1.33334),
        (false, true, false, false) => (0.0, 1.4),
        (false, true, true, false) => (4.44444, 0.93334),
        (false, true, false, true) => (-4.44444, 1.866667),
        (true, false, false, false) => (0.0, 0.5),
        (true, false, true, false) => (4.44444, 0.33334),
        (true, false, false, true) => (-4.44444, 0.66667),
        _ => return Err(Error::UnsupportedModsCombination(restricted)),
    };
    Ok(offset + overall_difficulty * multiplier)
}

/// Half-width of the 50 hit window in milliseconds
pub fn hit_window_50(overall_difficulty: f64) -> f64 {
    200.0 - 10.0 * overall_difficulty
}

/// Matches replay presses to hit objects and measures their timing
pub struct HitErrorAnalyzer;

impl HitErrorAnalyzer {
    /// Compute hit error statistics for a replay of a beatmap
    pub fn analyze(beatmap: &BeatmapInfo, replay: &ReplayInfo) -> Result<HitErrorStats> {
        let errors = Self::hit_errors(beatmap, replay)?;
        let stats = HitErrorStats::from_errors(&errors);

        tracing::debug!(
            "Matched {} of {} hit objects against {} frames",
            stats.total_count,
            beatmap.hit_objects.len(),
            replay.frames.len()
        );

        Ok(stats)
    }

    /// Hit errors (frame time minus object time) in the order objects were hit.
    ///
    /// Objects and frames are expected in time order. Objects whose window
    /// passes without a matching press are skipped.
    pub fn hit_errors(beatmap: &BeatmapInfo, replay: &ReplayInfo) -> Result<Vec<f64>> {
        let radius = effective_radius(beatmap.difficulty.circle_size, replay.mods);
        let od = effective_overall_difficulty(beatmap.difficulty.overall_difficulty, replay.mods)?;
        let window = hit_window_50(od);

        let objects = &beatmap.hit_objects;
        let frames = &replay.frames;

        let mut errors = Vec::new();
        let mut object_index = 0;
        let mut frame_index = 0;
        let mut previous_inputs = Inputs::NONE;

        while object_index < objects.len() && frame_index < frames.len() {
            let object = &objects[object_index];
            let frame = &frames[frame_index];
            let frame_time = frame.time as f64;

            // The object's window is over; retry this frame on the next object
            if frame_time > object.time + window {
                previous_inputs = frame.inputs;
                object_index += 1;
                continue;
            }

            if frame.inputs.has_new_press(previous_inputs)
                && is_on_circle(object, frame, radius)
                && is_in_hit_window(object, frame_time, window)
            {
                errors.push(frame_time - object.time);
                object_index += 1;
            }

            previous_inputs = frame.inputs;
            frame_index += 1;
        }

        Ok(errors)
    }

    /// Whether the replay was recorded on this beatmap.
    ///
    /// `None` when either hash is unknown.
    pub fn check_beatmap_hash(beatmap: &BeatmapInfo, replay: &ReplayInfo) -> Option<bool> {
        let beatmap_hash = beatmap.md5_hash.as_deref()?;
        let replay_hash = replay.beatmap_hash.as_deref()?;
        Some(beatmap_hash.eq_ignore_ascii_case(replay_hash))
    }
}

fn is_on_circle(object: &HitObject, frame: &ReplayFrame, radius: f64) -> bool {
    let dx = f64::from(object.x) - f64::from(frame.x);
    let dy = f64::from(object.y) - f64::from(frame.y);
    dx * dx + dy * dy <= radius * radius
}

/// Inclusive on both ends
fn is_in_hit_window(object: &HitObject, frame_time: f64, window: f64) -> bool {
    object.time - window <= frame_time && frame_time <= object.time + window
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beatmap::{BeatmapDifficulty, GameMode, HitObjectKind};
    use chrono::{DateTime, Utc};

    fn beatmap(
        circle_size: f64,
        overall_difficulty: f64,
        objects: &[(i32, i32, f64)],
    ) -> BeatmapInfo {
        BeatmapInfo {
            difficulty: BeatmapDifficulty {
                circle_size,
                overall_difficulty,
                ..Default::default()
            },
            hit_objects: objects
                .iter()
                .map(|&(x, y, time)| HitObject {
                    x,
                    y,
                    time,
                    kind: HitObjectKind::Circle,
                })
                .collect(),
            ..Default::default()
        }
    }

    fn replay(mods: Mods, frames: &[(f32, f32, i64, Inputs)]) -> ReplayInfo {
        ReplayInfo {
            mode: GameMode::Osu,
            version: 20210520,
            beatmap_hash: None,
            player_name: Some("tester".to_string()),
            replay_hash: None,
            count_300: 0,
            count_100: 0,
            count_50: 0,
            count_geki: 0,
            count_katu: 0,
            count_miss: 0,
            score: 0,
            max_combo: 0,
            perfect_combo: false,
            mods,
            life_bar: Vec::new(),
            timestamp: DateTime::<Utc>::default(),
            frames: frames
                .iter()
                .map(|&(x, y, time, inputs)| ReplayFrame { x, y, time, inputs })
                .collect(),
            seed: 0,
            score_id: 0,
        }
    }

    #[test]
    fn test_radius() {
        assert!((effective_radius(4.0, Mods::NONE) - 36.48).abs() < 1e-9);
        assert!((effective_radius(4.0, Mods::EASY) - 45.44).abs() < 1e-9);
        // 4 * 1.3 = 5.2, raised to 10
        assert!((effective_radius(4.0, Mods::HARD_ROCK) - 9.6).abs() < 1e-9);
        assert_eq!(
            effective_radius(4.0, Mods::EASY | Mods::HARD_ROCK),
            effective_radius(4.0, Mods::EASY)
        );
        // unrelated mods do not matter
        assert_eq!(
            effective_radius(4.0, Mods::HIDDEN | Mods::DOUBLE_TIME),
            effective_radius(4.0, Mods::NONE)
        );
    }

    #[test]
    fn test_overall_difficulty() {
        let od = |mods| effective_overall_difficulty(9.0, mods).unwrap();

        assert_eq!(od(Mods::NONE), 9.0);
        assert!((od(Mods::DOUBLE_TIME) - (4.44444 + 9.0 * 0.66667)).abs() < 1e-9);
        assert!((od(Mods::HALF_TIME) - (-4.44444 + 9.0 * 1.33334)).abs() < 1e-9);
        assert!((od(Mods::HARD_ROCK) - 12.6).abs() < 1e-9);
        assert!((od(Mods::HARD_ROCK | Mods::DOUBLE_TIME) - (4.44444 + 9.0 * 0.93334)).abs() < 1e-9);
        assert!((od(Mods::HARD_ROCK | Mods::HALF_TIME) - (-4.44444 + 9.0 * 1.866667)).abs() < 1e-9);
        assert!((od(Mods::EASY) - 4.5).abs() < 1e-9);
        assert!((od(Mods::EASY | Mods::DOUBLE_TIME) - (4.44444 + 9.0 * 0.33334)).abs() < 1e-9);
        assert!((od(Mods::EASY | Mods::HALF_TIME) - (-4.44444 + 9.0 * 0.66667)).abs() < 1e-9);
        // nightcore carries the double time bit
        assert_eq!(od(Mods::from_bits(576)), od(Mods::DOUBLE_TIME));
        assert_eq!(od(Mods::HIDDEN | Mods::FLASHLIGHT), 9.0);
    }

    #[test]
    fn test_unsupported_mods() {
        for mods in [
            Mods::DOUBLE_TIME | Mods::HALF_TIME,
            Mods::EASY | Mods::HARD_ROCK,
            Mods::EASY | Mods::HARD_ROCK | Mods::DOUBLE_TIME,
        ] {
            match effective_overall_difficulty(5.0, mods | Mods::HIDDEN) {
                Err(Error::UnsupportedModsCombination(restricted)) => assert_eq!(restricted, mods),
                other => panic!("unexpected result for {}: {:?}", mods, other),
            }
        }
    }

    #[test]
    fn test_analyzer_rejects_dt_ht() {
        let map = beatmap(4.0, 8.0, &[(256, 192, 1000.0)]);
        let play = replay(
            Mods::DOUBLE_TIME | Mods::HALF_TIME,
            &[(256.0, 192.0, 1000, Inputs::M1)],
        );
        assert!(matches!(
            HitErrorAnalyzer::analyze(&map, &play),
            Err(Error::UnsupportedModsCombination(_))
        ));
    }

    #[test]
    fn test_single_hit() {
        let map = beatmap(4.0, 8.0, &[(256, 192, 1000.0)]);
        let play = replay(Mods::NONE, &[(260.0, 190.0, 1012, Inputs::M1)]);

        let stats = HitErrorAnalyzer::analyze(&map, &play).unwrap();
        assert_eq!(stats.total_count, 1);
        assert_eq!(stats.positive_average, Some(12.0));
        assert_eq!(stats.negative_average, None);
        assert_eq!(stats.unstable_rate, Some(0.0));
    }

    #[test]
    fn test_held_key_does_not_hit_again() {
        let map = beatmap(4.0, 8.0, &[(100, 100, 1000.0), (100, 100, 1100.0)]);
        let play = replay(
            Mods::NONE,
            &[
                (100.0, 100.0, 990, Inputs::M1),
                (100.0, 100.0, 1100, Inputs::M1),
                (100.0, 100.0, 1105, Inputs::M1 | Inputs::K1),
            ],
        );

        let errors = HitErrorAnalyzer::hit_errors(&map, &play).unwrap();
        assert_eq!(errors, vec![-10.0, 5.0]);
    }

    #[test]
    fn test_press_outside_radius_is_ignored() {
        let map = beatmap(4.0, 8.0, &[(100, 100, 1000.0)]);
        let play = replay(Mods::NONE, &[(300.0, 300.0, 1000, Inputs::M1)]);
        assert!(HitErrorAnalyzer::hit_errors(&map, &play).unwrap().is_empty());
    }

    #[test]
    fn test_window_boundary_is_inclusive() {
        // od 8 -> window 120ms
        let map = beatmap(4.0, 8.0, &[(100, 100, 1000.0)]);

        let early = replay(Mods::NONE, &[(100.0, 100.0, 880, Inputs::M1)]);
        assert_eq!(HitErrorAnalyzer::hit_errors(&map, &early).unwrap(), vec![-120.0]);

        let late = replay(Mods::NONE, &[(100.0, 100.0, 1120, Inputs::M1)]);
        assert_eq!(HitErrorAnalyzer::hit_errors(&map, &late).unwrap(), vec![120.0]);

        let too_early = replay(Mods::NONE, &[(100.0, 100.0, 879, Inputs::M1)]);
        assert!(HitErrorAnalyzer::hit_errors(&map, &too_early).unwrap().is_empty());
    }

    #[test]
    fn test_missed_object_is_skipped() {
        let map = beatmap(4.0, 8.0, &[(100, 100, 1000.0), (200, 200, 2000.0)]);
        let play = replay(
            Mods::NONE,
            &[
                (0.0, 0.0, 500, Inputs::NONE),
                (0.0, 0.0, 1500, Inputs::NONE),
                (200.0, 200.0, 1990, Inputs::K2),
            ],
        );

        let stats = HitErrorAnalyzer::analyze(&map, &play).unwrap();
        assert_eq!(stats.total_count, 1);
        assert_eq!(stats.negative_average, Some(-10.0));
        assert_eq!(stats.positive_average, None);
    }

    #[test]
    fn test_press_that_ends_a_window_cannot_hit_the_next_object() {
        let map = beatmap(4.0, 8.0, &[(100, 100, 1000.0), (200, 200, 2000.0)]);
        let play = replay(Mods::NONE, &[(200.0, 200.0, 1990, Inputs::K2)]);
        assert!(HitErrorAnalyzer::hit_errors(&map, &play).unwrap().is_empty());
    }

    #[test]
    fn test_mods_shrink_window() {
        // HR od 8 -> 11.2, window 88ms
        let map = beatmap(2.0, 8.0, &[(100, 100, 1000.0)]);
        let play = replay(Mods::HARD_ROCK, &[(100.0, 100.0, 1100, Inputs::M1)]);
        assert!(HitErrorAnalyzer::hit_errors(&map, &play).unwrap().is_empty());

        let play = replay(Mods::NONE, &[(100.0, 100.0, 1100, Inputs::M1)]);
        assert_eq!(HitErrorAnalyzer::hit_errors(&map, &play).unwrap(), vec![100.0]);
    }

    #[test]
    fn test_empty_inputs() {
        let map = beatmap(4.0, 8.0, &[]);
        let play = replay(Mods::NONE, &[(100.0, 100.0, 1100, Inputs::M1)]);
        let stats = HitErrorAnalyzer::analyze(&map, &play).unwrap();
        assert!(stats.is_empty());
        assert_eq!(stats.unstable_rate, None);
    }

    #[test]
    fn test_check_beatmap_hash() {
        let mut map = beatmap(4.0, 8.0, &[]);
        let mut play = replay(Mods::NONE, &[]);
        assert_eq!(HitErrorAnalyzer::check_beatmap_hash(&map, &play), None);

        map.md5_hash = Some("d41d8cd98f00b204e9800998ecf8427e".to_string());
        play.beatmap_hash = Some("D41D8CD98F00B204E9800998ECF8427E".to_string());
        assert_eq!(HitErrorAnalyzer::check_beatmap_hash(&map, &play), Some(true));

        play.beatmap_hash = Some("098f6bcd4621d373cade4e832627b4f6".to_string());
        assert_eq!(HitErrorAnalyzer::check_beatmap_hash(&map, &play), Some(false));
    }
}
