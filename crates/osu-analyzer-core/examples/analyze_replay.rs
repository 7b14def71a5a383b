//! Analyze a replay against its beatmap and print the hit error summary

use osu_analyzer_core::{parse_osu_file, read_replay_file, HitErrorAnalyzer};
use std::path::PathBuf;

fn main() {
    // Initialize tracing for debug output
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (replay_path, beatmap_path) = match args.as_slice() {
        [replay, beatmap] => (PathBuf::from(replay), PathBuf::from(beatmap)),
        _ => {
            eprintln!("Usage: analyze_replay <file.osr> <file.osu>");
            std::process::exit(2);
        }
    };

    let replay = match read_replay_file(&replay_path) {
        Ok(replay) => replay,
        Err(e) => {
            eprintln!("Failed to read replay: {}", e);
            if let Some(field) = e.replay_field() {
                eprintln!("  while decoding field: {}", field);
            }
            std::process::exit(1);
        }
    };

    let beatmap = match parse_osu_file(&beatmap_path) {
        Ok(beatmap) => beatmap,
        Err(e) => {
            eprintln!("Failed to parse beatmap: {}", e);
            std::process::exit(1);
        }
    };

    println!(
        "{} - {} [{}]",
        beatmap.metadata.display_artist(),
        beatmap.metadata.display_title(),
        beatmap.metadata.version.as_deref().unwrap_or("Unknown")
    );
    println!(
        "Played by {} with {} ({} frames)",
        replay.player_name.as_deref().unwrap_or("Unknown"),
        replay.mods,
        replay.frames.len()
    );
    println!("---");

    match HitErrorAnalyzer::analyze(&beatmap, &replay) {
        Ok(stats) => println!("{}", stats),
        Err(e) => eprintln!("Analysis failed: {}", e),
    }
}
