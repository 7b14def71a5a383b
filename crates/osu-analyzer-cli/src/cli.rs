//! Command parsing and execution
//!
//! Usage:
//!   osu-analyzer replay <file.osr>
//!   osu-analyzer beatmap <file.osu>
//!   osu-analyzer analyze <file.osr> <file.osu> [--export <path>]
//!   osu-analyzer list
//!
//! Options:
//!   --json             Output in JSON format
//!   --verbose          Enable debug logging

use std::path::{Path, PathBuf};

use anyhow::Context;

use osu_analyzer_core::config::Config;
use osu_analyzer_core::stats::{BeatmapSummary, ReplaySummary};
use osu_analyzer_core::{
    parse_osu_file, read_replay_file, AnalysisReport, BeatmapInfo, ExportFormat, HitErrorAnalyzer,
    HitObjectKind, ReplayInfo,
};

/// CLI command to execute
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    Replay {
        path: PathBuf,
    },
    Beatmap {
        path: PathBuf,
    },
    Analyze {
        replay: PathBuf,
        beatmap: PathBuf,
    },
    List,
}

/// CLI options
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOptions {
    pub json: bool,
    pub verbose: bool,
    pub export: Option<PathBuf>,
}

/// Parse CLI arguments and return command + options
pub fn parse_args(args: &[String]) -> Result<(CliCommand, CliOptions), String> {
    let mut options = CliOptions::default();
    let mut command_name: Option<&str> = None;
    let mut positional: Vec<PathBuf> = Vec::new();

    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];
        match arg.as_str() {
            "--json" => options.json = true,
            "--verbose" | "-v" => options.verbose = true,
            "--export" | "-o" => {
                i += 1;
                if i >= args.len() {
                    return Err("--export requires a path".to_string());
                }
                options.export = Some(PathBuf::from(&args[i]));
            }
            flag if flag.starts_with('-') => return Err(format!("Unknown option: {}", flag)),
            value => match command_name {
                None => match value {
                    "replay" | "beatmap" | "analyze" | "list" => command_name = Some(value),
                    _ => return Err(format!("Unknown command: {}", value)),
                },
                Some(_) => positional.push(PathBuf::from(value)),
            },
        }
        i += 1;
    }

    let command = match (command_name, positional.as_slice()) {
        (Some("replay"), [path]) => CliCommand::Replay { path: path.clone() },
        (Some("beatmap"), [path]) => CliCommand::Beatmap { path: path.clone() },
        (Some("analyze"), [replay, beatmap]) => CliCommand::Analyze {
            replay: replay.clone(),
            beatmap: beatmap.clone(),
        },
        (Some("list"), []) => CliCommand::List,
        (Some("replay"), _) => return Err("replay requires exactly one .osr file".to_string()),
        (Some("beatmap"), _) => return Err("beatmap requires exactly one .osu file".to_string()),
        (Some("analyze"), _) => {
            return Err("analyze requires a .osr file followed by a .osu file".to_string())
        }
        (Some(other), _) => return Err(format!("{} takes no arguments", other)),
        (None, _) => {
            return Err(
                "No command specified. Use: replay, beatmap, analyze, or list".to_string(),
            )
        }
    };

    if options.export.is_some() && !matches!(command, CliCommand::Analyze { .. }) {
        return Err("--export is only supported by analyze".to_string());
    }

    Ok((command, options))
}

/// Run CLI command
pub fn run(command: CliCommand, options: CliOptions) -> anyhow::Result<()> {
    match command {
        CliCommand::Replay { path } => run_replay(&path, &options),
        CliCommand::Beatmap { path } => run_beatmap(&path, &options),
        CliCommand::Analyze { replay, beatmap } => run_analyze(&replay, &beatmap, &options),
        CliCommand::List => run_list(&options),
    }
}

fn load_replay(path: &Path) -> anyhow::Result<ReplayInfo> {
    read_replay_file(path).with_context(|| format!("Failed to read replay {}", path.display()))
}

fn load_beatmap(path: &Path) -> anyhow::Result<BeatmapInfo> {
    parse_osu_file(path).with_context(|| format!("Failed to parse beatmap {}", path.display()))
}

fn run_replay(path: &Path, options: &CliOptions) -> anyhow::Result<()> {
    let replay = load_replay(path)?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&ReplaySummary::from(&replay))?);
        return Ok(());
    }

    println!("Replay: {}", path.display());
    println!();
    println!("Player:      {}", replay.player_name.as_deref().unwrap_or("Unknown"));
    println!("Mode:        {}", replay.mode);
    println!("Version:     {}", replay.version);
    println!("Played:      {}", replay.timestamp.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("Mods:        {}", replay.mods);
    println!("Score:       {}", replay.score);
    println!(
        "Max combo:   {}x{}",
        replay.max_combo,
        if replay.perfect_combo { " (FC)" } else { "" }
    );
    println!(
        "Hits:        {} / {} / {} / {} miss",
        replay.count_300, replay.count_100, replay.count_50, replay.count_miss
    );
    println!("Accuracy:    {:.2}% ({})", replay.accuracy(), replay.grade());
    println!("Frames:      {}", replay.frames.len());
    if replay.score_id != 0 {
        println!("Score ID:    {}", replay.score_id);
    }
    Ok(())
}

fn run_beatmap(path: &Path, options: &CliOptions) -> anyhow::Result<()> {
    let beatmap = load_beatmap(path)?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&BeatmapSummary::from(&beatmap))?);
        return Ok(());
    }

    let metadata = &beatmap.metadata;
    let difficulty = &beatmap.difficulty;

    println!(
        "{} - {} [{}]",
        metadata.display_artist(),
        metadata.display_title(),
        metadata.version.as_deref().unwrap_or("Unknown")
    );
    println!("Mapped by {}", metadata.creator.as_deref().unwrap_or("Unknown"));
    println!();
    println!(
        "CS {} / AR {} / OD {} / HP {}",
        difficulty.circle_size,
        difficulty.approach_rate,
        difficulty.overall_difficulty,
        difficulty.hp_drain
    );
    println!(
        "Objects:     {} ({} circles, {} sliders, {} spinners)",
        beatmap.hit_objects.len(),
        beatmap.count_of(HitObjectKind::Circle),
        beatmap.count_of(HitObjectKind::Slider),
        beatmap.count_of(HitObjectKind::Spinner)
    );
    println!("Length:      {:.1}s", beatmap.length_ms() / 1000.0);
    if let Some(ref hash) = beatmap.md5_hash {
        println!("MD5:         {}", hash);
    }
    Ok(())
}

fn run_analyze(replay_path: &Path, beatmap_path: &Path, options: &CliOptions) -> anyhow::Result<()> {
    let replay = load_replay(replay_path)?;
    let beatmap = load_beatmap(beatmap_path)?;

    if HitErrorAnalyzer::check_beatmap_hash(&beatmap, &replay) == Some(false) {
        tracing::warn!("Replay was not recorded on this beatmap version");
        eprintln!("Warning: replay beatmap hash does not match {}", beatmap_path.display());
    }

    let stats = HitErrorAnalyzer::analyze(&beatmap, &replay)
        .context("Failed to analyze replay")?;
    let report = AnalysisReport::new(&beatmap, &replay, stats);

    if options.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "{} on {} - {} [{}] +{}",
            report.replay.player_name.as_deref().unwrap_or("Unknown"),
            report.beatmap.artist,
            report.beatmap.title,
            report.beatmap.version.as_deref().unwrap_or("Unknown"),
            report.replay.mods
        );
        println!();
        println!("{}", report.stats);
    }

    if let Some(ref export_path) = options.export {
        let format = ExportFormat::from_path(export_path)
            .unwrap_or_else(|| Config::load().default_export_format);
        format
            .export(&report, export_path)
            .with_context(|| format!("Failed to export to {}", export_path.display()))?;
        if !options.json {
            println!();
            println!("Exported {} report to {}", format, export_path.display());
        }
    }

    Ok(())
}

fn run_list(options: &CliOptions) -> anyhow::Result<()> {
    let config = Config::load();
    let replays = config.list_replays();
    let beatmaps = config.list_beatmaps();

    if options.json {
        println!(
            "{}",
            serde_json::json!({
                "replays_dir": config.replays_dir.to_string_lossy(),
                "beatmaps_dir": config.beatmaps_dir.to_string_lossy(),
                "replays": replays.iter().map(|p| p.to_string_lossy()).collect::<Vec<_>>(),
                "beatmaps": beatmaps.iter().map(|p| p.to_string_lossy()).collect::<Vec<_>>(),
            })
        );
        return Ok(());
    }

    println!("Replays in {} ({}):", config.replays_dir.display(), replays.len());
    for path in &replays {
        println!("  {}", path.display());
    }
    println!();
    println!("Beatmaps in {} ({}):", config.beatmaps_dir.display(), beatmaps.len());
    for path in &beatmaps {
        println!("  {}", path.display());
    }
    Ok(())
}

/// Print CLI help
pub fn print_help() {
    println!("osu-analyzer v{}", env!("CARGO_PKG_VERSION"));
    println!("Measure hit timing accuracy of osu! replays");
    println!();
    println!("USAGE:");
    println!("    osu-analyzer <command> [options]");
    println!();
    println!("COMMANDS:");
    println!("    replay <file.osr>                 Show a replay summary");
    println!("    beatmap <file.osu>                Show a beatmap summary");
    println!("    analyze <file.osr> <file.osu>     Measure hit errors and unstable rate");
    println!("    list                              List replays and beatmaps in the configured folders");
    println!();
    println!("OPTIONS:");
    println!("    --json                      Output in JSON format");
    println!("    --export, -o <path>         Write the analysis report (.json or .csv)");
    println!("    --verbose, -v               Enable debug logging (RUST_LOG overrides)");
    println!("    --version, -V               Show version");
    println!("    --help, -h                  Show this help message");
    println!();
    println!("EXAMPLES:");
    println!("    osu-analyzer analyze replays/play.osr beatmaps/map.osu");
    println!("    osu-analyzer analyze play.osr map.osu --export report.csv");
    println!("    osu-analyzer replay play.osr --json");
}
