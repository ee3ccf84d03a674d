use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use levelgen::{Difficulty, LevelGenerator};
use tools::config::{OptionOverrides, resolve_options};
use tools::level_file::write_level_file;
use tools::logging::init_tracing;
use tracing::{info, warn};

#[derive(Parser)]
#[command(author, version, about = "Generate a mission level", long_about = None)]
struct Args {
    /// TOML file with generation options; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Seed for a reproducible level; omit for a fresh one each run
    #[arg(short, long)]
    seed: Option<u32>,
    /// easy, medium or hard
    #[arg(short, long)]
    difficulty: Option<Difficulty>,
    #[arg(long)]
    min_rooms: Option<usize>,
    #[arg(long)]
    max_rooms: Option<usize>,
    #[arg(long)]
    min_enemies: Option<usize>,
    #[arg(long)]
    max_enemies: Option<usize>,
    /// Write a digest-checked level file here instead of printing JSON
    #[arg(short, long)]
    out: Option<PathBuf>,
    /// Pretty-print the JSON written to stdout
    #[arg(long)]
    pretty: bool,
}

impl Args {
    fn overrides(&self) -> OptionOverrides {
        OptionOverrides {
            seed: self.seed,
            difficulty: self.difficulty,
            min_rooms: self.min_rooms,
            max_rooms: self.max_rooms,
            min_enemies: self.min_enemies,
            max_enemies: self.max_enemies,
        }
    }
}

fn main() -> Result<()> {
    init_tracing("info");
    let args = Args::parse();

    let options = resolve_options(args.config.as_deref(), &args.overrides())?;
    let generated = LevelGenerator::new(options.clone())
        .generate()
        .with_context(|| format!("Level generation failed for {options:?}"))?;

    let summary = generated.level.summary();
    info!(
        name = %generated.level.name,
        seed = ?options.seed,
        difficulty = options.difficulty.as_str(),
        rooms = summary.rooms,
        doors = summary.doors,
        loop_doors = summary.loop_doors,
        enemies = summary.enemies,
        pickups = summary.pickups,
        props = summary.props,
        objectives = summary.objectives,
        fingerprint = %format!("{:016x}", summary.fingerprint),
        "generated level"
    );
    if !generated.report.is_clean() {
        warn!(
            issues = generated.report.issues.len(),
            fixes = generated.report.fixes.len(),
            "validator repaired the level"
        );
    }

    match &args.out {
        Some(path) => {
            write_level_file(path, &generated.level)
                .with_context(|| format!("Failed to write level file: {}", path.display()))?;
            info!(path = %path.display(), "level file written");
        }
        None => {
            let json = if args.pretty {
                serde_json::to_string_pretty(&generated.level)
            } else {
                serde_json::to_string(&generated.level)
            }
            .context("Failed to serialize level")?;
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{json}").context("Failed to write level to stdout")?;
        }
    }

    Ok(())
}
