use anyhow::{Result, bail};
use clap::Parser;
use levelgen::{Difficulty, GenerationOptions, audit_level, generate_level};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use tools::logging::init_tracing;
use tracing::{error, info};

const DIFFICULTIES: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

#[derive(Parser)]
#[command(author, version, about = "Sweep seeds and audit every generated level", long_about = None)]
struct Args {
    /// Seed for the sweep itself; level seeds are drawn from it
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// Level seeds to try per difficulty
    #[arg(short, long, default_value_t = 500)]
    levels: u32,
    /// Keep going after the first failing level
    #[arg(long)]
    keep_going: bool,
}

fn main() -> Result<()> {
    init_tracing("warn");
    let args = Args::parse();

    println!("Auditing {} levels per difficulty from sweep seed {}...", args.levels, args.seed);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut failures = 0_u32;
    let mut repaired = 0_u32;

    for _ in 0..args.levels {
        let level_seed = (rng.next_u64() >> 32) as u32;
        for difficulty in DIFFICULTIES {
            let options = GenerationOptions::seeded(level_seed).with_difficulty(difficulty);
            let generated = generate_level(&options)?;
            if !generated.report.is_clean() {
                repaired += 1;
            }

            let findings = audit_level(&generated.level);
            if findings.is_empty() {
                continue;
            }
            failures += 1;
            for finding in &findings {
                error!(seed = level_seed, difficulty = difficulty.as_str(), "{finding}");
            }
            if !args.keep_going {
                bail!("seed {level_seed} ({}) failed the audit", difficulty.as_str());
            }
        }
    }

    let total = args.levels * DIFFICULTIES.len() as u32;
    info!(total, repaired, failures, "sweep finished");
    println!("Audited {total} levels: {repaired} needed repairs, {failures} failed.");
    if failures > 0 {
        bail!("{failures} levels failed the audit");
    }
    Ok(())
}
