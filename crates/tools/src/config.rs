//! Generation options assembled from an optional TOML file plus flag overrides.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use levelgen::{Difficulty, GenerationOptions};

/// Flag values that win over whatever the config file says.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OptionOverrides {
    pub seed: Option<u32>,
    pub difficulty: Option<Difficulty>,
    pub min_rooms: Option<usize>,
    pub max_rooms: Option<usize>,
    pub min_enemies: Option<usize>,
    pub max_enemies: Option<usize>,
}

impl OptionOverrides {
    pub fn apply(&self, mut options: GenerationOptions) -> GenerationOptions {
        if let Some(seed) = self.seed {
            options.seed = Some(seed);
        }
        if let Some(difficulty) = self.difficulty {
            options.difficulty = difficulty;
        }
        if let Some(min_rooms) = self.min_rooms {
            options.min_rooms = min_rooms;
        }
        if let Some(max_rooms) = self.max_rooms {
            options.max_rooms = max_rooms;
        }
        if let Some(min_enemies) = self.min_enemies {
            options.min_enemies = min_enemies;
        }
        if let Some(max_enemies) = self.max_enemies {
            options.max_enemies = max_enemies;
        }
        options
    }
}

pub fn parse_options(content: &str) -> Result<GenerationOptions> {
    toml::from_str(content).context("Failed to parse generation options TOML")
}

pub fn read_options_file(path: &Path) -> Result<GenerationOptions> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_options(&content).with_context(|| format!("Invalid config file: {}", path.display()))
}

/// File values (or defaults when no file is given) with `overrides` applied,
/// then checked with [`GenerationOptions::validate`].
pub fn resolve_options(
    config: Option<&Path>,
    overrides: &OptionOverrides,
) -> Result<GenerationOptions> {
    let base = match config {
        Some(path) => read_options_file(path)?,
        None => GenerationOptions::default(),
    };
    let options = overrides.apply(base);
    options.validate()?;
    Ok(options)
}
