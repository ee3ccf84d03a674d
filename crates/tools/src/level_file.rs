//! On-disk level description with a SHA-256 digest for corruption detection.
//!
//! The file is a single pretty-printed JSON object:
//! `format_version`, the generation `seed`, `sha256_hex` over the level's
//! canonical bytes, and the `level` itself. Writes go through a temporary
//! file and a rename so readers never observe a half-written level.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use levelgen::Level;

pub const LEVEL_FORMAT_VERSION: u16 = 1;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
struct LevelFile {
    format_version: u16,
    seed: Option<u32>,
    sha256_hex: String,
    level: Level,
}

#[derive(Error, Debug)]
pub enum LevelFileError {
    #[error("level file I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("level file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported level format version {found} (expected {LEVEL_FORMAT_VERSION})")]
    UnsupportedVersion { found: u16 },

    #[error("level digest mismatch: stored {stored}, computed {computed}")]
    DigestMismatch { stored: String, computed: String },
}

/// `hex(SHA-256(canonical level bytes))`.
pub fn level_sha256_hex(level: &Level) -> String {
    let digest = Sha256::digest(level.canonical_bytes());
    format!("{digest:064x}")
}

pub fn write_level_file(path: &Path, level: &Level) -> Result<(), LevelFileError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let file = LevelFile {
        format_version: LEVEL_FORMAT_VERSION,
        seed: level.seed,
        sha256_hex: level_sha256_hex(level),
        level: level.clone(),
    };
    let json = serde_json::to_string_pretty(&file)?;
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

pub fn load_level_file(path: &Path) -> Result<Level, LevelFileError> {
    let content = fs::read_to_string(path)?;
    let file: LevelFile = serde_json::from_str(&content)?;
    if file.format_version != LEVEL_FORMAT_VERSION {
        return Err(LevelFileError::UnsupportedVersion { found: file.format_version });
    }
    let computed = level_sha256_hex(&file.level);
    if computed != file.sha256_hex {
        return Err(LevelFileError::DigestMismatch { stored: file.sha256_hex, computed });
    }
    Ok(file.level)
}

#[cfg(test)]
mod tests;
