//! Caller-facing generation options.

use serde::{Deserialize, Serialize};

use crate::error::GenerationError;
use crate::types::Difficulty;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationOptions {
    pub min_rooms: usize,
    pub max_rooms: usize,
    /// Total enemy bounds before per-room capacity clamping.
    pub min_enemies: usize,
    pub max_enemies: usize,
    pub difficulty: Difficulty,
    /// `None` selects a non-reproducible stream.
    pub seed: Option<u32>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            min_rooms: 6,
            max_rooms: 10,
            min_enemies: 8,
            max_enemies: 30,
            difficulty: Difficulty::Medium,
            seed: None,
        }
    }
}

impl GenerationOptions {
    pub fn seeded(seed: u32) -> Self {
        Self { seed: Some(seed), ..Self::default() }
    }

    pub fn with_rooms(mut self, min_rooms: usize, max_rooms: usize) -> Self {
        self.min_rooms = min_rooms;
        self.max_rooms = max_rooms;
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.min_rooms == 0 {
            return Err(GenerationError::InvalidOptions {
                reason: "min_rooms must be at least 1".to_string(),
            });
        }
        if self.min_rooms > self.max_rooms {
            return Err(GenerationError::InvalidOptions {
                reason: format!(
                    "min_rooms ({}) exceeds max_rooms ({})",
                    self.min_rooms, self.max_rooms
                ),
            });
        }
        if self.min_enemies > self.max_enemies {
            return Err(GenerationError::InvalidOptions {
                reason: format!(
                    "min_enemies ({}) exceeds max_enemies ({})",
                    self.min_enemies, self.max_enemies
                ),
            });
        }
        Ok(())
    }
}
