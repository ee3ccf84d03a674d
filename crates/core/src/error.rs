//! Fatal generation failures. Everything else degrades by skipping the entity.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// Options that cannot describe any level.
    #[error("invalid generation options: {reason}")]
    InvalidOptions { reason: String },

    /// Every layout attempt ran out of non-overlapping placements.
    #[error("cannot lay out {room_count} rooms after {attempts} attempts")]
    RoomLayoutExhausted { room_count: usize, attempts: usize },
}
