//! Procedural mission generation split into one submodule per pipeline stage.

pub mod briefing;
pub mod doors;
pub mod enemies;
pub mod generator;
pub mod graph;
pub mod layout;
pub mod model;
pub mod objectives;
pub mod pickups;
pub mod progression;
pub mod props;

pub use generator::{GeneratedLevel, LevelGenerator};
pub use graph::{DoorLink, RoomGraph};
pub use model::{
    Door, DoorAxis, DoorKind, EnemySpawn, EnemyType, Level, LevelSummary, Objective,
    PickupCategory, PickupKind, PickupSpawn, PlayerSpawn, Prop, PropLoot, PropType, Room, Trigger,
    TriggerEffect,
};

use crate::error::GenerationError;
use crate::options::GenerationOptions;

pub fn generate_level(options: &GenerationOptions) -> Result<GeneratedLevel, GenerationError> {
    LevelGenerator::new(options.clone()).generate()
}
