pub mod audit;
pub mod error;
pub mod mapgen;
pub mod options;
pub mod rng;
pub mod types;
pub mod validator;

pub use audit::audit_level;
pub use error::GenerationError;
pub use mapgen::{GeneratedLevel, Level, LevelGenerator, LevelSummary, generate_level};
pub use options::GenerationOptions;
pub use rng::LevelRng;
pub use types::*;
pub use validator::{LevelValidator, ValidationReport, door_proximity_reachability};
