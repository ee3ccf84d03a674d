//! Mission generation orchestration: one RNG stream drawn in a fixed stage order.

use tracing::debug;

use crate::error::GenerationError;
use crate::options::GenerationOptions;
use crate::rng::LevelRng;
use crate::types::Vec3;
use crate::validator::{LevelValidator, ValidationReport};

use super::briefing::{mission_briefing, mission_name};
use super::doors::generate_doors;
use super::enemies::generate_enemies;
use super::graph::RoomGraph;
use super::layout::generate_rooms;
use super::model::{Level, PlayerSpawn, Room};
use super::objectives::generate_objectives;
use super::pickups::generate_pickups;
use super::props::generate_props;

const SPAWN_FRONT_OFFSET: f32 = 2.0;

/// A validated level plus the intermediate data callers may want to inspect.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedLevel {
    pub level: Level,
    pub graph: RoomGraph,
    pub report: ValidationReport,
    pub loop_doors: usize,
}

pub struct LevelGenerator {
    options: GenerationOptions,
}

impl LevelGenerator {
    pub fn new(options: GenerationOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    pub fn generate(&self) -> Result<GeneratedLevel, GenerationError> {
        self.options.validate()?;
        let options = &self.options;
        let mut rng = LevelRng::from_optional_seed(options.seed);

        let room_count = rng.int(options.min_rooms as i64, options.max_rooms as i64) as usize;
        let layout = generate_rooms(room_count, &mut rng)?;
        let rooms = layout.rooms;
        let plan = generate_doors(&rooms, &layout.main_path, options.difficulty, &mut rng);
        let player_spawn = rooms.first().map(spawn_point);

        let enemies = generate_enemies(&rooms, options, &mut rng);
        let props = generate_props(&rooms, &plan.doors, player_spawn, &enemies, &mut rng);
        let pickups = generate_pickups(&rooms, &plan.doors, &plan.graph, &props, &mut rng);
        let (objectives, triggers) = generate_objectives(&rooms, &plan.graph);

        let name = mission_name(&mut rng);
        let briefing =
            mission_briefing(&objectives, rooms.len(), enemies.len(), options.difficulty);

        let mut level = Level {
            name,
            briefing,
            seed: options.seed,
            rooms,
            doors: plan.doors,
            player_spawn,
            enemies,
            pickups,
            objectives,
            triggers,
            props,
        };
        let report = LevelValidator::new(rng).validate(&mut level);

        debug!(
            name = %level.name,
            rooms = level.rooms.len(),
            doors = level.doors.len(),
            loop_doors = plan.loop_doors,
            enemies = level.enemies.len(),
            props = level.props.len(),
            pickups = level.pickups.len(),
            issues = report.issues.len(),
            "level generated"
        );
        Ok(GeneratedLevel { level, graph: plan.graph, report, loop_doors: plan.loop_doors })
    }
}

/// Just inside the front (`-z`) wall of the first room, facing into it.
fn spawn_point(room: &Room) -> PlayerSpawn {
    PlayerSpawn {
        position: Vec3::new(room.center.x, room.center.y, room.min_z() + SPAWN_FRONT_OFFSET),
        facing: 0.0,
    }
}
