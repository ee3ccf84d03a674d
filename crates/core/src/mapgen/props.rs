//! Prop population: five sub-generators sharing one occupancy registry per level.

mod barrels;
mod boxes;
mod crates;
pub mod occupancy;
pub mod placement;
mod stacks;
mod weapons;

use tracing::debug;

use crate::rng::LevelRng;
use crate::types::Vec3;

use super::enemies::is_populated_room;
use super::model::{Door, EnemySpawn, PlayerSpawn, Prop, PropLoot, PropType, Room};

pub use barrels::BarrelGenerator;
pub use boxes::BoxGenerator;
pub use crates::CrateGenerator;
pub use occupancy::OccupancyRegistry;
pub use placement::{Hotspot, LootEntry, PlacementContext, PropProfile};
pub use stacks::StackGenerator;
pub use weapons::WeaponCrateGenerator;

pub(crate) const ENEMY_FOOTPRINT: f32 = 0.4;

/// One prop family. Variants supply a profile and override only the hooks they need.
pub trait PropSubGenerator {
    fn name(&self) -> &'static str;

    fn profile(&self) -> &PropProfile;

    fn prop_type(&self, _context: &mut PlacementContext<'_>) -> PropType {
        self.profile().prop_type
    }

    fn find_spot(
        &self,
        room: &Room,
        radius: f32,
        context: &mut PlacementContext<'_>,
    ) -> Option<Vec3> {
        context.find_free_spot(room, radius, self.profile().attempts)
    }

    fn loot(&self, _prop_type: PropType, context: &mut PlacementContext<'_>) -> Option<PropLoot> {
        context.roll_loot(self.profile())
    }

    fn generate_for_room(&self, room: &Room, context: &mut PlacementContext<'_>) {
        let profile = self.profile();
        if !context.rng.chance(profile.room_chance) {
            return;
        }
        let count = context.rng.int(profile.count.0, profile.count.1);
        for _ in 0..count {
            let prop_type = self.prop_type(context);
            let scale = context.rng.float(profile.scale.0, profile.scale.1);
            let radius = prop_type.footprint_radius() * scale;
            let Some(position) = self.find_spot(room, radius, context) else {
                debug!(room = room.id, generator = self.name(), "no free spot for prop; skipped");
                continue;
            };
            let loot = self.loot(prop_type, context);
            context.occupy(position, radius);
            context.emit(room, profile, prop_type, position, scale, loot);
        }
    }
}

pub struct PropSpawner {
    generators: Vec<Box<dyn PropSubGenerator>>,
}

impl PropSpawner {
    /// Largest footprints first so small props fill the gaps.
    pub fn standard() -> Self {
        Self {
            generators: vec![
                Box::new(StackGenerator::default()),
                Box::new(CrateGenerator::default()),
                Box::new(WeaponCrateGenerator::default()),
                Box::new(BarrelGenerator::default()),
                Box::new(BoxGenerator::default()),
            ],
        }
    }

    pub fn with_generators(generators: Vec<Box<dyn PropSubGenerator>>) -> Self {
        Self { generators }
    }

    pub fn generate(
        &self,
        rooms: &[Room],
        doors: &[Door],
        player_spawn: Option<PlayerSpawn>,
        enemies: &[EnemySpawn],
        rng: &mut LevelRng,
    ) -> Vec<Prop> {
        let door_points: Vec<Vec3> = doors.iter().map(|door| door.center).collect();
        let mut occupancy = OccupancyRegistry::new();
        for enemy in enemies {
            occupancy.occupy(enemy.position, ENEMY_FOOTPRINT);
        }

        let mut props = Vec::new();
        let mut context = PlacementContext::new(
            rng,
            &mut occupancy,
            &door_points,
            player_spawn.map(|spawn| spawn.position),
            &mut props,
        );
        for room in rooms.iter().filter(|room| is_populated_room(room)) {
            context.record_hotspots(room);
            for generator in &self.generators {
                generator.generate_for_room(room, &mut context);
            }
        }
        debug!(props = context.placed().len(), "prop population complete");
        props
    }
}

impl Default for PropSpawner {
    fn default() -> Self {
        Self::standard()
    }
}

pub fn generate_props(
    rooms: &[Room],
    doors: &[Door],
    player_spawn: Option<PlayerSpawn>,
    enemies: &[EnemySpawn],
    rng: &mut LevelRng,
) -> Vec<Prop> {
    PropSpawner::standard().generate(rooms, doors, player_spawn, enemies, rng)
}

/// Props sharing a floor position belong to one stack and only claim one circle.
pub fn same_column(a: &Prop, b: &Prop) -> bool {
    (a.position.x - b.position.x).abs() < 1e-4 && (a.position.z - b.position.z).abs() < 1e-4
}
