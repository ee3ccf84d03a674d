//! Vertical crate stacks: one floor footprint, several slots, bounded by the ceiling.

use tracing::debug;

use crate::mapgen::model::{PickupKind, PropType, Room};
use crate::types::Vec3;

use super::{LootEntry, PlacementContext, PropProfile, PropSubGenerator};

pub(crate) const STACK_LEVELS: usize = 3;
pub(crate) const CEILING_CLEARANCE: f32 = 0.3;

const STACK_LOOT: [LootEntry; 3] = [
    LootEntry { kind: PickupKind::RifleAmmo, min: 20, max: 40, weight: 2.0 },
    LootEntry { kind: PickupKind::PistolAmmo, min: 12, max: 24, weight: 2.0 },
    LootEntry { kind: PickupKind::Armor, min: 10, max: 25, weight: 1.0 },
];

pub struct StackGenerator {
    profile: PropProfile,
    levels: usize,
}

impl Default for StackGenerator {
    fn default() -> Self {
        Self {
            profile: PropProfile {
                prop_type: PropType::Crate,
                room_chance: 0.4,
                count: (1, 1),
                height: 1.0,
                scale: (0.9, 1.15),
                health: 80.0,
                loot_chance: 0.25,
                loot_table: &STACK_LOOT,
                attempts: 100,
            },
            levels: STACK_LEVELS,
        }
    }
}

impl StackGenerator {
    /// Levels that fit under the ceiling: the full stack, or a single prop.
    fn fitting_levels(&self, room: &Room, scale: f32) -> usize {
        let stack_height = self.levels as f32 * self.profile.height * scale;
        if stack_height <= room.height - CEILING_CLEARANCE { self.levels } else { 1 }
    }
}

impl PropSubGenerator for StackGenerator {
    fn name(&self) -> &'static str {
        "stack"
    }

    fn profile(&self) -> &PropProfile {
        &self.profile
    }

    fn generate_for_room(&self, room: &Room, context: &mut PlacementContext<'_>) {
        let profile = &self.profile;
        if !context.rng.chance(profile.room_chance) {
            return;
        }
        let scale = context.rng.float(profile.scale.0, profile.scale.1);
        let radius = profile.prop_type.footprint_radius() * scale;
        let Some(base) = self.find_spot(room, radius, context) else {
            debug!(room = room.id, "no free spot for prop stack; skipped");
            return;
        };

        let levels = self.fitting_levels(room, scale);
        if levels < self.levels {
            debug!(room = room.id, height = room.height, "stack clips the ceiling; single prop");
        }
        context.occupy(base, radius);
        for level in 0..levels {
            let position = Vec3::new(base.x, base.y + level as f32 * profile.height * scale, base.z);
            let loot = self.loot(profile.prop_type, context);
            context.emit(room, profile, profile.prop_type, position, scale, loot);
        }
    }
}
