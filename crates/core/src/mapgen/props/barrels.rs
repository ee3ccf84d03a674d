use crate::mapgen::model::{PickupKind, PropLoot, PropType};

use super::{LootEntry, PlacementContext, PropProfile, PropSubGenerator};

const EXPLOSIVE_CHANCE: f64 = 0.25;

const BARREL_LOOT: [LootEntry; 2] = [
    LootEntry { kind: PickupKind::ShotgunAmmo, min: 4, max: 8, weight: 1.0 },
    LootEntry { kind: PickupKind::RifleAmmo, min: 15, max: 30, weight: 1.0 },
];

pub struct BarrelGenerator {
    profile: PropProfile,
}

impl Default for BarrelGenerator {
    fn default() -> Self {
        Self {
            profile: PropProfile {
                prop_type: PropType::Barrel,
                room_chance: 0.6,
                count: (1, 3),
                height: 1.2,
                scale: (0.9, 1.1),
                health: 40.0,
                loot_chance: 0.15,
                loot_table: &BARREL_LOOT,
                attempts: 80,
            },
        }
    }
}

impl PropSubGenerator for BarrelGenerator {
    fn name(&self) -> &'static str {
        "barrel"
    }

    fn profile(&self) -> &PropProfile {
        &self.profile
    }

    fn prop_type(&self, context: &mut PlacementContext<'_>) -> PropType {
        if context.rng.chance(EXPLOSIVE_CHANCE) {
            PropType::ExplosiveBarrel
        } else {
            PropType::Barrel
        }
    }

    fn loot(&self, prop_type: PropType, context: &mut PlacementContext<'_>) -> Option<PropLoot> {
        match prop_type {
            PropType::ExplosiveBarrel => None,
            _ => context.roll_loot(&self.profile),
        }
    }
}
