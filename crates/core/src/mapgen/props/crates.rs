use crate::mapgen::model::{PickupKind, PropType};

use super::{LootEntry, PropProfile, PropSubGenerator};

const CRATE_LOOT: [LootEntry; 5] = [
    LootEntry { kind: PickupKind::PistolAmmo, min: 8, max: 24, weight: 3.0 },
    LootEntry { kind: PickupKind::RifleAmmo, min: 20, max: 60, weight: 2.0 },
    LootEntry { kind: PickupKind::ShotgunAmmo, min: 4, max: 12, weight: 1.5 },
    LootEntry { kind: PickupKind::Health, min: 10, max: 25, weight: 2.0 },
    LootEntry { kind: PickupKind::Armor, min: 10, max: 25, weight: 1.0 },
];

pub struct CrateGenerator {
    profile: PropProfile,
}

impl Default for CrateGenerator {
    fn default() -> Self {
        Self {
            profile: PropProfile {
                prop_type: PropType::Crate,
                room_chance: 0.8,
                count: (1, 3),
                height: 1.0,
                scale: (0.85, 1.15),
                health: 80.0,
                loot_chance: 0.4,
                loot_table: &CRATE_LOOT,
                attempts: 100,
            },
        }
    }
}

impl PropSubGenerator for CrateGenerator {
    fn name(&self) -> &'static str {
        "crate"
    }

    fn profile(&self) -> &PropProfile {
        &self.profile
    }
}
