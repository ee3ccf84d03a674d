use crate::mapgen::model::{PickupKind, PropType};

use super::{LootEntry, PropProfile, PropSubGenerator};

const WEAPON_LOOT: [LootEntry; 3] = [
    LootEntry { kind: PickupKind::Pistol, min: 1, max: 1, weight: 3.0 },
    LootEntry { kind: PickupKind::Rifle, min: 1, max: 1, weight: 2.0 },
    LootEntry { kind: PickupKind::Shotgun, min: 1, max: 1, weight: 1.0 },
];

/// Rare crates that always hold a weapon.
pub struct WeaponCrateGenerator {
    profile: PropProfile,
}

impl Default for WeaponCrateGenerator {
    fn default() -> Self {
        Self {
            profile: PropProfile {
                prop_type: PropType::WeaponCrate,
                room_chance: 0.3,
                count: (1, 1),
                height: 0.8,
                scale: (1.0, 1.0),
                health: 120.0,
                loot_chance: 1.0,
                loot_table: &WEAPON_LOOT,
                attempts: 100,
            },
        }
    }
}

impl PropSubGenerator for WeaponCrateGenerator {
    fn name(&self) -> &'static str {
        "weapon_crate"
    }

    fn profile(&self) -> &PropProfile {
        &self.profile
    }
}
