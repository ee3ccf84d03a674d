//! Small boxes clustered around the room's hotspots.

use crate::mapgen::model::{PickupKind, PropType, Room};
use crate::types::Vec3;

use super::{LootEntry, PlacementContext, PropProfile, PropSubGenerator};

const HOTSPOT_SPREAD: f32 = 2.5;

const BOX_LOOT: [LootEntry; 2] = [
    LootEntry { kind: PickupKind::PistolAmmo, min: 6, max: 12, weight: 2.0 },
    LootEntry { kind: PickupKind::Health, min: 5, max: 15, weight: 1.0 },
];

pub struct BoxGenerator {
    profile: PropProfile,
}

impl Default for BoxGenerator {
    fn default() -> Self {
        Self {
            profile: PropProfile {
                prop_type: PropType::Box,
                room_chance: 0.7,
                count: (2, 5),
                height: 0.5,
                scale: (0.8, 1.2),
                health: 25.0,
                loot_chance: 0.2,
                loot_table: &BOX_LOOT,
                attempts: 60,
            },
        }
    }
}

impl PropSubGenerator for BoxGenerator {
    fn name(&self) -> &'static str {
        "box"
    }

    fn profile(&self) -> &PropProfile {
        &self.profile
    }

    fn find_spot(
        &self,
        room: &Room,
        radius: f32,
        context: &mut PlacementContext<'_>,
    ) -> Option<Vec3> {
        let attempts = self.profile.attempts / 2;
        if let Some(hotspot) = context.pick_hotspot() {
            let near =
                context.find_spot_near(room, hotspot.position, HOTSPOT_SPREAD, radius, attempts);
            if near.is_some() {
                return near;
            }
        }
        context.find_free_spot(room, radius, attempts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapgen::props::OccupancyRegistry;
    use crate::rng::LevelRng;

    #[test]
    fn boxes_gather_near_hotspots() {
        let room = Room {
            id: 1,
            center: Vec3::ZERO,
            width: 16.0,
            depth: 16.0,
            height: 4.0,
            floor_color: 0,
            wall_color: 0,
        };
        let mut rng = LevelRng::seeded(12);
        let mut occupancy = OccupancyRegistry::new();
        let mut props = Vec::new();
        let mut context = PlacementContext::new(&mut rng, &mut occupancy, &[], None, &mut props);
        context.record_hotspots(&room);
        let hotspots: Vec<Vec3> = context.hotspots.iter().map(|hotspot| hotspot.position).collect();

        let generator = BoxGenerator::default();
        for _ in 0..10 {
            generator.generate_for_room(&room, &mut context);
        }
        drop(context);

        assert!(!props.is_empty());
        let near = props
            .iter()
            .filter(|prop| {
                hotspots.iter().any(|spot| spot.distance_xz(prop.position) <= HOTSPOT_SPREAD * 1.5)
            })
            .count();
        assert!(near * 2 >= props.len(), "{near} of {} boxes near a hotspot", props.len());
    }
}
