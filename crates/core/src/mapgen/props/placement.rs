//! Rejection sampling, exclusion zones and loot rolls shared by every prop sub-generator.

use std::f32::consts::TAU;

use crate::mapgen::model::{PickupKind, Prop, PropLoot, PropType, Room};
use crate::rng::LevelRng;
use crate::types::Vec3;

use super::occupancy::OccupancyRegistry;

pub(crate) const WALL_BUFFER: f32 = 0.8;
const CORNER_EXCLUSION: f32 = 1.5;
pub(crate) const DOOR_EXCLUSION: f32 = 2.0;
pub(crate) const SPAWN_EXCLUSION: f32 = 3.0;
const CORNER_HOTSPOT_INSET: f32 = 2.0;
const WALL_HOTSPOT_INSET: f32 = 1.5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LootEntry {
    pub kind: PickupKind,
    pub min: u32,
    pub max: u32,
    pub weight: f64,
}

/// Type-specific configuration table each sub-generator supplies.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PropProfile {
    pub prop_type: PropType,
    pub room_chance: f64,
    pub count: (i64, i64),
    pub height: f32,
    pub scale: (f32, f32),
    pub health: f32,
    pub loot_chance: f64,
    pub loot_table: &'static [LootEntry],
    pub attempts: usize,
}

/// Weighted point of interest used to cluster small props.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hotspot {
    pub position: Vec3,
    pub weight: f64,
}

pub struct PlacementContext<'a> {
    pub rng: &'a mut LevelRng,
    pub occupancy: &'a mut OccupancyRegistry,
    pub doors: &'a [Vec3],
    pub player_spawn: Option<Vec3>,
    pub hotspots: Vec<Hotspot>,
    props: &'a mut Vec<Prop>,
}

impl<'a> PlacementContext<'a> {
    pub fn new(
        rng: &'a mut LevelRng,
        occupancy: &'a mut OccupancyRegistry,
        doors: &'a [Vec3],
        player_spawn: Option<Vec3>,
        props: &'a mut Vec<Prop>,
    ) -> Self {
        Self { rng, occupancy, doors, player_spawn, hotspots: Vec::new(), props }
    }

    /// Corners score higher than wall midpoints; points near doors are dropped.
    pub fn record_hotspots(&mut self, room: &Room) {
        let corner_x = room.half_width() - CORNER_HOTSPOT_INSET;
        let corner_z = room.half_depth() - CORNER_HOTSPOT_INSET;
        let wall_x = room.half_width() - WALL_HOTSPOT_INSET;
        let wall_z = room.half_depth() - WALL_HOTSPOT_INSET;
        let candidates = [
            (corner_x, corner_z, 2.0),
            (-corner_x, corner_z, 2.0),
            (corner_x, -corner_z, 2.0),
            (-corner_x, -corner_z, 2.0),
            (wall_x, 0.0, 1.0),
            (-wall_x, 0.0, 1.0),
            (0.0, wall_z, 1.0),
            (0.0, -wall_z, 1.0),
        ];
        self.hotspots = candidates
            .into_iter()
            .map(|(x, z, weight)| Hotspot {
                position: Vec3::new(room.center.x + x, room.center.y, room.center.z + z),
                weight,
            })
            .filter(|hotspot| {
                self.doors.iter().all(|door| door.distance_xz(hotspot.position) >= DOOR_EXCLUSION)
            })
            .collect();
    }

    pub fn spot_is_free(&self, room: &Room, x: f32, z: f32, radius: f32) -> bool {
        let inset = WALL_BUFFER + radius;
        if !room.contains_xz(x, z, inset) {
            return false;
        }

        let near_x_wall =
            x - room.min_x() < CORNER_EXCLUSION + radius || room.max_x() - x < CORNER_EXCLUSION + radius;
        let near_z_wall =
            z - room.min_z() < CORNER_EXCLUSION + radius || room.max_z() - z < CORNER_EXCLUSION + radius;
        if near_x_wall && near_z_wall {
            return false;
        }

        let point = Vec3::new(x, room.center.y, z);
        if self.doors.iter().any(|door| door.distance_xz(point) < DOOR_EXCLUSION + radius) {
            return false;
        }
        if self.player_spawn.is_some_and(|spawn| spawn.distance_xz(point) < SPAWN_EXCLUSION + radius)
        {
            return false;
        }
        self.occupancy.is_free(x, z, radius)
    }

    /// Room-wide rejection sampling; `None` once the attempt budget is spent.
    pub fn find_free_spot(&mut self, room: &Room, radius: f32, attempts: usize) -> Option<Vec3> {
        let inset = WALL_BUFFER + radius;
        for _ in 0..attempts {
            let x = self.rng.float(room.min_x() + inset, room.max_x() - inset);
            let z = self.rng.float(room.min_z() + inset, room.max_z() - inset);
            if self.spot_is_free(room, x, z, radius) {
                return Some(Vec3::new(x, room.center.y, z));
            }
        }
        None
    }

    /// Samples within `spread` of `center`, still honouring every exclusion.
    pub fn find_spot_near(
        &mut self,
        room: &Room,
        center: Vec3,
        spread: f32,
        radius: f32,
        attempts: usize,
    ) -> Option<Vec3> {
        for _ in 0..attempts {
            let x = center.x + self.rng.float(-spread, spread);
            let z = center.z + self.rng.float(-spread, spread);
            if self.spot_is_free(room, x, z, radius) {
                return Some(Vec3::new(x, room.center.y, z));
            }
        }
        None
    }

    pub fn pick_hotspot(&mut self) -> Option<Hotspot> {
        if self.hotspots.is_empty() {
            return None;
        }
        let weights: Vec<f64> = self.hotspots.iter().map(|hotspot| hotspot.weight).collect();
        let index = self.rng.weighted_pick(&weights);
        self.hotspots.get(index).copied()
    }

    pub fn roll_loot(&mut self, profile: &PropProfile) -> Option<PropLoot> {
        if profile.loot_table.is_empty() || !self.rng.chance(profile.loot_chance) {
            return None;
        }
        let weights: Vec<f64> = profile.loot_table.iter().map(|entry| entry.weight).collect();
        let entry = profile.loot_table[self.rng.weighted_pick(&weights)];
        let amount = self.rng.int(i64::from(entry.min), i64::from(entry.max)) as u32;
        Some(PropLoot { kind: entry.kind, amount })
    }

    pub fn occupy(&mut self, position: Vec3, radius: f32) {
        self.occupancy.occupy(position, radius);
    }

    /// Builds and records one prop with rolled scale, yaw and health.
    pub fn emit(
        &mut self,
        room: &Room,
        profile: &PropProfile,
        prop_type: PropType,
        position: Vec3,
        scale: f32,
        loot: Option<PropLoot>,
    ) -> u32 {
        let id = self.props.len() as u32;
        let rotation = self.rng.float(0.0, TAU);
        self.props.push(Prop {
            id,
            prop_type,
            position,
            scale,
            rotation,
            health: profile.health * scale,
            loot,
            room_id: room.id,
        });
        id
    }

    pub fn placed(&self) -> &[Prop] {
        self.props
    }
}
