//! Public data models for generated levels: rooms, doors, spawns, props and objectives.

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

use crate::types::{Vec2, Vec3};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: u32,
    /// Floor-level centre (`y` is the floor height).
    pub center: Vec3,
    /// Extent along `x`.
    pub width: f32,
    /// Extent along `z`.
    pub depth: f32,
    pub height: f32,
    pub floor_color: u32,
    pub wall_color: u32,
}

impl Room {
    pub fn half_width(&self) -> f32 {
        self.width * 0.5
    }

    pub fn half_depth(&self) -> f32 {
        self.depth * 0.5
    }

    pub fn min_x(&self) -> f32 {
        self.center.x - self.half_width()
    }

    pub fn max_x(&self) -> f32 {
        self.center.x + self.half_width()
    }

    pub fn min_z(&self) -> f32 {
        self.center.z - self.half_depth()
    }

    pub fn max_z(&self) -> f32 {
        self.center.z + self.half_depth()
    }

    pub fn area(&self) -> f32 {
        self.width * self.depth
    }

    /// Positive `inset` shrinks the footprint, negative grows it.
    pub fn contains_xz(&self, x: f32, z: f32, inset: f32) -> bool {
        x >= self.min_x() + inset
            && x <= self.max_x() - inset
            && z >= self.min_z() + inset
            && z <= self.max_z() - inset
    }

    pub fn contains_point(&self, point: Vec3, inset: f32) -> bool {
        self.contains_xz(point.x, point.z, inset)
    }

    /// True when the footprints, each grown by `margin`, intersect.
    pub fn overlaps(&self, other: &Room, margin: f32) -> bool {
        let dx = (self.center.x - other.center.x).abs();
        let dz = (self.center.z - other.center.z).abs();
        dx < self.half_width() + other.half_width() + margin
            && dz < self.half_depth() + other.half_depth() + margin
    }

    pub fn to_local(&self, point: Vec3) -> Vec2 {
        Vec2 { x: point.x - self.center.x, z: point.z - self.center.z }
    }

    pub fn to_world(&self, local: Vec2) -> Vec3 {
        Vec3::new(self.center.x + local.x, self.center.y, self.center.z + local.z)
    }
}

/// Axis of travel through a door; the opening spans the other horizontal axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoorAxis {
    X,
    Z,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoorKind {
    Proximity,
    Locked,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Door {
    pub id: u32,
    pub center: Vec3,
    pub axis: DoorAxis,
    pub width: f32,
    pub height: f32,
    pub kind: DoorKind,
    pub key_id: Option<String>,
    pub proximity_radius: Option<f32>,
    /// Objectives that must all be complete before the door may ever open.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_objectives: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyType {
    Guard,
    Soldier,
    Officer,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    pub id: u32,
    pub enemy_type: EnemyType,
    pub position: Vec3,
    pub room_id: u32,
    /// Yaw in radians.
    pub facing: f32,
    pub health: f32,
    pub speed: f32,
    pub alert_radius: f32,
    /// Degrees.
    pub field_of_view: f32,
    /// Room-local patrol points.
    pub waypoints: Option<Vec<Vec2>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PickupCategory {
    Weapon,
    Ammo,
    Health,
    Armor,
    Key,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickupKind {
    Pistol,
    Rifle,
    Shotgun,
    PistolAmmo,
    RifleAmmo,
    ShotgunAmmo,
    Health,
    Armor,
    Key,
}

impl PickupKind {
    pub fn category(self) -> PickupCategory {
        match self {
            Self::Pistol | Self::Rifle | Self::Shotgun => PickupCategory::Weapon,
            Self::PistolAmmo | Self::RifleAmmo | Self::ShotgunAmmo => PickupCategory::Ammo,
            Self::Health => PickupCategory::Health,
            Self::Armor => PickupCategory::Armor,
            Self::Key => PickupCategory::Key,
        }
    }

    pub fn default_amount(self) -> u32 {
        match self {
            Self::Pistol | Self::Rifle | Self::Shotgun | Self::Key => 1,
            Self::PistolAmmo => 24,
            Self::RifleAmmo => 60,
            Self::ShotgunAmmo => 12,
            Self::Health | Self::Armor => 25,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PickupSpawn {
    pub id: u32,
    pub kind: PickupKind,
    pub position: Vec3,
    pub amount: u32,
    pub key_id: Option<String>,
    pub room_id: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Objective {
    pub id: String,
    pub title: String,
    pub trigger_id: Option<String>,
    /// Completed by the host (e.g. kill tracking) rather than a trigger volume.
    pub tracked_externally: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerEffect {
    pub complete_objective: Option<String>,
    pub end_mission: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    pub id: String,
    pub center: Vec3,
    pub half_extents: Vec3,
    pub on_enter: TriggerEffect,
    pub one_shot: bool,
    pub prerequisites: Vec<String>,
    pub is_exit: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropType {
    Crate,
    Box,
    Barrel,
    ExplosiveBarrel,
    WeaponCrate,
}

impl PropType {
    /// Floor radius claimed by one prop at unit scale.
    pub fn footprint_radius(self) -> f32 {
        match self {
            Self::Crate => 0.7,
            Self::Box => 0.4,
            Self::Barrel | Self::ExplosiveBarrel => 0.45,
            Self::WeaponCrate => 0.6,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropLoot {
    pub kind: PickupKind,
    pub amount: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Prop {
    pub id: u32,
    pub prop_type: PropType,
    pub position: Vec3,
    pub scale: f32,
    /// Yaw in radians.
    pub rotation: f32,
    pub health: f32,
    pub loot: Option<PropLoot>,
    pub room_id: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerSpawn {
    pub position: Vec3,
    pub facing: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub name: String,
    pub briefing: String,
    pub seed: Option<u32>,
    pub rooms: Vec<Room>,
    pub doors: Vec<Door>,
    pub player_spawn: Option<PlayerSpawn>,
    pub enemies: Vec<EnemySpawn>,
    pub pickups: Vec<PickupSpawn>,
    pub objectives: Vec<Objective>,
    pub triggers: Vec<Trigger>,
    pub props: Vec<Prop>,
}

impl Level {
    pub fn canonical_bytes(&self) -> Vec<u8> {
        serde_json::to_vec(self).unwrap_or_default()
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }

    pub fn room(&self, id: u32) -> Option<&Room> {
        self.rooms.iter().find(|room| room.id == id)
    }

    /// The room holding the player spawn, falling back to the first room.
    pub fn spawn_room(&self) -> Option<&Room> {
        self.player_spawn
            .and_then(|spawn| {
                self.rooms.iter().find(|room| room.contains_point(spawn.position, 0.0))
            })
            .or_else(|| self.rooms.first())
    }

    pub fn summary(&self) -> LevelSummary {
        LevelSummary {
            rooms: self.rooms.len(),
            doors: self.doors.len(),
            loop_doors: self.doors.len().saturating_sub(self.rooms.len().saturating_sub(1)),
            enemies: self.enemies.len(),
            pickups: self.pickups.len(),
            props: self.props.len(),
            objectives: self.objectives.len(),
            triggers: self.triggers.len(),
            fingerprint: self.fingerprint(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct LevelSummary {
    pub rooms: usize,
    pub doors: usize,
    /// Doors beyond what a spanning tree over the rooms needs.
    pub loop_doors: usize,
    pub enemies: usize,
    pub pickups: usize,
    pub props: usize,
    pub objectives: usize,
    pub triggers: usize,
    pub fingerprint: u64,
}
