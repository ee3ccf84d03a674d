//! Pickup placement: spawn-room supplies, keys for locked doors, then weighted loot.

use std::collections::BTreeSet;

use tracing::debug;

use crate::rng::LevelRng;
use crate::types::Vec3;

use super::enemies::sample_in_room;
use super::graph::RoomGraph;
use super::model::{Door, DoorKind, PickupKind, PickupSpawn, Prop, Room};

pub(crate) const PICKUP_WALL_MARGIN: f32 = 1.0;
const PICKUP_SPACING: f32 = 1.5;
const PLACEMENT_ATTEMPTS: usize = 10;
const SAME_ROOM_KEY_CHANCE: f64 = 0.5;
const SUPPLY_ROW_INSET: f32 = 1.5;
const SUPPLY_ROW_STEP: f32 = 1.5;
/// Free floor kept between a pickup and the edge of a prop footprint.
const PROP_CLEARANCE: f32 = 0.3;

const SPAWN_SUPPLIES: [PickupKind; 5] = [
    PickupKind::PistolAmmo,
    PickupKind::RifleAmmo,
    PickupKind::ShotgunAmmo,
    PickupKind::Health,
    PickupKind::Armor,
];

const AMMO_KINDS: [PickupKind; 3] =
    [PickupKind::PistolAmmo, PickupKind::RifleAmmo, PickupKind::ShotgunAmmo];
const AMMO_WEIGHTS: [f64; 3] = [0.5, 0.3, 0.2];

/// How many of one pickup a level of `rooms` rooms asks for, and how likely each one spawns.
struct DistributionRule {
    kind: PickupKind,
    count: fn(usize) -> usize,
    spawn_chance: f64,
}

const DISTRIBUTION: [DistributionRule; 6] = [
    DistributionRule { kind: PickupKind::Pistol, count: pistol_count, spawn_chance: 0.8 },
    DistributionRule { kind: PickupKind::Rifle, count: per_three_rooms, spawn_chance: 0.6 },
    DistributionRule { kind: PickupKind::Shotgun, count: shotgun_count, spawn_chance: 0.5 },
    // Ammo kind is re-rolled per spawn.
    DistributionRule { kind: PickupKind::PistolAmmo, count: per_room, spawn_chance: 0.7 },
    DistributionRule { kind: PickupKind::Health, count: health_count, spawn_chance: 0.6 },
    DistributionRule { kind: PickupKind::Armor, count: per_three_rooms, spawn_chance: 0.4 },
];

fn pistol_count(rooms: usize) -> usize {
    1 + rooms / 4
}

fn shotgun_count(rooms: usize) -> usize {
    if rooms >= 3 { 1 + rooms / 5 } else { 0 }
}

fn per_room(rooms: usize) -> usize {
    rooms
}

fn per_three_rooms(rooms: usize) -> usize {
    rooms / 3
}

fn health_count(rooms: usize) -> usize {
    rooms / 2 + 1
}

pub fn generate_pickups(
    rooms: &[Room],
    doors: &[Door],
    graph: &RoomGraph,
    props: &[Prop],
    rng: &mut LevelRng,
) -> Vec<PickupSpawn> {
    let mut pickups = Vec::new();
    let Some(spawn_room) = rooms.first() else {
        return pickups;
    };

    place_spawn_supplies(spawn_room, props, &mut pickups);
    place_keys(rooms, doors, graph, spawn_room.id, props, rng, &mut pickups);

    let loot_rooms: Vec<&Room> = rooms.iter().filter(|room| room.id != spawn_room.id).collect();
    if loot_rooms.is_empty() {
        return pickups;
    }

    for rule in &DISTRIBUTION {
        for _ in 0..(rule.count)(rooms.len()) {
            if !rng.chance(rule.spawn_chance) {
                continue;
            }
            let kind = if rule.kind == PickupKind::PistolAmmo {
                AMMO_KINDS[rng.weighted_pick(&AMMO_WEIGHTS)]
            } else {
                rule.kind
            };
            let Some(room) = rng.pick(&loot_rooms).copied() else {
                continue;
            };
            match find_pickup_spot(room, &pickups, props, rng) {
                Some(position) => {
                    let id = pickups.len() as u32;
                    pickups.push(PickupSpawn {
                        id,
                        kind,
                        position,
                        amount: kind.default_amount(),
                        key_id: None,
                        room_id: room.id,
                    });
                }
                None => debug!(room = room.id, ?kind, "no spaced spot for pickup; dropped"),
            }
        }
    }

    pickups
}

/// A row along the back wall of the spawn room, placed whatever the other rules say.
/// A slot covered by a prop slides toward the front wall until it is clear.
fn place_spawn_supplies(spawn_room: &Room, props: &[Prop], pickups: &mut Vec<PickupSpawn>) {
    let back_z = spawn_room.max_z() - SUPPLY_ROW_INSET;
    let front_z = spawn_room.min_z() + PICKUP_WALL_MARGIN;
    let first_x = spawn_room.center.x - SUPPLY_ROW_STEP * (SPAWN_SUPPLIES.len() as f32 - 1.0) * 0.5;
    for (slot, kind) in SPAWN_SUPPLIES.iter().enumerate() {
        let x = first_x + SUPPLY_ROW_STEP * slot as f32;
        let z = (0..)
            .map(|step| back_z - SUPPLY_ROW_STEP * step as f32)
            .take_while(|z| *z >= front_z)
            .find(|z| clear_of_props(Vec3::flat(x, *z), props))
            .unwrap_or(back_z);
        let id = pickups.len() as u32;
        pickups.push(PickupSpawn {
            id,
            kind: *kind,
            position: Vec3::new(x, spawn_room.center.y, z),
            amount: kind.default_amount(),
            key_id: None,
            room_id: spawn_room.id,
        });
    }
}

/// One key per locked door that names a key. Keys only land in rooms the
/// player can reach from spawn without passing that door.
fn place_keys(
    rooms: &[Room],
    doors: &[Door],
    graph: &RoomGraph,
    spawn_room_id: u32,
    props: &[Prop],
    rng: &mut LevelRng,
    pickups: &mut Vec<PickupSpawn>,
) {
    for door in doors.iter().filter(|door| door.kind == DoorKind::Locked) {
        let Some(key_id) = door.key_id.clone() else {
            continue;
        };
        let reachable = graph.reachable_without_door(spawn_room_id, door.id);
        let linked: BTreeSet<u32> = graph
            .links_for_door(door.id)
            .flat_map(|link| [link.room_a, link.room_b])
            .collect();

        let chosen = if rng.chance(SAME_ROOM_KEY_CHANCE) {
            linked
                .iter()
                .find(|room| reachable.contains(*room))
                .copied()
                .or_else(|| linked.first().copied())
        } else {
            let elsewhere: Vec<u32> =
                reachable.iter().copied().filter(|room| !linked.contains(room)).collect();
            rng.pick(&elsewhere).copied()
        };
        let room_id = chosen.unwrap_or(spawn_room_id);

        let Some(room) = rooms.iter().find(|room| room.id == room_id) else {
            continue;
        };
        let position = find_pickup_spot(room, pickups, props, rng).unwrap_or(room.center);
        let id = pickups.len() as u32;
        pickups.push(PickupSpawn {
            id,
            kind: PickupKind::Key,
            position,
            amount: 1,
            key_id: Some(key_id),
            room_id: room.id,
        });
    }
}

fn clear_of_props(position: Vec3, props: &[Prop]) -> bool {
    props.iter().all(|prop| {
        prop.position.distance_xz(position)
            >= prop.prop_type.footprint_radius() * prop.scale + PROP_CLEARANCE
    })
}

fn find_pickup_spot(
    room: &Room,
    pickups: &[PickupSpawn],
    props: &[Prop],
    rng: &mut LevelRng,
) -> Option<Vec3> {
    for _ in 0..PLACEMENT_ATTEMPTS {
        let position = sample_in_room(room, PICKUP_WALL_MARGIN, rng);
        let spaced =
            pickups.iter().all(|pickup| pickup.position.distance_xz(position) >= PICKUP_SPACING);
        if spaced && clear_of_props(position, props) {
            return Some(position);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapgen::graph::DoorLink;
    use crate::mapgen::model::{DoorAxis, PickupCategory, PropType};

    fn room(id: u32, x: f32, z: f32) -> Room {
        Room {
            id,
            center: Vec3::flat(x, z),
            width: 10.0,
            depth: 10.0,
            height: 4.0,
            floor_color: 0,
            wall_color: 0,
        }
    }

    fn door(id: u32, x: f32, kind: DoorKind) -> Door {
        Door {
            id,
            center: Vec3::new(x, 1.5, 0.0),
            axis: DoorAxis::X,
            width: 2.0,
            height: 3.0,
            kind,
            key_id: (kind == DoorKind::Locked).then(|| format!("key_{id}")),
            proximity_radius: None,
            required_objectives: Vec::new(),
        }
    }

    /// Four rooms in a row; the door between rooms 1 and 2 is locked.
    fn corridor() -> (Vec<Room>, Vec<Door>, RoomGraph) {
        let rooms =
            vec![room(0, 0.0, 0.0), room(1, 10.4, 0.0), room(2, 20.8, 0.0), room(3, 31.2, 0.0)];
        let doors = vec![
            door(0, 5.2, DoorKind::Proximity),
            door(1, 15.6, DoorKind::Locked),
            door(2, 26.0, DoorKind::Proximity),
        ];
        let links = vec![
            DoorLink { door_id: 0, room_a: 0, room_b: 1 },
            DoorLink { door_id: 1, room_a: 1, room_b: 2 },
            DoorLink { door_id: 2, room_a: 2, room_b: 3 },
        ];
        let graph = RoomGraph::build(links, &doors);
        (rooms, doors, graph)
    }

    #[test]
    fn spawn_room_always_gets_the_supply_set() {
        let (rooms, doors, graph) = corridor();
        let mut rng = LevelRng::seeded(1);
        let pickups = generate_pickups(&rooms, &doors, &graph, &[], &mut rng);
        let supplies: Vec<PickupKind> = pickups
            .iter()
            .filter(|pickup| pickup.room_id == 0 && pickup.kind != PickupKind::Key)
            .map(|pickup| pickup.kind)
            .collect();
        for kind in SPAWN_SUPPLIES {
            assert!(supplies.contains(&kind), "spawn room missing {kind:?}");
        }
    }

    #[test]
    fn keys_land_on_the_spawn_side_of_their_door() {
        for seed in 0..40_u32 {
            let (rooms, doors, graph) = corridor();
            let mut rng = LevelRng::seeded(seed);
            let pickups = generate_pickups(&rooms, &doors, &graph, &[], &mut rng);
            let keys: Vec<&PickupSpawn> =
                pickups.iter().filter(|pickup| pickup.kind == PickupKind::Key).collect();
            assert_eq!(keys.len(), 1);
            assert_eq!(keys[0].key_id.as_deref(), Some("key_1"));
            assert!(
                keys[0].room_id <= 1,
                "seed={seed}: key placed behind its own door in room {}",
                keys[0].room_id
            );
        }
    }

    #[test]
    fn loot_pickups_respect_spacing_and_bounds() {
        let (rooms, doors, graph) = corridor();
        let mut rng = LevelRng::seeded(77);
        let pickups = generate_pickups(&rooms, &doors, &graph, &[], &mut rng);
        for (index, pickup) in pickups.iter().enumerate() {
            let room = &rooms[pickup.room_id as usize];
            assert!(room.contains_point(pickup.position, PICKUP_WALL_MARGIN - 1e-3));
            for other in &pickups[(index + 1)..] {
                assert!(pickup.position.distance_xz(other.position) >= PICKUP_SPACING - 1e-3);
            }
        }
        assert!(
            pickups
                .iter()
                .any(|pickup| pickup.room_id != 0 && pickup.kind.category() != PickupCategory::Key)
        );
    }

    fn crate_at(id: u32, room_id: u32, x: f32, z: f32) -> Prop {
        Prop {
            id,
            prop_type: PropType::Crate,
            position: Vec3::flat(x, z),
            scale: 1.0,
            rotation: 0.0,
            health: 80.0,
            loot: None,
            room_id,
        }
    }

    #[test]
    fn supplies_slide_off_a_crate_on_the_back_row() {
        let (rooms, doors, graph) = corridor();
        let props = vec![crate_at(0, 0, 0.0, 3.5)];
        let mut rng = LevelRng::seeded(3);
        let pickups = generate_pickups(&rooms, &doors, &graph, &props, &mut rng);
        let middle = pickups.iter().find(|pickup| pickup.kind == SPAWN_SUPPLIES[2]).expect("slot");
        assert_eq!(middle.position, Vec3::flat(0.0, 2.0));
        let corner = pickups.iter().find(|pickup| pickup.kind == SPAWN_SUPPLIES[0]).expect("slot");
        assert_eq!(corner.position, Vec3::flat(-3.0, 3.5));
    }

    #[test]
    fn loot_keeps_clear_of_prop_footprints() {
        let (rooms, doors, graph) = corridor();
        let mut props = Vec::new();
        for room in &rooms[1..] {
            for (dx, dz) in [(-2.0, -2.0), (2.0, -2.0), (-2.0, 2.0), (2.0, 2.0), (0.0, 0.0)] {
                let id = props.len() as u32;
                props.push(crate_at(id, room.id, room.center.x + dx, room.center.z + dz));
            }
        }
        for seed in [5_u32, 50, 500, 5_000] {
            let mut rng = LevelRng::seeded(seed);
            let pickups = generate_pickups(&rooms, &doors, &graph, &props, &mut rng);
            for pickup in pickups.iter().filter(|pickup| pickup.kind != PickupKind::Key) {
                assert!(clear_of_props(pickup.position, &props), "seed={seed}: {pickup:?}");
            }
        }
    }

    #[test]
    fn single_room_level_only_gets_spawn_supplies() {
        let rooms = vec![room(0, 0.0, 0.0)];
        let graph = RoomGraph::build(Vec::new(), &[]);
        let mut rng = LevelRng::seeded(5);
        let pickups = generate_pickups(&rooms, &[], &graph, &[], &mut rng);
        assert_eq!(pickups.len(), SPAWN_SUPPLIES.len());
    }

    #[test]
    fn shotguns_need_at_least_three_rooms() {
        let shotgun_rule =
            DISTRIBUTION.iter().find(|rule| rule.kind == PickupKind::Shotgun).expect("rule");
        assert_eq!((shotgun_rule.count)(2), 0);
        assert!((shotgun_rule.count)(3) >= 1);
    }
}
