//! Post-generation repair pass. Re-checks every level invariant, fixes what it
//! can in place and drops what it cannot. Never fails; findings go to the report.

use std::collections::{BTreeSet, VecDeque};

use serde::Serialize;
use tracing::{debug, warn};

use crate::mapgen::doors::{ADJACENCY_TOLERANCE, DoorGeometry, door_geometry, proximity_door};
use crate::mapgen::enemies::sample_in_room;
use crate::mapgen::layout::{ROOM_OVERLAP_MARGIN, ROOM_SPACING};
use crate::mapgen::model::{
    EnemySpawn, Level, PickupKind, PickupSpawn, PlayerSpawn, Prop, Room, Trigger, TriggerEffect,
};
use crate::mapgen::props::placement::{DOOR_EXCLUSION, SPAWN_EXCLUSION};
use crate::mapgen::props::same_column;
use crate::rng::LevelRng;
use crate::types::Vec3;

/// Entities must sit at least this far inside their room.
pub const BOUNDS_MARGIN: f32 = 0.5;
const PLACEMENT_MARGIN: f32 = 1.0;
const REPOSITION_ATTEMPTS: usize = 20;
const ROOM_PUSH_ATTEMPTS: usize = 4;
const DOOR_REACH: f32 = 1.0;
const ENEMY_CLEARANCE: f32 = 0.4;
const PICKUP_CLEARANCE: f32 = 1.0;
const SPAWN_FRONT_OFFSET: f32 = 2.0;
const SYNTHESIZED_TRIGGER_EXTENTS: Vec3 = Vec3 { x: 1.5, y: 1.5, z: 1.5 };

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub issues: Vec<String>,
    pub fixes: Vec<String>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty() && self.fixes.is_empty()
    }

    fn issue(&mut self, message: String) {
        warn!(%message, "level issue");
        self.issues.push(message);
    }

    fn fix(&mut self, message: String) {
        debug!(%message, "level fix");
        self.fixes.push(message);
    }
}

/// Rooms reachable from the spawn room when a door links every room whose
/// footprint (grown by a small reach) contains its centre.
pub fn door_proximity_reachability(level: &Level) -> BTreeSet<u32> {
    let Some(start) = level.spawn_room().map(|room| room.id) else {
        return BTreeSet::new();
    };
    let door_rooms: Vec<Vec<u32>> = level
        .doors
        .iter()
        .map(|door| {
            level
                .rooms
                .iter()
                .filter(|room| room.contains_point(door.center, -DOOR_REACH))
                .map(|room| room.id)
                .collect()
        })
        .collect();

    let mut seen = BTreeSet::from([start]);
    let mut open = VecDeque::from([start]);
    while let Some(room) = open.pop_front() {
        for linked in door_rooms.iter().filter(|rooms| rooms.contains(&room)) {
            for next in linked {
                if seen.insert(*next) {
                    open.push_back(*next);
                }
            }
        }
    }
    seen
}

pub struct LevelValidator {
    rng: LevelRng,
}

impl LevelValidator {
    pub fn new(rng: LevelRng) -> Self {
        Self { rng }
    }

    pub fn seeded(seed: u32) -> Self {
        Self::new(LevelRng::seeded(seed))
    }

    pub fn validate(&mut self, level: &mut Level) -> ValidationReport {
        let mut report = ValidationReport::default();
        separate_rooms(level, &mut report);
        remove_orphaned_doors(level, &mut report);
        ensure_player_spawn(level, &mut report);
        connect_rooms(level, &mut report);
        self.repair_enemies(level, &mut report);
        self.repair_pickups(level, &mut report);
        prune_props(level, &mut report);
        self.complete_objectives(level, &mut report);
        debug!(issues = report.issues.len(), fixes = report.fixes.len(), "validation complete");
        report
    }

    fn repair_enemies(&mut self, level: &mut Level, report: &mut ValidationReport) {
        let rooms = &level.rooms;
        let mut kept: Vec<EnemySpawn> = Vec::with_capacity(level.enemies.len());
        for mut enemy in level.enemies.drain(..) {
            let Some(room) = rooms.iter().find(|room| room.id == enemy.room_id) else {
                report.issue(format!("enemy {} belongs to missing room {}", enemy.id, enemy.room_id));
                report.fix(format!("removed enemy {}", enemy.id));
                continue;
            };
            if room.contains_point(enemy.position, BOUNDS_MARGIN) {
                kept.push(enemy);
                continue;
            }
            report.issue(format!("enemy {} lies outside room {}", enemy.id, room.id));
            let clear = |position: Vec3| {
                kept.iter()
                    .filter(|other| other.room_id == room.id)
                    .all(|other| other.position.distance_xz(position) >= ENEMY_CLEARANCE)
            };
            match reposition(room, &mut self.rng, clear) {
                Some(position) => {
                    enemy.position = position;
                    report.fix(format!("moved enemy {} back inside room {}", enemy.id, room.id));
                    kept.push(enemy);
                }
                None => report.fix(format!("removed enemy {}", enemy.id)),
            }
        }
        level.enemies = kept;
    }

    fn repair_pickups(&mut self, level: &mut Level, report: &mut ValidationReport) {
        let rooms = &level.rooms;
        let mut kept: Vec<PickupSpawn> = Vec::with_capacity(level.pickups.len());
        for mut pickup in level.pickups.drain(..) {
            let Some(room) = rooms.iter().find(|room| room.id == pickup.room_id) else {
                report
                    .issue(format!("pickup {} belongs to missing room {}", pickup.id, pickup.room_id));
                report.fix(format!("removed pickup {}", pickup.id));
                continue;
            };
            if room.contains_point(pickup.position, BOUNDS_MARGIN) {
                kept.push(pickup);
                continue;
            }
            report.issue(format!("pickup {} lies outside room {}", pickup.id, room.id));
            let clear = |position: Vec3| {
                kept.iter().all(|other| other.position.distance_xz(position) >= PICKUP_CLEARANCE)
            };
            let position = reposition(room, &mut self.rng, clear)
                .or_else(|| (pickup.kind == PickupKind::Key).then_some(room.center));
            match position {
                Some(position) => {
                    pickup.position = position;
                    report.fix(format!("moved pickup {} back inside room {}", pickup.id, room.id));
                    kept.push(pickup);
                }
                None => report.fix(format!("removed pickup {}", pickup.id)),
            }
        }
        level.pickups = kept;
    }

    fn complete_objectives(&mut self, level: &mut Level, report: &mut ValidationReport) {
        for index in 0..level.objectives.len() {
            let objective = &level.objectives[index];
            if objective.tracked_externally {
                continue;
            }
            let completed = level.triggers.iter().any(|trigger| {
                trigger.on_enter.complete_objective.as_deref() == Some(objective.id.as_str())
            });
            if completed {
                continue;
            }
            let objective_id = objective.id.clone();
            report.issue(format!("objective {objective_id} has no completing trigger"));
            let Some(room) = self.rng.pick(&level.rooms) else {
                continue;
            };

            let mut trigger_id = format!("trigger_{objective_id}");
            while level.triggers.iter().any(|trigger| trigger.id == trigger_id) {
                trigger_id.push('_');
            }
            let trigger = Trigger {
                id: trigger_id.clone(),
                center: Vec3::new(room.center.x, room.center.y + 1.0, room.center.z),
                half_extents: SYNTHESIZED_TRIGGER_EXTENTS,
                on_enter: TriggerEffect {
                    complete_objective: Some(objective_id.clone()),
                    end_mission: false,
                },
                one_shot: true,
                prerequisites: Vec::new(),
                is_exit: false,
            };
            report.fix(format!("added trigger {trigger_id} in room {} for {objective_id}", room.id));
            level.triggers.push(trigger);
            level.objectives[index].trigger_id = Some(trigger_id);
        }
    }
}

/// Up to [`REPOSITION_ATTEMPTS`] samples inside `room`; the first one `accept` approves wins.
fn reposition<F>(room: &Room, rng: &mut LevelRng, accept: F) -> Option<Vec3>
where
    F: Fn(Vec3) -> bool,
{
    (0..REPOSITION_ATTEMPTS)
        .map(|_| sample_in_room(room, PLACEMENT_MARGIN, rng))
        .find(|position| room.contains_point(*position, BOUNDS_MARGIN) && accept(*position))
}

/// Pushes each later room out of earlier ones along the axis needing the
/// shorter move. A room still overlapping after [`ROOM_PUSH_ATTEMPTS`] pushes is
/// parked past the east edge of every earlier room.
fn separate_rooms(level: &mut Level, report: &mut ValidationReport) {
    for later in 1..level.rooms.len() {
        for _ in 0..ROOM_PUSH_ATTEMPTS {
            let room = &level.rooms[later];
            let Some(anchor) = level.rooms[..later]
                .iter()
                .find(|earlier| room.overlaps(earlier, ROOM_OVERLAP_MARGIN))
                .cloned()
            else {
                break;
            };
            report.issue(format!("room {} overlaps room {}", room.id, anchor.id));
            let room_id = room.id;
            let delta = push_apart(room, &anchor);
            shift_room(level, later, delta, report);
            report.fix(format!(
                "moved room {room_id} by ({:.2}, {:.2}) away from room {}",
                delta.x, delta.z, anchor.id
            ));
        }

        let room = &level.rooms[later];
        let earlier = &level.rooms[..later];
        if earlier.iter().any(|other| room.overlaps(other, ROOM_OVERLAP_MARGIN)) {
            let east_edge = earlier.iter().map(Room::max_x).fold(f32::MIN, f32::max);
            let delta = Vec3::flat(east_edge + ROOM_SPACING - room.min_x(), 0.0);
            let room_id = room.id;
            shift_room(level, later, delta, report);
            report.fix(format!("moved room {room_id} past the east edge of earlier rooms"));
        }
    }
}

/// Smallest single-axis move that leaves `room` one wall gap clear of `anchor`.
fn push_apart(room: &Room, anchor: &Room) -> Vec3 {
    let dx = room.center.x - anchor.center.x;
    let dz = room.center.z - anchor.center.z;
    let push_x = room.half_width() + anchor.half_width() + ROOM_SPACING - dx.abs();
    let push_z = room.half_depth() + anchor.half_depth() + ROOM_SPACING - dz.abs();
    if push_x <= push_z {
        Vec3::flat(if dx < 0.0 { -push_x } else { push_x }, 0.0)
    } else {
        Vec3::flat(0.0, if dz < 0.0 { -push_z } else { push_z })
    }
}

/// Moves a room together with everything that lives in it. Doors on its walls
/// are re-cut against the room on their other side, or dropped when the two no
/// longer share a wall.
fn shift_room(level: &mut Level, index: usize, delta: Vec3, report: &mut ValidationReport) {
    let before = level.rooms[index].clone();
    let mut after = before.clone();
    let moved = |position: &mut Vec3| {
        position.x += delta.x;
        position.z += delta.z;
    };
    moved(&mut after.center);

    for enemy in level.enemies.iter_mut().filter(|enemy| enemy.room_id == before.id) {
        moved(&mut enemy.position);
    }
    for pickup in level.pickups.iter_mut().filter(|pickup| pickup.room_id == before.id) {
        moved(&mut pickup.position);
    }
    for prop in level.props.iter_mut().filter(|prop| prop.room_id == before.id) {
        moved(&mut prop.position);
    }
    for trigger in level.triggers.iter_mut() {
        if before.contains_point(trigger.center, 0.0) {
            moved(&mut trigger.center);
        }
    }
    if let Some(spawn) = level.player_spawn.as_mut()
        && before.contains_point(spawn.position, 0.0)
    {
        moved(&mut spawn.position);
    }

    let rooms = &level.rooms;
    let mut dropped = Vec::new();
    for door in level.doors.iter_mut() {
        if !before.contains_point(door.center, -ADJACENCY_TOLERANCE) {
            continue;
        }
        let partner = rooms.iter().find(|room| {
            room.id != before.id && room.contains_point(door.center, -ADJACENCY_TOLERANCE)
        });
        match partner.and_then(|partner| door_geometry(partner, &after)) {
            Some(geometry) => {
                door.center = geometry.center;
                door.axis = geometry.axis;
                door.width = geometry.width;
            }
            None => dropped.push(door.id),
        }
    }
    level.doors.retain(|door| !dropped.contains(&door.id));
    for door_id in dropped {
        report.fix(format!("removed door {door_id} left behind by room {}", before.id));
    }
    level.rooms[index] = after;
}

/// Doors must join two rooms; anything else is dropped.
fn remove_orphaned_doors(level: &mut Level, report: &mut ValidationReport) {
    let rooms = &level.rooms;
    level.doors.retain(|door| {
        let touching = rooms
            .iter()
            .filter(|room| room.contains_point(door.center, -ADJACENCY_TOLERANCE))
            .count();
        if touching < 2 {
            report.issue(format!("door {} touches {touching} rooms", door.id));
            report.fix(format!("removed door {}", door.id));
        }
        touching >= 2
    });
}

/// Drops props outside their room, props whose footprint hits an earlier one
/// and props left in a doorway or on the player spawn.
fn prune_props(level: &mut Level, report: &mut ValidationReport) {
    let rooms = &level.rooms;
    let doors = &level.doors;
    let spawn = level.player_spawn;
    let mut kept: Vec<Prop> = Vec::with_capacity(level.props.len());
    for prop in level.props.drain(..) {
        let in_bounds = rooms
            .iter()
            .find(|room| room.id == prop.room_id)
            .is_some_and(|room| room.contains_point(prop.position, BOUNDS_MARGIN));
        if !in_bounds {
            report.issue(format!("prop {} lies outside room {}", prop.id, prop.room_id));
            report.fix(format!("removed prop {}", prop.id));
            continue;
        }
        let radius = prop.prop_type.footprint_radius() * prop.scale;
        let overlapping = kept.iter().find(|other| {
            !same_column(other, &prop)
                && other.position.distance_xz(prop.position)
                    < radius + other.prop_type.footprint_radius() * other.scale - 1e-3
        });
        if let Some(other) = overlapping {
            report.issue(format!("prop {} overlaps prop {}", prop.id, other.id));
            report.fix(format!("removed prop {}", prop.id));
            continue;
        }
        let blocked = doors
            .iter()
            .find(|door| door.center.distance_xz(prop.position) < DOOR_EXCLUSION + radius - 1e-3);
        if let Some(door) = blocked {
            report.issue(format!("prop {} blocks door {}", prop.id, door.id));
            report.fix(format!("removed prop {}", prop.id));
            continue;
        }
        if let Some(spawn) = spawn
            && spawn.position.distance_xz(prop.position) < SPAWN_EXCLUSION + radius - 1e-3
        {
            report.issue(format!("prop {} crowds the player spawn", prop.id));
            report.fix(format!("removed prop {}", prop.id));
            continue;
        }
        kept.push(prop);
    }
    level.props = kept;
}

fn ensure_player_spawn(level: &mut Level, report: &mut ValidationReport) {
    if level.player_spawn.is_some() {
        return;
    }
    report.issue("level has no player spawn".to_owned());
    let Some(room) = level.rooms.first() else {
        return;
    };
    level.player_spawn = Some(PlayerSpawn {
        position: Vec3::new(room.center.x, room.center.y, room.min_z() + SPAWN_FRONT_OFFSET),
        facing: 0.0,
    });
    report.fix(format!("placed player spawn in room {}", room.id));
}

/// Links every unreached room to its nearest reached neighbour with a new door,
/// first sliding it flush against that neighbour when the two share no wall.
fn connect_rooms(level: &mut Level, report: &mut ValidationReport) {
    let mut stranded = BTreeSet::new();
    for _ in 0..level.rooms.len() {
        let reached = door_proximity_reachability(level);
        if reached.is_empty() {
            return;
        }
        let Some(room) = level
            .rooms
            .iter()
            .find(|room| !reached.contains(&room.id) && !stranded.contains(&room.id))
            .cloned()
        else {
            return;
        };
        report.issue(format!("room {} is unreachable from the spawn room", room.id));

        let mut neighbours: Vec<&Room> =
            level.rooms.iter().filter(|other| reached.contains(&other.id)).collect();
        neighbours.sort_by(|a, b| {
            a.center.distance_xz(room.center).total_cmp(&b.center.distance_xz(room.center))
        });
        let link = neighbours
            .iter()
            .find_map(|other| {
                door_geometry(other, &room).map(|geometry| (other.id, Vec3::ZERO, geometry))
            })
            .or_else(|| {
                neighbours.iter().find_map(|other| {
                    flush_against(&level.rooms, other, &room)
                        .map(|(delta, geometry)| (other.id, delta, geometry))
                })
            });
        let Some((neighbour_id, delta, geometry)) = link else {
            debug!(room = room.id, "no spot next to a reachable room; left unconnected");
            stranded.insert(room.id);
            continue;
        };

        if delta != Vec3::ZERO
            && let Some(index) = level.rooms.iter().position(|other| other.id == room.id)
        {
            shift_room(level, index, delta, report);
            report.fix(format!("moved room {} flush against room {neighbour_id}", room.id));
        }
        let door_id = level.doors.iter().map(|door| door.id + 1).max().unwrap_or(0);
        level.doors.push(proximity_door(door_id, geometry));
        report.fix(format!("added door {door_id} between rooms {neighbour_id} and {}", room.id));
    }
}

/// Offset that puts `room` one wall gap from a side of `anchor`, clear of every
/// other room and with a door span. The side `room` already faces is tried first.
fn flush_against(rooms: &[Room], anchor: &Room, room: &Room) -> Option<(Vec3, DoorGeometry)> {
    let dx = room.center.x - anchor.center.x;
    let dz = room.center.z - anchor.center.z;
    let reach_x = anchor.half_width() + room.half_width() + ROOM_SPACING;
    let reach_z = anchor.half_depth() + room.half_depth() + ROOM_SPACING;
    let side = |offset: f32| if offset < 0.0 { -1.0_f32 } else { 1.0 };

    let x_spots = [side(dx), -side(dx)].map(|sign| anchor.center.x + sign * reach_x);
    let z_spots = [side(dz), -side(dz)].map(|sign| anchor.center.z + sign * reach_z);
    let beside = x_spots.iter().flat_map(|&x| [(x, room.center.z), (x, anchor.center.z)]);
    let above = z_spots.iter().flat_map(|&z| [(room.center.x, z), (anchor.center.x, z)]);
    let spots: Vec<(f32, f32)> = if dx.abs() >= dz.abs() {
        beside.chain(above).collect()
    } else {
        above.chain(beside).collect()
    };

    spots.into_iter().find_map(|(x, z)| {
        let mut candidate = room.clone();
        candidate.center.x = x;
        candidate.center.z = z;
        let clear = rooms
            .iter()
            .filter(|other| other.id != room.id)
            .all(|other| !candidate.overlaps(other, ROOM_OVERLAP_MARGIN));
        if !clear {
            return None;
        }
        let geometry = door_geometry(anchor, &candidate)?;
        Some((Vec3::flat(x - room.center.x, z - room.center.z), geometry))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::audit_level;
    use crate::mapgen::model::{Door, DoorAxis, DoorKind, EnemyType, Objective, PropType};

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

    fn door(id: u32, x: f32, z: f32) -> Door {
        Door {
            id,
            center: Vec3::new(x, 1.5, z),
            axis: DoorAxis::X,
            width: 2.0,
            height: 3.0,
            kind: DoorKind::Proximity,
            key_id: None,
            proximity_radius: Some(3.0),
            required_objectives: Vec::new(),
        }
    }

    fn enemy(id: u32, room_id: u32, x: f32, z: f32) -> EnemySpawn {
        EnemySpawn {
            id,
            enemy_type: EnemyType::Guard,
            position: Vec3::flat(x, z),
            room_id,
            facing: 0.0,
            health: 60.0,
            speed: 2.5,
            alert_radius: 10.0,
            field_of_view: 90.0,
            waypoints: None,
        }
    }

    fn prop(id: u32, room_id: u32, x: f32, z: f32) -> Prop {
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

    /// Three rooms in a row joined by two doors.
    fn level() -> Level {
        Level {
            name: "Operation Test".to_owned(),
            briefing: String::new(),
            seed: Some(1),
            rooms: vec![room(0, 0.0, 0.0), room(1, 10.4, 0.0), room(2, 20.8, 0.0)],
            doors: vec![door(0, 5.2, 0.0), door(1, 15.6, 0.0)],
            player_spawn: Some(PlayerSpawn { position: Vec3::flat(0.0, -3.0), facing: 0.0 }),
            enemies: vec![enemy(0, 1, 10.4, 1.0)],
            pickups: Vec::new(),
            objectives: vec![Objective {
                id: "eliminate_hostiles".to_owned(),
                title: "Eliminate all hostiles".to_owned(),
                trigger_id: None,
                tracked_externally: true,
            }],
            triggers: Vec::new(),
            props: vec![prop(0, 2, 20.8, 2.0)],
        }
    }

    #[test]
    fn valid_level_passes_untouched() {
        let mut level = level();
        let before = level.clone();
        let report = LevelValidator::seeded(1).validate(&mut level);
        assert!(report.is_clean(), "{report:?}");
        assert_eq!(level, before);
    }

    #[test]
    fn out_of_bounds_enemy_is_moved_back_inside() {
        let mut level = level();
        level.enemies[0].position = Vec3::flat(40.0, 0.0);
        let report = LevelValidator::seeded(2).validate(&mut level);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(level.enemies.len(), 1);
        assert!(level.rooms[1].contains_point(level.enemies[0].position, BOUNDS_MARGIN));
    }

    #[test]
    fn enemy_in_missing_room_is_removed() {
        let mut level = level();
        level.enemies[0].room_id = 9;
        let report = LevelValidator::seeded(3).validate(&mut level);
        assert!(level.enemies.is_empty());
        assert_eq!(report.fixes, ["removed enemy 0"]);
    }

    #[test]
    fn orphaned_door_is_removed_and_connectivity_restored() {
        let mut level = level();
        level.doors[1].center = Vec3::new(100.0, 1.5, 100.0);
        let report = LevelValidator::seeded(4).validate(&mut level);
        assert!(report.fixes.iter().any(|fix| fix == "removed door 1"));
        assert!(report.fixes.iter().any(|fix| fix.starts_with("added door 1 between rooms 1 and 2")));
        assert_eq!(door_proximity_reachability(&level).len(), 3);
    }

    #[test]
    fn overlapping_rooms_are_pushed_apart_with_their_contents() {
        let mut level = level();
        level.rooms[2].center = Vec3::flat(14.0, 0.0);
        level.props[0].position = Vec3::flat(14.0, 2.0);
        let report = LevelValidator::seeded(5).validate(&mut level);
        assert!(report.issues.iter().any(|issue| issue == "room 2 overlaps room 1"));
        let pushed = &level.rooms[2];
        assert!(!pushed.overlaps(&level.rooms[1], ROOM_OVERLAP_MARGIN));
        assert!(pushed.contains_point(level.props[0].position, BOUNDS_MARGIN));
        assert!(pushed.contains_point(level.doors[1].center, -ADJACENCY_TOLERANCE));
        assert_eq!(audit_level(&level), Vec::<String>::new());
    }

    /// Rooms with no doors yet; the spawn sits at the front of room 0.
    fn bare_level(rooms: Vec<Room>, doors: Vec<Door>) -> Level {
        let spawn = Vec3::flat(rooms[0].center.x, rooms[0].min_z() + SPAWN_FRONT_OFFSET);
        Level {
            name: "Operation Test".to_owned(),
            briefing: String::new(),
            seed: Some(1),
            rooms,
            doors,
            player_spawn: Some(PlayerSpawn { position: spawn, facing: 0.0 }),
            enemies: Vec::new(),
            pickups: Vec::new(),
            objectives: Vec::new(),
            triggers: Vec::new(),
            props: Vec::new(),
        }
    }

    #[test]
    fn room_pushed_between_two_neighbours_ends_clear_of_both() {
        let mut level =
            bare_level(vec![room(0, -2.0, 0.0), room(1, 12.0, 0.0), room(2, 9.5, 0.0)], Vec::new());
        let mut validator = LevelValidator::seeded(10);
        let first = validator.validate(&mut level);
        assert!(first.issues.iter().any(|issue| issue == "room 2 overlaps room 1"));

        for (index, a) in level.rooms.iter().enumerate() {
            for b in &level.rooms[(index + 1)..] {
                assert!(!a.overlaps(b, ROOM_OVERLAP_MARGIN), "rooms {} and {}", a.id, b.id);
            }
        }
        assert_eq!(audit_level(&level), Vec::<String>::new());
        let second = validator.validate(&mut level);
        assert!(second.is_clean(), "{second:?}");
    }

    #[test]
    fn detached_room_is_slid_against_its_nearest_reached_room() {
        let mut level = bare_level(
            vec![room(0, 0.0, 0.0), room(1, 10.4, 0.0), room(2, 10.4, 12.0)],
            vec![door(0, 5.2, 0.0)],
        );
        let report = LevelValidator::seeded(11).validate(&mut level);
        assert_eq!(report.issues, ["room 2 is unreachable from the spawn room"]);
        assert!(report.fixes.iter().any(|fix| fix == "moved room 2 flush against room 1"));
        assert!(report.fixes.iter().any(|fix| fix == "added door 1 between rooms 1 and 2"));
        assert_eq!(level.rooms[2].center, Vec3::flat(10.4, 10.4));
        assert_eq!(door_proximity_reachability(&level).len(), 3);
        assert_eq!(audit_level(&level), Vec::<String>::new());
    }

    #[test]
    fn room_with_no_free_side_stays_unreached() {
        let mut tiny = room(1, 30.0, 0.0);
        tiny.width = 3.0;
        tiny.depth = 3.0;
        let mut level = bare_level(vec![room(0, 0.0, 0.0), tiny], Vec::new());
        let report = LevelValidator::seeded(12).validate(&mut level);
        assert_eq!(report.issues, ["room 1 is unreachable from the spawn room"]);
        assert!(report.fixes.is_empty());
        assert_eq!(level.rooms[1].center, Vec3::flat(30.0, 0.0));
    }

    #[test]
    fn overlapping_props_keep_the_first_and_stacks_survive() {
        let mut level = level();
        let mut stacked = prop(1, 2, 20.8, 2.0);
        stacked.position.y = 1.0;
        level.props.push(stacked);
        level.props.push(prop(2, 2, 21.2, 2.0));
        let report = LevelValidator::seeded(6).validate(&mut level);
        assert_eq!(report.fixes, ["removed prop 2"]);
        assert_eq!(level.props.len(), 2);
    }

    #[test]
    fn objective_without_trigger_gets_one() {
        let mut level = level();
        level.objectives.push(Objective {
            id: "recover_intel".to_owned(),
            title: "Recover the intel".to_owned(),
            trigger_id: None,
            tracked_externally: false,
        });
        LevelValidator::seeded(7).validate(&mut level);
        let trigger = level
            .triggers
            .iter()
            .find(|trigger| trigger.on_enter.complete_objective.as_deref() == Some("recover_intel"))
            .expect("synthesized trigger");
        assert_eq!(level.objectives[1].trigger_id.as_deref(), Some(trigger.id.as_str()));
    }

    #[test]
    fn missing_spawn_lands_at_the_front_of_the_first_room() {
        let mut level = level();
        level.player_spawn = None;
        LevelValidator::seeded(8).validate(&mut level);
        let spawn = level.player_spawn.expect("spawn");
        assert_eq!(spawn.position, Vec3::flat(0.0, -3.0));
    }

    #[test]
    fn second_pass_finds_nothing() {
        let mut level = level();
        level.enemies[0].position = Vec3::flat(-30.0, 0.0);
        level.doors[0].center = Vec3::new(0.0, 1.5, 50.0);
        level.player_spawn = None;
        level.props.push(prop(1, 7, 0.0, 0.0));
        let mut validator = LevelValidator::seeded(9);
        assert!(!validator.validate(&mut level).is_clean());
        let second = validator.validate(&mut level);
        assert!(second.is_clean(), "{second:?}");
    }
}
