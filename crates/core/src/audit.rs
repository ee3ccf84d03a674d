//! Read-only invariant checks over a finished level. An empty result means the
//! level is structurally sound.

use std::collections::{BTreeSet, VecDeque};

use crate::mapgen::doors::ADJACENCY_TOLERANCE;
use crate::mapgen::layout::ROOM_OVERLAP_MARGIN;
use crate::mapgen::model::{DoorKind, Level, PickupKind};
use crate::mapgen::props::placement::{DOOR_EXCLUSION, SPAWN_EXCLUSION};
use crate::mapgen::props::same_column;
use crate::validator::{BOUNDS_MARGIN, door_proximity_reachability};

const EPSILON: f32 = 1e-3;

pub fn audit_level(level: &Level) -> Vec<String> {
    let mut findings = Vec::new();
    audit_rooms(level, &mut findings);
    audit_doors(level, &mut findings);
    audit_entities(level, &mut findings);
    audit_props(level, &mut findings);
    audit_objectives(level, &mut findings);
    audit_keys(level, &mut findings);
    findings
}

fn audit_rooms(level: &Level, findings: &mut Vec<String>) {
    for (index, a) in level.rooms.iter().enumerate() {
        for b in &level.rooms[(index + 1)..] {
            if a.overlaps(b, ROOM_OVERLAP_MARGIN) {
                findings.push(format!("rooms {} and {} overlap", a.id, b.id));
            }
        }
    }

    match level.player_spawn {
        Some(spawn) if level.rooms.iter().any(|room| room.contains_point(spawn.position, 0.0)) => {}
        Some(_) => findings.push("player spawn is outside every room".to_owned()),
        None if level.rooms.is_empty() => {}
        None => findings.push("player spawn is missing".to_owned()),
    }

    let reached = door_proximity_reachability(level);
    for room in level.rooms.iter().filter(|room| !reached.contains(&room.id)) {
        findings.push(format!("room {} is unreachable", room.id));
    }
}

fn audit_doors(level: &Level, findings: &mut Vec<String>) {
    for door in &level.doors {
        let touching = level
            .rooms
            .iter()
            .filter(|room| room.contains_point(door.center, -ADJACENCY_TOLERANCE))
            .count();
        if touching < 2 {
            findings.push(format!("door {} touches {touching} rooms", door.id));
        }
        if door.kind == DoorKind::Locked && door.key_id.is_none() {
            findings.push(format!("locked door {} names no key", door.id));
        }
    }
}

fn audit_entities(level: &Level, findings: &mut Vec<String>) {
    for enemy in &level.enemies {
        let inside = level
            .room(enemy.room_id)
            .is_some_and(|room| room.contains_point(enemy.position, BOUNDS_MARGIN));
        if !inside {
            findings.push(format!("enemy {} is outside room {}", enemy.id, enemy.room_id));
        }
    }
    for pickup in &level.pickups {
        let inside = level
            .room(pickup.room_id)
            .is_some_and(|room| room.contains_point(pickup.position, BOUNDS_MARGIN));
        if !inside {
            findings.push(format!("pickup {} is outside room {}", pickup.id, pickup.room_id));
        }
    }
}

fn audit_props(level: &Level, findings: &mut Vec<String>) {
    for (index, prop) in level.props.iter().enumerate() {
        let radius = prop.prop_type.footprint_radius() * prop.scale;
        let inside = level
            .room(prop.room_id)
            .is_some_and(|room| room.contains_point(prop.position, BOUNDS_MARGIN));
        if !inside {
            findings.push(format!("prop {} is outside room {}", prop.id, prop.room_id));
        }
        if let Some(room) = level.room(prop.room_id)
            && prop.position.y >= room.height
        {
            findings.push(format!("prop {} sits above the ceiling of room {}", prop.id, room.id));
        }
        for other in &level.props[(index + 1)..] {
            if same_column(prop, other) {
                continue;
            }
            let reach = radius + other.prop_type.footprint_radius() * other.scale;
            if prop.position.distance_xz(other.position) < reach - EPSILON {
                findings.push(format!("props {} and {} overlap", prop.id, other.id));
            }
        }
        for door in &level.doors {
            if door.center.distance_xz(prop.position) < DOOR_EXCLUSION + radius - EPSILON {
                findings.push(format!("prop {} blocks door {}", prop.id, door.id));
            }
        }
        if let Some(spawn) = level.player_spawn
            && spawn.position.distance_xz(prop.position) < SPAWN_EXCLUSION + radius - EPSILON
        {
            findings.push(format!("prop {} crowds the player spawn", prop.id));
        }
    }
}

fn audit_objectives(level: &Level, findings: &mut Vec<String>) {
    for objective in level.objectives.iter().filter(|objective| !objective.tracked_externally) {
        let completed = level.triggers.iter().any(|trigger| {
            trigger.on_enter.complete_objective.as_deref() == Some(objective.id.as_str())
        });
        if !completed {
            findings.push(format!("objective {} has no completing trigger", objective.id));
        }
    }
    let known: BTreeSet<&str> =
        level.objectives.iter().map(|objective| objective.id.as_str()).collect();
    for trigger in &level.triggers {
        for prerequisite in &trigger.prerequisites {
            if !known.contains(prerequisite.as_str()) {
                findings.push(format!("trigger {} waits on unknown {prerequisite}", trigger.id));
            }
        }
    }
}

/// Every locked door's key must be reachable from spawn without passing that door
/// or any other locked door.
fn audit_keys(level: &Level, findings: &mut Vec<String>) {
    let Some(start) = level.spawn_room().map(|room| room.id) else {
        return;
    };
    let door_rooms: Vec<(u32, DoorKind, Vec<u32>)> = level
        .doors
        .iter()
        .map(|door| {
            let rooms = level
                .rooms
                .iter()
                .filter(|room| room.contains_point(door.center, -ADJACENCY_TOLERANCE))
                .map(|room| room.id)
                .collect();
            (door.id, door.kind, rooms)
        })
        .collect();

    for door in level.doors.iter().filter(|door| door.kind == DoorKind::Locked) {
        let Some(key_id) = door.key_id.as_deref() else {
            continue;
        };
        let mut seen = BTreeSet::from([start]);
        let mut open = VecDeque::from([start]);
        while let Some(room) = open.pop_front() {
            for (_, _, linked) in door_rooms.iter().filter(|(id, kind, linked)| {
                *id != door.id && *kind == DoorKind::Proximity && linked.contains(&room)
            }) {
                for next in linked {
                    if seen.insert(*next) {
                        open.push_back(*next);
                    }
                }
            }
        }
        let solvable = level.pickups.iter().any(|pickup| {
            pickup.kind == PickupKind::Key
                && pickup.key_id.as_deref() == Some(key_id)
                && seen.contains(&pickup.room_id)
        });
        if !solvable {
            findings.push(format!("key {key_id} for door {} is not reachable", door.id));
        }
    }
}
