//! Door openings between adjacent rooms: main-path doors first, then loop doors.

use tracing::debug;

use crate::rng::LevelRng;
use crate::types::{Difficulty, Vec3};

use super::graph::{DoorLink, RoomGraph};
use super::model::{Door, DoorAxis, DoorKind, Room};
use super::progression;

pub(super) const CORNER_BUFFER: f32 = 1.5;
pub(super) const MIN_DOOR_OVERLAP: f32 = 4.0;
pub(crate) const ADJACENCY_TOLERANCE: f32 = 0.6;
const MAX_DOOR_WIDTH: f32 = 2.0;
const DOOR_HEIGHT: f32 = 3.0;
const PROXIMITY_RADIUS: f32 = 3.0;
const LOOP_DOOR_RATIO: f32 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DoorGeometry {
    pub center: Vec3,
    pub axis: DoorAxis,
    pub width: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DoorPlan {
    pub doors: Vec<Door>,
    pub graph: RoomGraph,
    pub loop_doors: usize,
}

fn span_overlap(a_min: f32, a_max: f32, b_min: f32, b_max: f32) -> (f32, f32) {
    (a_min.max(b_min), a_max.min(b_max))
}

/// Projections overlap on one axis and the rooms sit within a wall's gap on the other.
pub fn rooms_adjacent(a: &Room, b: &Room) -> bool {
    let (x_low, x_high) = span_overlap(a.min_x(), a.max_x(), b.min_x(), b.max_x());
    let (z_low, z_high) = span_overlap(a.min_z(), a.max_z(), b.min_z(), b.max_z());
    let separation_x = (a.center.x - b.center.x).abs();
    let separation_z = (a.center.z - b.center.z).abs();

    let stacked_on_z =
        x_high > x_low && separation_z <= a.half_depth() + b.half_depth() + ADJACENCY_TOLERANCE;
    let side_by_side_on_x =
        z_high > z_low && separation_x <= a.half_width() + b.half_width() + ADJACENCY_TOLERANCE;
    stacked_on_z || side_by_side_on_x
}

/// Door centred in the shared wall span after trimming the corner buffers,
/// halfway between the facing walls. `None` when the span is too short.
pub fn door_geometry(a: &Room, b: &Room) -> Option<DoorGeometry> {
    if !rooms_adjacent(a, b) {
        return None;
    }

    let separation_x = (a.center.x - b.center.x).abs();
    let separation_z = (a.center.z - b.center.z).abs();
    let door_y = a.center.y + DOOR_HEIGHT * 0.5;

    if separation_x >= a.half_width() + b.half_width() {
        let (low, high) = span_overlap(a.min_z(), a.max_z(), b.min_z(), b.max_z());
        let (low, high) = (low + CORNER_BUFFER, high - CORNER_BUFFER);
        if high - low < MIN_DOOR_OVERLAP {
            return None;
        }
        let x = if a.center.x < b.center.x {
            (a.max_x() + b.min_x()) * 0.5
        } else {
            (b.max_x() + a.min_x()) * 0.5
        };
        return Some(DoorGeometry {
            center: Vec3::new(x, door_y, (low + high) * 0.5),
            axis: DoorAxis::X,
            width: MAX_DOOR_WIDTH.min(high - low),
        });
    }

    if separation_z >= a.half_depth() + b.half_depth() {
        let (low, high) = span_overlap(a.min_x(), a.max_x(), b.min_x(), b.max_x());
        let (low, high) = (low + CORNER_BUFFER, high - CORNER_BUFFER);
        if high - low < MIN_DOOR_OVERLAP {
            return None;
        }
        let z = if a.center.z < b.center.z {
            (a.max_z() + b.min_z()) * 0.5
        } else {
            (b.max_z() + a.min_z()) * 0.5
        };
        return Some(DoorGeometry {
            center: Vec3::new((low + high) * 0.5, door_y, z),
            axis: DoorAxis::Z,
            width: MAX_DOOR_WIDTH.min(high - low),
        });
    }

    None
}

pub(crate) fn proximity_door(id: u32, geometry: DoorGeometry) -> Door {
    Door {
        id,
        center: geometry.center,
        axis: geometry.axis,
        width: geometry.width,
        height: DOOR_HEIGHT,
        kind: DoorKind::Proximity,
        key_id: None,
        proximity_radius: Some(PROXIMITY_RADIUS),
        required_objectives: Vec::new(),
    }
}

pub fn generate_doors(
    rooms: &[Room],
    main_path: &[(u32, u32)],
    difficulty: Difficulty,
    rng: &mut LevelRng,
) -> DoorPlan {
    let mut doors = Vec::new();
    let mut links = Vec::new();

    for &(room_a, room_b) in main_path {
        let (Some(a), Some(b)) = (room_by_id(rooms, room_a), room_by_id(rooms, room_b)) else {
            debug!(room_a, room_b, "main path edge references an unknown room");
            continue;
        };
        let Some(geometry) = door_geometry(a, b) else {
            debug!(room_a, room_b, "main path edge has no valid door span; dropped");
            continue;
        };
        let door_id = doors.len() as u32;
        doors.push(proximity_door(door_id, geometry));
        links.push(DoorLink { door_id, room_a, room_b });
    }

    let mut candidates = Vec::new();
    for (index, a) in rooms.iter().enumerate() {
        for b in &rooms[(index + 1)..] {
            let already_linked = links.iter().any(|link| link.touches(a.id) && link.touches(b.id));
            if !already_linked && rooms_adjacent(a, b) {
                candidates.push((a.id, b.id));
            }
        }
    }
    rng.shuffle(&mut candidates);

    let max_loop_doors = (rooms.len() as f32 * LOOP_DOOR_RATIO).floor() as usize;
    let chance = progression::loop_door_chance(difficulty);
    let mut loop_doors = 0;
    for (room_a, room_b) in candidates {
        if loop_doors >= max_loop_doors {
            break;
        }
        if !rng.chance(chance) {
            continue;
        }
        let (Some(a), Some(b)) = (room_by_id(rooms, room_a), room_by_id(rooms, room_b)) else {
            continue;
        };
        let Some(geometry) = door_geometry(a, b) else {
            debug!(room_a, room_b, "loop door candidate has no valid door span");
            continue;
        };
        let door_id = doors.len() as u32;
        doors.push(proximity_door(door_id, geometry));
        links.push(DoorLink { door_id, room_a, room_b });
        loop_doors += 1;
    }

    let graph = RoomGraph::build(links, &doors);
    DoorPlan { doors, graph, loop_doors }
}

fn room_by_id(rooms: &[Room], id: u32) -> Option<&Room> {
    rooms.iter().find(|room| room.id == id)
}
