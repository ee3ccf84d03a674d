//! Mission objectives and their trigger volumes, placed by spatial distance from spawn.

use std::collections::{BTreeMap, VecDeque};

use tracing::debug;

use crate::types::Vec3;

use super::graph::RoomGraph;
use super::model::{Objective, Room, Trigger, TriggerEffect};

pub const ELIMINATE_OBJECTIVE: &str = "eliminate_hostiles";
pub const INTEL_OBJECTIVE: &str = "recover_intel";
pub const EXIT_OBJECTIVE: &str = "reach_extraction";

const SPATIAL_ADJACENCY_PADDING: f32 = 1.0;
const INTEL_MIN_ROOMS: usize = 4;
const INTEL_MIN_DISTANCE: usize = 3;
const EXIT_MIN_DISTANCE: usize = 2;
const EDGE_ROOM_MAX_DEGREE: usize = 2;
const INTEL_HALF_EXTENTS: Vec3 = Vec3 { x: 1.5, y: 1.5, z: 1.5 };
const EXIT_HALF_EXTENTS: Vec3 = Vec3 { x: 2.0, y: 2.0, z: 2.0 };
const TRIGGER_HEIGHT: f32 = 1.0;

/// Bounding boxes, each grown by the padding, intersect. Looser than the door graph.
pub fn spatially_adjacent(a: &Room, b: &Room) -> bool {
    a.id != b.id && a.overlaps(b, SPATIAL_ADJACENCY_PADDING * 2.0)
}

/// Breadth-first hop counts over [`spatially_adjacent`]; unreached rooms are absent.
pub fn spatial_distances(rooms: &[Room], start: u32) -> BTreeMap<u32, usize> {
    let mut distances = BTreeMap::new();
    if !rooms.iter().any(|room| room.id == start) {
        return distances;
    }
    distances.insert(start, 0);
    let mut queue = VecDeque::from([start]);
    while let Some(current) = queue.pop_front() {
        let Some(current_room) = rooms.iter().find(|room| room.id == current) else {
            continue;
        };
        let next_distance = distances[&current] + 1;
        for room in rooms {
            if !distances.contains_key(&room.id) && spatially_adjacent(current_room, room) {
                distances.insert(room.id, next_distance);
                queue.push_back(room.id);
            }
        }
    }
    distances
}

/// Farthest qualifying room; ties resolve to the lowest id.
fn farthest<F>(distances: &BTreeMap<u32, usize>, mut accept: F) -> Option<u32>
where
    F: FnMut(u32, usize) -> bool,
{
    distances
        .iter()
        .filter(|(room, distance)| accept(**room, **distance))
        .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(a.0)))
        .map(|(room, _)| *room)
}

fn trigger_at(room: &Room, objective: &str, half_extents: Vec3) -> Trigger {
    Trigger {
        id: format!("trigger_{objective}"),
        center: Vec3::new(room.center.x, room.center.y + TRIGGER_HEIGHT, room.center.z),
        half_extents,
        on_enter: TriggerEffect { complete_objective: Some(objective.to_owned()), end_mission: false },
        one_shot: true,
        prerequisites: Vec::new(),
        is_exit: false,
    }
}

pub fn generate_objectives(rooms: &[Room], graph: &RoomGraph) -> (Vec<Objective>, Vec<Trigger>) {
    let mut objectives = vec![Objective {
        id: ELIMINATE_OBJECTIVE.to_owned(),
        title: "Eliminate all hostiles".to_owned(),
        trigger_id: None,
        tracked_externally: true,
    }];
    let mut triggers = Vec::new();

    let Some(spawn_room) = rooms.first() else {
        return (objectives, triggers);
    };
    let distances = spatial_distances(rooms, spawn_room.id);

    let mut intel_room = None;
    if rooms.len() >= INTEL_MIN_ROOMS {
        intel_room = farthest(&distances, |_, distance| distance >= INTEL_MIN_DISTANCE)
            .or_else(|| farthest(&distances, |room, _| room != spawn_room.id));
        if let Some(room) = intel_room.and_then(|id| rooms.iter().find(|room| room.id == id)) {
            let trigger = trigger_at(room, INTEL_OBJECTIVE, INTEL_HALF_EXTENTS);
            objectives.push(Objective {
                id: INTEL_OBJECTIVE.to_owned(),
                title: "Recover the intel".to_owned(),
                trigger_id: Some(trigger.id.clone()),
                tracked_externally: false,
            });
            triggers.push(trigger);
        }
    }

    let not_spawn_or_intel = |room: u32| room != spawn_room.id && Some(room) != intel_room;
    let exit_room = farthest(&distances, |room, distance| {
        distance >= EXIT_MIN_DISTANCE
            && not_spawn_or_intel(room)
            && graph.degree(room) <= EDGE_ROOM_MAX_DEGREE
    })
    .or_else(|| {
        farthest(&distances, |room, distance| {
            distance >= EXIT_MIN_DISTANCE && not_spawn_or_intel(room)
        })
    })
    .or_else(|| farthest(&distances, |room, _| not_spawn_or_intel(room)))
    .or_else(|| farthest(&distances, |room, _| room != spawn_room.id));

    match exit_room.and_then(|id| rooms.iter().find(|room| room.id == id)) {
        Some(room) => {
            let mut trigger = trigger_at(room, EXIT_OBJECTIVE, EXIT_HALF_EXTENTS);
            trigger.prerequisites = objectives.iter().map(|objective| objective.id.clone()).collect();
            trigger.on_enter.end_mission = true;
            trigger.is_exit = true;
            objectives.push(Objective {
                id: EXIT_OBJECTIVE.to_owned(),
                title: "Reach the extraction point".to_owned(),
                trigger_id: Some(trigger.id.clone()),
                tracked_externally: false,
            });
            triggers.push(trigger);
        }
        None => debug!(rooms = rooms.len(), "no room apart from spawn; exit objective omitted"),
    }

    (objectives, triggers)
}
