//! Door-link room graph: the authoritative connectivity between rooms.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};

use super::model::{Door, DoorKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DoorLink {
    pub door_id: u32,
    pub room_a: u32,
    pub room_b: u32,
}

impl DoorLink {
    pub fn touches(&self, room: u32) -> bool {
        self.room_a == room || self.room_b == room
    }

    pub fn other(&self, room: u32) -> Option<u32> {
        if self.room_a == room {
            Some(self.room_b)
        } else if self.room_b == room {
            Some(self.room_a)
        } else {
            None
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomGraph {
    pub links: Vec<DoorLink>,
    /// Every door, regardless of kind.
    pub all: BTreeMap<u32, BTreeSet<u32>>,
    /// Proximity doors only.
    pub unlocked: BTreeMap<u32, BTreeSet<u32>>,
    locked_doors: BTreeSet<u32>,
}

impl RoomGraph {
    pub fn build(links: Vec<DoorLink>, doors: &[Door]) -> Self {
        let locked_doors: BTreeSet<u32> = doors
            .iter()
            .filter(|door| door.kind == DoorKind::Locked)
            .map(|door| door.id)
            .collect();

        let mut all: BTreeMap<u32, BTreeSet<u32>> = BTreeMap::new();
        let mut unlocked: BTreeMap<u32, BTreeSet<u32>> = BTreeMap::new();
        for link in &links {
            all.entry(link.room_a).or_default().insert(link.room_b);
            all.entry(link.room_b).or_default().insert(link.room_a);
            if !locked_doors.contains(&link.door_id) {
                unlocked.entry(link.room_a).or_default().insert(link.room_b);
                unlocked.entry(link.room_b).or_default().insert(link.room_a);
            }
        }

        Self { links, all, unlocked, locked_doors }
    }

    pub fn linked(&self, a: u32, b: u32) -> bool {
        self.all.get(&a).is_some_and(|neighbors| neighbors.contains(&b))
    }

    /// Number of distinct rooms reachable through one door.
    pub fn degree(&self, room: u32) -> usize {
        self.all.get(&room).map_or(0, BTreeSet::len)
    }

    pub fn links_for_door(&self, door_id: u32) -> impl Iterator<Item = &DoorLink> {
        self.links.iter().filter(move |link| link.door_id == door_id)
    }

    pub fn reachable(&self, start: u32, unlocked_only: bool) -> BTreeSet<u32> {
        let adjacency = if unlocked_only { &self.unlocked } else { &self.all };
        let mut seen = BTreeSet::from([start]);
        let mut open = VecDeque::from([start]);
        while let Some(room) = open.pop_front() {
            for next in adjacency.get(&room).into_iter().flatten() {
                if seen.insert(*next) {
                    open.push_back(*next);
                }
            }
        }
        seen
    }

    /// Rooms reachable through unlocked doors without ever using `door_id`.
    pub fn reachable_without_door(&self, start: u32, door_id: u32) -> BTreeSet<u32> {
        let mut seen = BTreeSet::from([start]);
        let mut open = VecDeque::from([start]);
        while let Some(room) = open.pop_front() {
            for link in &self.links {
                if link.door_id == door_id || self.locked_doors.contains(&link.door_id) {
                    continue;
                }
                let Some(next) = link.other(room) else {
                    continue;
                };
                if seen.insert(next) {
                    open.push_back(next);
                }
            }
        }
        seen
    }
}
