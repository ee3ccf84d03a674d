//! Room placement by randomized incremental growth around existing rooms.

use tracing::debug;

use crate::error::GenerationError;
use crate::rng::LevelRng;
use crate::types::Vec3;

use super::doors::{CORNER_BUFFER, MIN_DOOR_OVERLAP};
use super::model::Room;

/// Width × depth footprints; the first entry is always used for the spawn room.
pub(super) const ROOM_TEMPLATES: [(f32, f32); 4] =
    [(10.0, 10.0), (14.0, 10.0), (10.0, 14.0), (16.0, 16.0)];
pub(crate) const ROOM_OVERLAP_MARGIN: f32 = 0.05;
pub(crate) const ROOM_SPACING: f32 = 0.4;
const PLACEMENT_TRIES: usize = 40;
const LAYOUT_ATTEMPTS: usize = 5;
const MIN_ROOM_HEIGHT: f32 = 3.2;
const MAX_ROOM_HEIGHT: f32 = 5.0;
const SLIDE_SAFETY: f32 = 0.1;

const FLOOR_COLORS: [u32; 5] = [0x4A4A4A, 0x5B5348, 0x3F4A52, 0x50504A, 0x463C3C];
const WALL_COLORS: [u32; 5] = [0x8A8A80, 0x6E7B85, 0x7D6F63, 0x9A9488, 0x5E6A5A];

#[derive(Clone, Debug, PartialEq)]
pub struct RoomLayout {
    pub rooms: Vec<Room>,
    /// Spanning-tree edges `(anchor, placed)` recorded during growth.
    pub main_path: Vec<(u32, u32)>,
}

pub fn generate_rooms(count: usize, rng: &mut LevelRng) -> Result<RoomLayout, GenerationError> {
    for attempt in 1..=LAYOUT_ATTEMPTS {
        if let Some(layout) = try_layout(count, rng) {
            debug!(attempt, rooms = layout.rooms.len(), "room layout placed");
            return Ok(layout);
        }
        debug!(attempt, count, "room layout attempt ran out of placements");
    }
    Err(GenerationError::RoomLayoutExhausted { room_count: count, attempts: LAYOUT_ATTEMPTS })
}

fn try_layout(count: usize, rng: &mut LevelRng) -> Option<RoomLayout> {
    let mut rooms = Vec::with_capacity(count);
    let mut main_path = Vec::with_capacity(count.saturating_sub(1));
    if count == 0 {
        return Some(RoomLayout { rooms, main_path });
    }

    let (width, depth) = ROOM_TEMPLATES[0];
    rooms.push(styled_room(0, Vec3::ZERO, width, depth, rng));

    for id in 1..count as u32 {
        let (width, depth) = *rng.pick(&ROOM_TEMPLATES)?;
        let mut room = styled_room(id, Vec3::ZERO, width, depth, rng);
        let mut placed = None;

        for _ in 0..PLACEMENT_TRIES {
            let anchor = rng.pick(&rooms)?;
            let direction = rng.int(0, 3);
            room.center = candidate_center(anchor, width, depth, direction, rng);
            if rooms.iter().all(|existing| !existing.overlaps(&room, ROOM_OVERLAP_MARGIN)) {
                placed = Some(anchor.id);
                break;
            }
        }

        let anchor_id = placed?;
        main_path.push((anchor_id, id));
        rooms.push(room);
    }

    Some(RoomLayout { rooms, main_path })
}

fn styled_room(id: u32, center: Vec3, width: f32, depth: f32, rng: &mut LevelRng) -> Room {
    let height = rng.float(MIN_ROOM_HEIGHT, MAX_ROOM_HEIGHT);
    let floor_color = rng.pick(&FLOOR_COLORS).copied().unwrap_or(FLOOR_COLORS[0]);
    let wall_color = rng.pick(&WALL_COLORS).copied().unwrap_or(WALL_COLORS[0]);
    Room { id, center, width, depth, height, floor_color, wall_color }
}

/// Offsets the new room off one side of `anchor`, sliding it along the shared
/// wall no further than keeps a door-sized span between the corner buffers.
fn candidate_center(
    anchor: &Room,
    width: f32,
    depth: f32,
    direction: i64,
    rng: &mut LevelRng,
) -> Vec3 {
    let required_span = CORNER_BUFFER * 2.0 + MIN_DOOR_OVERLAP;
    match direction {
        0 | 1 => {
            let sign = if direction == 0 { 1.0 } else { -1.0 };
            let offset = anchor.half_width() + width * 0.5 + ROOM_SPACING;
            let slack = (anchor.half_depth() + depth * 0.5 - required_span - SLIDE_SAFETY).max(0.0);
            let slide = rng.float(-slack, slack);
            Vec3::new(anchor.center.x + sign * offset, anchor.center.y, anchor.center.z + slide)
        }
        _ => {
            let sign = if direction == 2 { 1.0 } else { -1.0 };
            let offset = anchor.half_depth() + depth * 0.5 + ROOM_SPACING;
            let slack = (anchor.half_width() + width * 0.5 - required_span - SLIDE_SAFETY).max(0.0);
            let slide = rng.float(-slack, slack);
            Vec3::new(anchor.center.x + slide, anchor.center.y, anchor.center.z + sign * offset)
        }
    }
}
