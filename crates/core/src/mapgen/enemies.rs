//! Enemy population: guaranteed per-room minimums, then capacity-weighted fill.

use std::f32::consts::TAU;

use tracing::{debug, warn};

use crate::options::GenerationOptions;
use crate::rng::LevelRng;
use crate::types::{Difficulty, Vec2, Vec3};

use super::model::{EnemySpawn, Room};
use super::progression::{self, ENEMY_TYPES};

pub(crate) const ENEMY_WALL_MARGIN: f32 = 1.0;
pub(crate) const MIN_POPULATED_ROOM_SIZE: f32 = 5.0;
const MIN_ENEMIES_PER_ROOM: usize = 4;
const BASE_ROOM_CAPACITY: usize = 4;
const MAX_ROOM_CAPACITY: usize = 7;
const SPACING_STEPS: [f32; 4] = [1.8, 1.2, 0.8, 0.4];
const SAMPLES_PER_SPACING: usize = 30;
const FILL_SPACING: f32 = 1.2;
const STAT_JITTER: f32 = 0.1;
const MIN_FILL_TRIES: usize = 20;
const FILL_TRIES_PER_ENEMY: usize = 14;

/// Rooms big enough to hold enemies and props.
pub(crate) fn is_populated_room(room: &Room) -> bool {
    room.width >= MIN_POPULATED_ROOM_SIZE && room.depth >= MIN_POPULATED_ROOM_SIZE
}

pub fn enemy_capacity(room: &Room, difficulty: Difficulty) -> usize {
    let area = room.area();
    let capacity = BASE_ROOM_CAPACITY
        + usize::from(area > 160.0)
        + usize::from(area > 280.0)
        + progression::enemy_capacity_bonus(difficulty);
    capacity.min(MAX_ROOM_CAPACITY)
}

pub fn generate_enemies(
    rooms: &[Room],
    options: &GenerationOptions,
    rng: &mut LevelRng,
) -> Vec<EnemySpawn> {
    let spawn_room_id = rooms.first().map(|room| room.id);
    let candidates: Vec<&Room> = rooms
        .iter()
        .filter(|room| Some(room.id) != spawn_room_id && is_populated_room(room))
        .collect();
    let capacities: Vec<usize> =
        candidates.iter().map(|room| enemy_capacity(room, options.difficulty)).collect();

    let mut enemies: Vec<EnemySpawn> = Vec::new();

    for room in &candidates {
        for slot in 0..MIN_ENEMIES_PER_ROOM {
            match place_with_relaxation(room, &enemies, rng) {
                Some(position) => {
                    let enemy = make_enemy(enemies.len() as u32, room, position, options, rng);
                    enemies.push(enemy);
                }
                None => warn!(room = room.id, slot, "no free spot for guaranteed enemy; skipped"),
            }
        }
    }

    let minimum_total = MIN_ENEMIES_PER_ROOM * candidates.len();
    let capacity_total: usize = capacities.iter().sum();
    let low = minimum_total.max(options.min_enemies.min(options.max_enemies));
    let requested = rng.int(low as i64, options.max_enemies as i64) as usize;
    let target = requested.min(capacity_total);

    let budget = MIN_FILL_TRIES.max(target * FILL_TRIES_PER_ENEMY);
    let mut tries = 0;
    while enemies.len() < target && tries < budget {
        tries += 1;
        let weights: Vec<f64> = candidates
            .iter()
            .zip(&capacities)
            .map(|(room, capacity)| {
                let occupants = enemies.iter().filter(|enemy| enemy.room_id == room.id).count();
                f64::from(room.area()) * capacity.saturating_sub(occupants) as f64
            })
            .collect();
        if weights.iter().all(|weight| *weight <= 0.0) {
            break;
        }
        let room = candidates[rng.weighted_pick(&weights)];
        let position = sample_in_room(room, ENEMY_WALL_MARGIN, rng);
        if spot_is_clear(room, position, &enemies, FILL_SPACING) {
            let enemy = make_enemy(enemies.len() as u32, room, position, options, rng);
            enemies.push(enemy);
        }
    }

    debug!(
        enemies = enemies.len(),
        target,
        tries,
        rooms = candidates.len(),
        "enemy population complete"
    );
    enemies
}

pub(crate) fn sample_in_room(room: &Room, margin: f32, rng: &mut LevelRng) -> Vec3 {
    let x = rng.float(room.min_x() + margin, room.max_x() - margin);
    let z = rng.float(room.min_z() + margin, room.max_z() - margin);
    Vec3::new(x, room.center.y, z)
}

fn spot_is_clear(room: &Room, position: Vec3, enemies: &[EnemySpawn], spacing: f32) -> bool {
    enemies
        .iter()
        .filter(|enemy| enemy.room_id == room.id)
        .all(|enemy| enemy.position.distance_xz(position) >= spacing)
}

/// Tries progressively tighter spacing; the first spacing that yields a spot wins.
fn place_with_relaxation(
    room: &Room,
    enemies: &[EnemySpawn],
    rng: &mut LevelRng,
) -> Option<Vec3> {
    for spacing in SPACING_STEPS {
        for _ in 0..SAMPLES_PER_SPACING {
            let position = sample_in_room(room, ENEMY_WALL_MARGIN, rng);
            if spot_is_clear(room, position, enemies, spacing) {
                return Some(position);
            }
        }
    }
    None
}

fn jitter(value: f32, rng: &mut LevelRng) -> f32 {
    value * rng.float(1.0 - STAT_JITTER, 1.0 + STAT_JITTER)
}

fn make_enemy(
    id: u32,
    room: &Room,
    position: Vec3,
    options: &GenerationOptions,
    rng: &mut LevelRng,
) -> EnemySpawn {
    let weights = progression::enemy_type_weights(options.difficulty);
    let enemy_type = ENEMY_TYPES[rng.weighted_pick(&weights)];
    let profile = progression::enemy_profile(enemy_type);

    let health = jitter(profile.health, rng);
    let speed = jitter(profile.speed, rng);
    let alert_radius = jitter(profile.alert_radius, rng);
    let field_of_view = jitter(profile.field_of_view, rng);
    let facing = rng.float(0.0, TAU);

    let waypoints = rng.chance(profile.waypoint_chance).then(|| {
        let count = rng.int(1, 4);
        (0..count)
            .map(|_| {
                let point = sample_in_room(room, ENEMY_WALL_MARGIN, rng);
                Vec2 { x: point.x - room.center.x, z: point.z - room.center.z }
            })
            .collect()
    });

    EnemySpawn {
        id,
        enemy_type,
        position,
        room_id: room.id,
        facing,
        health,
        speed,
        alert_radius,
        field_of_view,
        waypoints,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapgen::layout::generate_rooms;
    use crate::mapgen::model::EnemyType;

    fn room(id: u32, x: f32, z: f32, width: f32, depth: f32) -> Room {
        Room {
            id,
            center: Vec3::flat(x, z),
            width,
            depth,
            height: 4.0,
            floor_color: 0,
            wall_color: 0,
        }
    }

    #[test]
    fn capacity_grows_with_area_and_difficulty_but_caps_at_seven() {
        let small = room(1, 0.0, 0.0, 10.0, 10.0);
        let medium = room(2, 0.0, 0.0, 14.0, 14.0);
        let large = room(3, 0.0, 0.0, 18.0, 18.0);
        assert_eq!(enemy_capacity(&small, Difficulty::Easy), 4);
        assert_eq!(enemy_capacity(&medium, Difficulty::Medium), 5);
        assert_eq!(enemy_capacity(&large, Difficulty::Medium), 6);
        assert_eq!(enemy_capacity(&large, Difficulty::Hard), 7);
    }

    #[test]
    fn spawn_room_and_tiny_rooms_stay_empty() {
        let rooms = vec![
            room(0, 0.0, 0.0, 10.0, 10.0),
            room(1, 10.4, 0.0, 10.0, 10.0),
            room(2, 0.0, 7.6, 4.0, 4.8),
        ];
        let options = GenerationOptions { min_enemies: 0, max_enemies: 40, ..Default::default() };
        let mut rng = LevelRng::seeded(3);
        let enemies = generate_enemies(&rooms, &options, &mut rng);
        assert!(!enemies.is_empty());
        assert!(enemies.iter().all(|enemy| enemy.room_id == 1));
    }

    #[test]
    fn each_eligible_room_gets_at_least_four_within_bounds() {
        let mut rng = LevelRng::seeded(55);
        let layout = generate_rooms(7, &mut rng).expect("layout");
        let options = GenerationOptions::default();
        let enemies = generate_enemies(&layout.rooms, &options, &mut rng);

        for room in layout.rooms.iter().skip(1) {
            let in_room: Vec<&EnemySpawn> =
                enemies.iter().filter(|enemy| enemy.room_id == room.id).collect();
            assert!(in_room.len() >= 4, "room {} has {} enemies", room.id, in_room.len());
            assert!(in_room.len() <= enemy_capacity(room, options.difficulty));
            for enemy in in_room {
                assert!(room.contains_point(enemy.position, ENEMY_WALL_MARGIN - 1e-3));
            }
        }
    }

    #[test]
    fn stats_stay_within_jitter_band_and_waypoints_stay_inside_room() {
        let mut rng = LevelRng::seeded(909);
        let layout = generate_rooms(6, &mut rng).expect("layout");
        let enemies = generate_enemies(&layout.rooms, &GenerationOptions::default(), &mut rng);
        for enemy in &enemies {
            let base = progression::enemy_profile(enemy.enemy_type);
            assert!(enemy.health >= base.health * 0.9 - 1e-3);
            assert!(enemy.health <= base.health * 1.1 + 1e-3);
            assert!(enemy.field_of_view <= base.field_of_view * 1.1 + 1e-3);
            let room = &layout.rooms[enemy.room_id as usize];
            if let Some(waypoints) = &enemy.waypoints {
                assert!((1..=4).contains(&waypoints.len()));
                for point in waypoints {
                    assert!(point.x.abs() <= room.half_width());
                    assert!(point.z.abs() <= room.half_depth());
                }
            }
        }
    }

    #[test]
    fn hard_difficulty_fields_more_officers_than_easy() {
        let mut easy_officers = 0;
        let mut hard_officers = 0;
        for seed in 0..12_u32 {
            let mut rng = LevelRng::seeded(seed);
            let layout = generate_rooms(8, &mut rng).expect("layout");
            for (difficulty, tally) in
                [(Difficulty::Easy, &mut easy_officers), (Difficulty::Hard, &mut hard_officers)]
            {
                let options = GenerationOptions { difficulty, ..Default::default() };
                let mut rng = LevelRng::seeded(seed);
                *tally += generate_enemies(&layout.rooms, &options, &mut rng)
                    .iter()
                    .filter(|enemy| enemy.enemy_type == EnemyType::Officer)
                    .count();
            }
        }
        assert!(hard_officers > easy_officers, "hard={hard_officers} easy={easy_officers}");
    }
}
