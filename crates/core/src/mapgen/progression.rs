//! Difficulty-dependent tuning consumed by door, enemy and capacity rules.

use crate::types::Difficulty;

use super::model::EnemyType;

pub(super) fn loop_door_chance(difficulty: Difficulty) -> f64 {
    match difficulty {
        Difficulty::Easy => 0.2,
        Difficulty::Medium => 0.3,
        Difficulty::Hard => 0.4,
    }
}

/// Guard / soldier / officer roll weights.
pub(super) fn enemy_type_weights(difficulty: Difficulty) -> [f64; 3] {
    match difficulty {
        Difficulty::Easy => [0.70, 0.25, 0.05],
        Difficulty::Medium => [0.50, 0.35, 0.15],
        Difficulty::Hard => [0.30, 0.40, 0.30],
    }
}

pub(super) fn enemy_capacity_bonus(difficulty: Difficulty) -> usize {
    usize::from(difficulty == Difficulty::Hard)
}

pub(super) const ENEMY_TYPES: [EnemyType; 3] =
    [EnemyType::Guard, EnemyType::Soldier, EnemyType::Officer];

#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct EnemyProfile {
    pub(super) health: f32,
    pub(super) speed: f32,
    pub(super) alert_radius: f32,
    pub(super) field_of_view: f32,
    pub(super) waypoint_chance: f64,
}

pub(super) fn enemy_profile(enemy_type: EnemyType) -> EnemyProfile {
    match enemy_type {
        EnemyType::Guard => EnemyProfile {
            health: 60.0,
            speed: 2.5,
            alert_radius: 10.0,
            field_of_view: 90.0,
            waypoint_chance: 0.7,
        },
        EnemyType::Soldier => EnemyProfile {
            health: 100.0,
            speed: 3.0,
            alert_radius: 14.0,
            field_of_view: 110.0,
            waypoint_chance: 0.5,
        },
        EnemyType::Officer => EnemyProfile {
            health: 150.0,
            speed: 3.2,
            alert_radius: 18.0,
            field_of_view: 130.0,
            waypoint_chance: 0.3,
        },
    }
}
