//! Shared footprint registry so no two placed entities claim the same floor.

use crate::types::Vec3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub x: f32,
    pub z: f32,
    pub radius: f32,
}

#[derive(Clone, Debug, Default)]
pub struct OccupancyRegistry {
    circles: Vec<Circle>,
}

impl OccupancyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn occupy(&mut self, position: Vec3, radius: f32) {
        self.circles.push(Circle { x: position.x, z: position.z, radius });
    }

    pub fn is_free(&self, x: f32, z: f32, radius: f32) -> bool {
        self.circles.iter().all(|circle| {
            let dx = circle.x - x;
            let dz = circle.z - z;
            (dx * dx + dz * dz).sqrt() >= circle.radius + radius
        })
    }

    pub fn len(&self) -> usize {
        self.circles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.circles.is_empty()
    }
}
