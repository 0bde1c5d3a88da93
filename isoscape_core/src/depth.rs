use std::cmp::Ordering;

use bevy::math::Vec3;

/// Weight of height relative to floor distance in the depth key.
pub const DEPTH_Z_SCALE: f32 = 1.25;

/// Scalar draw order of a position. Larger keys are nearer the viewer and draw later.
pub fn depth_key(position: Vec3) -> f32 {
    position.x + position.y + position.z * DEPTH_Z_SCALE
}

/// Total order over positions: the depth key first, then x, y and z so that distinct
/// positions never compare equal.
#[derive(Debug, Clone, Copy)]
pub struct DepthKey {
    key: f32,
    position: Vec3,
}

impl DepthKey {
    pub fn new(position: Vec3) -> Self {
        Self {
            key: depth_key(position),
            position,
        }
    }

    pub fn key(&self) -> f32 {
        self.key
    }
}

impl PartialEq for DepthKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for DepthKey {}

impl PartialOrd for DepthKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DepthKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key
            .total_cmp(&other.key)
            .then_with(|| self.position.x.total_cmp(&other.position.x))
            .then_with(|| self.position.y.total_cmp(&other.position.y))
            .then_with(|| self.position.z.total_cmp(&other.position.z))
    }
}
