use bevy::{
    math::{Rect, Vec2, Vec3},
    reflect::Reflect,
};

use crate::projector::IsoProjector;

/// Axis aligned cube in iso space. `position` is the back, left, bottom corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect)]
pub struct IsoBox {
    pub position: Vec3,
    pub size: Vec3,
}

impl IsoBox {
    pub fn new(position: Vec3, size: Vec3) -> Self {
        Self { position, size }
    }

    /// A zero sized box, for objects that only have a position.
    pub fn point(position: Vec3) -> Self {
        Self::new(position, Vec3::ZERO)
    }

    /// The cube occupied by a sprite of `sprite_size` pixels whose `anchor` (0..1, y down)
    /// sits on the iso `position`. The sprite's top half is read as the cube's top face.
    pub fn from_sprite(position: Vec3, sprite_size: Vec2, anchor: Vec2) -> Self {
        let size = sprite_extent(sprite_size);
        Self::new(position + sprite_offset(sprite_size, anchor), size)
    }

    pub fn front_x(&self) -> f32 {
        self.position.x + self.size.x
    }

    pub fn front_y(&self) -> f32 {
        self.position.y + self.size.y
    }

    pub fn top(&self) -> f32 {
        self.position.z + self.size.z
    }

    pub fn center(&self) -> Vec3 {
        self.position + self.size * 0.5
    }

    /// True when this box's back corner sits behind `other`'s front corner on every axis,
    /// by more than `padding`. Boxes that interpenetrate are behind each other both ways.
    pub fn is_behind(&self, other: &IsoBox, padding: f32) -> bool {
        self.position.x < other.front_x() - padding
            && self.position.y < other.front_y() - padding
            && self.position.z < other.top() - padding
    }

    pub fn corners(&self) -> [Vec3; 8] {
        let min = self.position;
        let max = self.position + self.size;
        [
            Vec3::new(min.x, min.y, min.z),
            Vec3::new(max.x, min.y, min.z),
            Vec3::new(min.x, max.y, min.z),
            Vec3::new(max.x, max.y, min.z),
            Vec3::new(min.x, min.y, max.z),
            Vec3::new(max.x, min.y, max.z),
            Vec3::new(min.x, max.y, max.z),
            Vec3::new(max.x, max.y, max.z),
        ]
    }

    /// Screen space bounding rectangle of the projected cube.
    pub fn screen_rect(&self, projector: &IsoProjector) -> Rect {
        let mut min = Vec2::splat(f32::INFINITY);
        let mut max = Vec2::splat(f32::NEG_INFINITY);
        for corner in self.corners() {
            let screen = projector.project(corner);
            min = min.min(screen);
            max = max.max(screen);
        }
        Rect { min, max }
    }

    /// Strict overlap of the projected rectangles, touching edges do not count.
    pub fn overlaps_on_screen(&self, other: &IsoBox, projector: &IsoProjector) -> bool {
        !self
            .screen_rect(projector)
            .intersect(other.screen_rect(projector))
            .is_empty()
    }
}

pub(crate) fn sprite_extent(sprite_size: Vec2) -> Vec3 {
    let half_width = (sprite_size.x.abs() * 0.5).round();
    Vec3::new(
        half_width,
        half_width,
        (sprite_size.y.abs() - sprite_size.x.abs() * 0.5).round(),
    )
}

pub(crate) fn sprite_offset(sprite_size: Vec2, anchor: Vec2) -> Vec3 {
    let extent = sprite_extent(sprite_size);
    Vec3::new(
        extent.x * -anchor.x + extent.x * 0.5,
        extent.y * anchor.x - extent.y * 0.5,
        -(sprite_size.y.abs() * (1. - anchor.y)) + sprite_size.x.abs() * 0.5,
    )
}
