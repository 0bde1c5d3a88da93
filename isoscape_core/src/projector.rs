use std::f32::consts::PI;

use bevy::{
    app::{App, Plugin},
    ecs::system::Resource,
    math::{Vec2, Vec3},
    reflect::Reflect,
};
use serde::Deserialize;

pub struct ProjectorPlugin;

impl Plugin for ProjectorPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<IsoProjector>()
            .init_resource::<IsoProjector>();
    }
}

/// Angle between the screen's horizontal axis and the iso x axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Reflect)]
pub enum ProjectionAngle {
    /// The 2:1 pixel art projection, `atan(0.5)`.
    #[default]
    Classic,
    /// True isometric, 30 degrees.
    Isometric,
    /// 45 degrees.
    Military,
    Custom(f32),
}

impl ProjectionAngle {
    pub fn radians(&self) -> f32 {
        match self {
            ProjectionAngle::Classic => 0.5f32.atan(),
            ProjectionAngle::Isometric => PI / 6.0,
            ProjectionAngle::Military => PI / 4.0,
            ProjectionAngle::Custom(radians) => *radians,
        }
    }
}

/// Maps iso space (x, y along the floor, z up) onto a y-down screen of `world_size` pixels.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Reflect)]
pub struct IsoProjector {
    angle: ProjectionAngle,
    /// Fraction of the world size the iso origin is offset by.
    pub anchor: Vec2,
    pub world_size: Vec2,
    // (cos, sin) of the projection angle
    transform: Vec2,
}

impl Default for IsoProjector {
    fn default() -> Self {
        Self::new(ProjectionAngle::Classic, Vec2::new(800., 600.))
    }
}

impl IsoProjector {
    pub fn new(angle: ProjectionAngle, world_size: Vec2) -> Self {
        let radians = angle.radians();
        Self {
            angle,
            anchor: Vec2::new(0.5, 0.0),
            world_size,
            transform: Vec2::new(radians.cos(), radians.sin()),
        }
    }

    pub fn with_anchor(mut self, anchor: Vec2) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn angle(&self) -> ProjectionAngle {
        self.angle
    }

    pub fn set_angle(&mut self, angle: ProjectionAngle) {
        let radians = angle.radians();
        self.angle = angle;
        self.transform = Vec2::new(radians.cos(), radians.sin());
    }

    pub fn project(&self, point: Vec3) -> Vec2 {
        self.project_with_anchor(point, self.anchor)
    }

    /// Projects using an explicit anchor instead of the configured one.
    /// Anchors outside `[0, 1]` simply shift the result.
    pub fn project_with_anchor(&self, point: Vec3, anchor: Vec2) -> Vec2 {
        self.project_xy_with_anchor(point, anchor) - Vec2::new(0., point.z)
    }

    /// Projects the floor position of `point`, ignoring its height.
    pub fn project_xy(&self, point: Vec3) -> Vec2 {
        self.project_xy_with_anchor(point, self.anchor)
    }

    fn project_xy_with_anchor(&self, point: Vec3, anchor: Vec2) -> Vec2 {
        Vec2::new(
            (point.x - point.y) * self.transform.x,
            (point.x + point.y) * self.transform.y,
        ) + self.world_size * anchor
    }

    /// Inverse of [`IsoProjector::project`] for a point known to sit at height `z`.
    pub fn unproject(&self, screen: Vec2, z: f32) -> Vec3 {
        let offset = screen - self.world_size * self.anchor + Vec2::new(0., z);
        let x = offset.x / (2. * self.transform.x);
        let y = offset.y / (2. * self.transform.y);
        Vec3::new(x + y, y - x, z)
    }
}
