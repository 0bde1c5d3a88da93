use bevy::{
    app::{App, Plugin, Startup, Update},
    core_pipeline::core_2d::Camera2dBundle,
    ecs::{
        event::EventReader,
        query::With,
        system::{Commands, Query, Res, Resource},
    },
    input::{keyboard::KeyCode, mouse::MouseWheel, Input},
    math::Vec3,
    reflect::Reflect,
    render::camera::{Camera, OrthographicProjection},
    time::Time,
    transform::components::Transform,
};
use serde::Deserialize;

pub struct PanZoomCameraPlugin;

impl Plugin for PanZoomCameraPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<CameraSettings>()
            .init_resource::<CameraSettings>()
            .add_systems(Startup, spawn_camera)
            .add_systems(Update, (camera_zoom, camera_pan));
    }
}

#[derive(Resource, Debug, Clone, PartialEq, Deserialize, Reflect)]
pub struct CameraSettings {
    pub zoom_speed: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    /// World units per second while an arrow key is held, at scale 1.
    pub pan_speed: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            zoom_speed: 0.1,
            min_zoom: 0.25,
            max_zoom: 4.,
            pan_speed: 300.,
        }
    }
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn(Camera2dBundle::default());
}

pub fn zoomed_scale(scale: f32, scroll: f32, settings: &CameraSettings) -> f32 {
    (scale - scale * scroll * settings.zoom_speed).clamp(settings.min_zoom, settings.max_zoom)
}

fn camera_zoom(
    mut query: Query<&mut OrthographicProjection>,
    mut mouse_wheel_events: EventReader<MouseWheel>,
    camera_settings: Res<CameraSettings>,
) {
    for event in mouse_wheel_events.read() {
        for mut projection in &mut query {
            projection.scale = zoomed_scale(projection.scale, event.y, &camera_settings);
        }
    }
}

fn camera_pan(
    mut query: Query<(&mut Transform, &OrthographicProjection), With<Camera>>,
    keyboard_input: Res<Input<KeyCode>>,
    camera_settings: Res<CameraSettings>,
    time: Res<Time>,
) {
    let mut direction = Vec3::ZERO;
    if keyboard_input.pressed(KeyCode::Left) {
        direction.x -= 1.;
    }
    if keyboard_input.pressed(KeyCode::Right) {
        direction.x += 1.;
    }
    if keyboard_input.pressed(KeyCode::Up) {
        direction.y += 1.;
    }
    if keyboard_input.pressed(KeyCode::Down) {
        direction.y -= 1.;
    }
    if direction == Vec3::ZERO {
        return;
    }

    for (mut transform, projection) in &mut query {
        transform.translation += direction.normalize()
            * camera_settings.pan_speed
            * projection.scale
            * time.delta_seconds();
    }
}
