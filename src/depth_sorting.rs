use bevy::prelude::*;
use isoscape_core::{
    group::{IsoGroup, IsoPosition},
    sort::SortMode,
};
use isoscape_render::iso_sprite::IsoSpriteBundle;

use crate::{
    config::DemoConfig,
    types::{despawn_with, DemoScene},
};

pub struct DepthSortingDemoPlugin;

impl Plugin for DepthSortingDemoPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Bob>()
            .add_systems(OnEnter(DemoScene::DepthSorting), spawn_cube_grid)
            .add_systems(
                Update,
                (bob_cubes, toggle_sorting).run_if(in_state(DemoScene::DepthSorting)),
            )
            .add_systems(
                OnExit(DemoScene::DepthSorting),
                despawn_with::<DepthSortingScene>,
            );
    }
}

#[derive(Component)]
pub struct DepthSortingScene;

/// Eases an object's height up and back down forever.
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
pub struct Bob {
    pub base: f32,
    pub height: f32,
    /// Seconds for one way of the trip. Zero keeps the object still.
    pub duration: f32,
    elapsed: f32,
}

impl Bob {
    pub fn new(base: f32, height: f32, duration: f32) -> Self {
        Self {
            base,
            height,
            duration,
            elapsed: 0.,
        }
    }

    pub fn tick(&mut self, delta: f32) -> f32 {
        if self.duration > 0. {
            self.elapsed = (self.elapsed + delta) % (2. * self.duration);
        }
        self.current()
    }

    pub fn current(&self) -> f32 {
        if self.duration <= 0. {
            return self.base;
        }
        let progress = self.elapsed / self.duration;
        let t = if progress <= 1. { progress } else { 2. - progress };
        self.base + self.height * quadratic_in_out(t)
    }
}

pub fn quadratic_in_out(t: f32) -> f32 {
    if t < 0.5 {
        2. * t * t
    } else {
        1. - (-2. * t + 2.).powi(2) / 2.
    }
}

/// Grid coordinates from `start` down to (but excluding) zero, back to front.
pub fn grid_positions(start: f32, step: f32) -> Vec<Vec2> {
    let mut positions = Vec::new();
    let mut x = start;
    while x > 0. {
        let mut y = start;
        while y > 0. {
            positions.push(Vec2::new(x, y));
            y -= step;
        }
        x -= step;
    }
    positions
}

fn cube_color(position: Vec2) -> Color {
    Color::hsl((position.x + position.y) % 360., 0.55, 0.6)
}

pub fn spawn_cube_grid(mut commands: Commands, config: Res<DemoConfig>) {
    let mut group = IsoGroup::new(SortMode::InsertionOrder);

    // Back to front, so the group starts out in the wrong draw order.
    for position in grid_positions(256., 48.) {
        let entity = commands
            .spawn((
                IsoSpriteBundle::new(
                    position.extend(0.),
                    config.sprite_size(),
                    Vec2::splat(0.5),
                    cube_color(position),
                ),
                Bob::new(
                    0.,
                    config.cubes.bob_height,
                    0.1 * ((position.x + position.y) % 10.),
                ),
                DepthSortingScene,
            ))
            .id();
        if let Some(old_z) = group.add(entity) {
            commands.entity(entity).insert(old_z);
        }
    }

    info!(cubes = group.len(), "Spawned depth sorting grid");
    commands.spawn((group, DepthSortingScene, Name::new("Depth sorting group")));
}

fn bob_cubes(time: Res<Time>, mut query: Query<(&mut IsoPosition, &mut Bob)>) {
    for (mut position, mut bob) in &mut query {
        position.0.z = bob.tick(time.delta_seconds());
    }
}

pub fn toggle_sorting(
    mouse_input: Res<Input<MouseButton>>,
    mut groups: Query<&mut IsoGroup, With<DepthSortingScene>>,
) {
    if !mouse_input.just_pressed(MouseButton::Left) {
        return;
    }
    for mut group in &mut groups {
        group.mode = group.mode.toggled(SortMode::Simple);
        info!(mode = %group.mode, "Toggled sorting");
    }
}
