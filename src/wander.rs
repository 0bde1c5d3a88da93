use bevy::prelude::*;
use isoscape_core::{
    group::{IsoBounds, IsoGroup, IsoPosition},
    sort::SortMode,
};
use isoscape_render::iso_sprite::IsoSpriteBundle;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use tracing::instrument;

use crate::{
    config::DemoConfig,
    depth_sorting::grid_positions,
    types::{despawn_with, DemoScene},
};

pub struct WanderDemoPlugin;

impl Plugin for WanderDemoPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Velocity>()
            .add_systems(OnEnter(DemoScene::Wander), setup_wander)
            .add_systems(
                Update,
                (drift, spawn_on_click).run_if(in_state(DemoScene::Wander)),
            )
            .add_systems(OnExit(DemoScene::Wander), despawn_with::<WanderScene>);
    }
}

#[derive(Component)]
pub struct WanderScene;

#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Reflect)]
pub struct Velocity(pub Vec3);

#[derive(Resource)]
pub struct DemoRng(pub Xoshiro256PlusPlus);

impl DemoRng {
    pub fn seeded(seed: u64) -> Self {
        Self(Xoshiro256PlusPlus::seed_from_u64(seed))
    }
}

/// Moves `position` by `velocity * delta`, reflecting off the walls of `[min, max - size]`.
/// Axes where the floor has no extent are left alone.
pub fn step_within(
    position: Vec3,
    velocity: Vec3,
    delta: f32,
    min: Vec3,
    max: Vec3,
    size: Vec3,
) -> (Vec3, Vec3) {
    let mut position = position + velocity * delta;
    let mut velocity = velocity;
    let upper = (max - size).max(min);
    for axis in 0..3 {
        if max[axis] <= min[axis] {
            continue;
        }
        if position[axis] < min[axis] {
            position[axis] = min[axis];
            velocity[axis] = velocity[axis].abs();
        } else if position[axis] > upper[axis] {
            position[axis] = upper[axis];
            velocity[axis] = -velocity[axis].abs();
        }
    }
    (position, velocity)
}

/// Spawns a 4x4 set of cubes with random floor velocities into `group`.
#[instrument(skip_all, fields(members = group.len()))]
pub fn spawn_wave(
    commands: &mut Commands,
    group: &mut IsoGroup,
    rng: &mut DemoRng,
    config: &DemoConfig,
) -> usize {
    let max_speed = config.cubes.max_speed;
    let mut spawned = 0;
    for position in grid_positions(256., 64.) {
        let velocity = Vec3::new(
            rng.0.gen_range(-max_speed..=max_speed),
            rng.0.gen_range(-max_speed..=max_speed),
            0.,
        );
        let entity = commands
            .spawn((
                IsoSpriteBundle::new(
                    position.extend(0.),
                    config.sprite_size(),
                    Vec2::splat(0.5),
                    Color::hsl(rng.0.gen_range(0. ..360.), 0.5, 0.65),
                ),
                Velocity(velocity),
                WanderScene,
            ))
            .id();
        if let Some(old_z) = group.add(entity) {
            commands.entity(entity).insert(old_z);
            spawned += 1;
        }
    }
    spawned
}

fn setup_wander(mut commands: Commands, mut rng: ResMut<DemoRng>, config: Res<DemoConfig>) {
    let mut group = IsoGroup::new(SortMode::Topological);
    let spawned = spawn_wave(&mut commands, &mut group, &mut rng, &config);
    info!(cubes = spawned, "Spawned wandering cubes");
    commands.spawn((group, WanderScene, Name::new("Wander group")));
}

fn drift(
    time: Res<Time>,
    config: Res<DemoConfig>,
    mut query: Query<(&mut IsoPosition, &mut Velocity, &IsoBounds)>,
) {
    let (min, max) = config.floor();
    for (mut position, mut velocity, bounds) in &mut query {
        let (next_position, next_velocity) = step_within(
            position.0,
            velocity.0,
            time.delta_seconds(),
            min,
            max,
            bounds.size,
        );
        position.0 = next_position;
        velocity.0 = next_velocity;
    }
}

pub fn spawn_on_click(
    mut commands: Commands,
    mouse_input: Res<Input<MouseButton>>,
    mut groups: Query<&mut IsoGroup, With<WanderScene>>,
    mut rng: ResMut<DemoRng>,
    config: Res<DemoConfig>,
) {
    if !mouse_input.just_pressed(MouseButton::Left) {
        return;
    }
    for mut group in &mut groups {
        let spawned = spawn_wave(&mut commands, &mut group, &mut rng, &config);
        info!(spawned, total = group.len(), "Spawned more cubes");
    }
}
