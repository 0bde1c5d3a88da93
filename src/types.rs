use bevy::prelude::*;
use serde::Deserialize;

/// The demo scene currently on screen.
#[derive(States, Clone, Copy, PartialEq, Eq, Debug, Hash, Default, Deserialize, Reflect)]
pub enum DemoScene {
    /// A bobbing grid of cubes; clicking toggles between insertion order and the simple sort.
    #[default]
    DepthSorting,
    /// Cubes drifting around the floor, topologically sorted every frame.
    Wander,
}

impl DemoScene {
    pub fn next(&self) -> Self {
        match self {
            DemoScene::DepthSorting => DemoScene::Wander,
            DemoScene::Wander => DemoScene::DepthSorting,
        }
    }
}

/// Despawns everything tagged with `T`, used to tear a scene down on exit.
pub fn despawn_with<T: Component>(mut commands: Commands, query: Query<Entity, With<T>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}
