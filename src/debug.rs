use bevy::prelude::*;
use isoscape_render::debug::IsoBoundsDebug;

pub struct DebugPlugin;

impl Plugin for DebugPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, toggle_bounds_debug.in_set(DebugSet));
    }
}

#[derive(SystemSet, Hash, PartialEq, Eq, Clone, Debug)]
pub struct DebugSet;

fn toggle_bounds_debug(
    mut commands: Commands,
    keyboard_input: Res<Input<KeyCode>>,
    bounds_debug: Option<Res<IsoBoundsDebug>>,
) {
    if keyboard_input.just_pressed(KeyCode::F3) {
        if bounds_debug.is_some() {
            info!("Disabling iso bounds debug");
            commands.remove_resource::<IsoBoundsDebug>();
        } else {
            info!("Enabling iso bounds debug");
            commands.init_resource::<IsoBoundsDebug>();
        }
    }
}
