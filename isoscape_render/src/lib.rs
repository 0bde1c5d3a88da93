use bevy::{
    app::{App, Plugin, PluginGroup, PluginGroupBuilder, PostUpdate},
    ecs::schedule::{common_conditions::resource_exists, IntoSystemConfigs},
};

pub mod debug;
pub mod iso_sprite;

pub struct IsoDebugPlugin;

impl Plugin for IsoDebugPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            PostUpdate,
            debug::iso_bounds_gizmos
                .after(iso_sprite::IsoRenderSet::Layer)
                .run_if(resource_exists::<debug::IsoBoundsDebug>()),
        );
    }
}

pub struct IsoscapeRenderPlugins;

impl PluginGroup for IsoscapeRenderPlugins {
    fn build(self) -> bevy::app::PluginGroupBuilder {
        PluginGroupBuilder::start::<Self>()
            .add(iso_sprite::IsoSpritePlugin)
            .add(IsoDebugPlugin)
    }
}
