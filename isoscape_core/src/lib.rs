use bevy::app::{PluginGroup, PluginGroupBuilder};

pub mod bounds;
pub mod depth;
pub mod group;
pub mod projector;
pub mod sort;

pub struct IsoscapeCorePlugins;

impl PluginGroup for IsoscapeCorePlugins {
    fn build(self) -> bevy::app::PluginGroupBuilder {
        PluginGroupBuilder::start::<Self>()
            .add(projector::ProjectorPlugin)
            .add(group::DepthSortPlugin)
    }
}
