use bevy::{prelude::*, sprite::Anchor, transform::TransformSystem};
use serde::Deserialize;
use tracing::instrument;

use isoscape_core::{
    group::{DepthSortSet, IsoBounds, IsoGroup, IsoPosition},
    projector::IsoProjector,
};

#[derive(SystemSet, Hash, Debug, PartialEq, Eq, Clone)]
pub enum IsoRenderSet {
    Project,
    Layer,
}

/// Highest draw layer handed out. The default 2D camera sits at z 999.9 and clips anything
/// above it.
pub const MAX_LAYER: f32 = 999.;

/// Draw layers handed out to group members: member `i` sits at `base_layer + i * layer_step`.
/// Groups too large to fit below [`MAX_LAYER`] get a smaller step instead.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Deserialize, Reflect)]
pub struct IsoLayering {
    pub base_layer: f32,
    pub layer_step: f32,
}

impl IsoLayering {
    /// Draw layer of member `index` in a group of `len`.
    pub fn layer(&self, index: usize, len: usize) -> f32 {
        let room = (MAX_LAYER - self.base_layer).max(0.) / len.max(1) as f32;
        self.base_layer + index as f32 * self.layer_step.min(room)
    }
}

impl Default for IsoLayering {
    fn default() -> Self {
        Self {
            base_layer: 1.,
            layer_step: 0.01,
        }
    }
}

#[derive(Bundle, Clone, Default)]
pub struct IsoSpriteBundle {
    pub sprite: Sprite,
    pub texture: Handle<Image>,
    pub iso_position: IsoPosition,
    pub iso_bounds: IsoBounds,
    pub transform: Transform,
    pub global_transform: GlobalTransform,
    /// User indication of whether an entity is visible
    pub visibility: Visibility,
    /// Inherited visibility of an entity.
    pub inherited_visibility: InheritedVisibility,
    /// Algorithmically-computed indication of whether an entity is visible and should be extracted for rendering
    pub view_visibility: ViewVisibility,
}

impl IsoSpriteBundle {
    /// A flat colored sprite of `size` pixels whose `anchor` (0..1, y down) sits on `position`.
    pub fn new(position: Vec3, size: Vec2, anchor: Vec2, color: Color) -> Self {
        Self {
            sprite: Sprite {
                color,
                custom_size: Some(size),
                anchor: sprite_anchor(anchor),
                ..default()
            },
            iso_position: IsoPosition(position),
            iso_bounds: IsoBounds::from_sprite(size, anchor),
            ..default()
        }
    }
}

/// Converts a y down anchor in `[0, 1]` into Bevy's centred, y up [`Anchor`].
pub fn sprite_anchor(anchor: Vec2) -> Anchor {
    if anchor == Vec2::splat(0.5) {
        Anchor::Center
    } else {
        Anchor::Custom(Vec2::new(anchor.x - 0.5, 0.5 - anchor.y))
    }
}

/// Projected screen coordinates (y down, origin top left) to Bevy world coordinates
/// (y up, origin at the centre of the world).
pub fn screen_to_world(screen: Vec2, world_size: Vec2) -> Vec2 {
    Vec2::new(screen.x - world_size.x * 0.5, world_size.y * 0.5 - screen.y)
}

pub fn project_iso_sprites(
    projector: Res<IsoProjector>,
    mut query: Query<(&IsoPosition, &mut Transform)>,
) {
    for (position, mut transform) in &mut query {
        let world = screen_to_world(projector.project(position.0), projector.world_size);
        transform.translation.x = world.x;
        transform.translation.y = world.y;
    }
}

#[instrument(skip_all)]
pub fn apply_draw_order(
    layering: Res<IsoLayering>,
    groups: Query<&IsoGroup>,
    mut transforms: Query<&mut Transform, With<IsoPosition>>,
) {
    for group in &groups {
        let len = group.len();
        for (index, entity) in group.members().iter().enumerate() {
            if let Ok(mut transform) = transforms.get_mut(*entity) {
                transform.translation.z = layering.layer(index, len);
            }
        }
    }
}

pub struct IsoSpritePlugin;

impl Plugin for IsoSpritePlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<IsoLayering>()
            .init_resource::<IsoLayering>()
            .configure_sets(
                PostUpdate,
                (IsoRenderSet::Project, IsoRenderSet::Layer)
                    .chain()
                    .after(DepthSortSet)
                    .before(TransformSystem::TransformPropagate),
            )
            .add_systems(
                PostUpdate,
                (
                    project_iso_sprites.in_set(IsoRenderSet::Project),
                    apply_draw_order.in_set(IsoRenderSet::Layer),
                ),
            );
    }
}
