use bevy::prelude::*;

use crate::{
    bounds::{sprite_extent, sprite_offset, IsoBox},
    projector::IsoProjector,
    sort::{sort_collection, IsoSortable, SortMode, SortStats, DEFAULT_PADDING},
};

#[derive(SystemSet, Hash, Debug, PartialEq, Eq, Clone)]
pub struct DepthSortSet;

pub struct DepthSortPlugin;

impl Plugin for DepthSortPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<IsoPosition>()
            .register_type::<IsoBounds>()
            .register_type::<OldZ>()
            .register_type::<IsoGroup>()
            .register_type::<DepthSortSettings>()
            .init_resource::<DepthSortSettings>()
            .add_systems(PostUpdate, sort_iso_groups.in_set(DepthSortSet));
    }
}

/// Position in iso space: x and y along the floor, z up.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Reflect)]
pub struct IsoPosition(pub Vec3);

/// The cube an object occupies, relative to its [`IsoPosition`].
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Reflect)]
pub struct IsoBounds {
    pub offset: Vec3,
    pub size: Vec3,
}

impl IsoBounds {
    pub fn new(offset: Vec3, size: Vec3) -> Self {
        Self { offset, size }
    }

    pub fn from_sprite(sprite_size: Vec2, anchor: Vec2) -> Self {
        Self::new(sprite_offset(sprite_size, anchor), sprite_extent(sprite_size))
    }

    pub fn at(&self, position: Vec3) -> IsoBox {
        IsoBox::new(position + self.offset, self.size)
    }
}

/// Index of an object in its group when it was added; sorting by it restores spawn order.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Reflect)]
pub struct OldZ(pub usize);

#[derive(Resource, Debug, Clone, Copy, PartialEq, Reflect)]
pub struct DepthSortSettings {
    pub padding: f32,
}

impl Default for DepthSortSettings {
    fn default() -> Self {
        Self {
            padding: DEFAULT_PADDING,
        }
    }
}

/// Ordered collection of iso objects, reordered back to front once per frame.
#[derive(Component, Debug, Default, Reflect)]
pub struct IsoGroup {
    members: Vec<Entity>,
    pub mode: SortMode,
    stats: SortStats,
    added: usize,
}

impl IsoGroup {
    pub fn new(mode: SortMode) -> Self {
        Self {
            mode,
            ..default()
        }
    }

    /// Appends `entity`, returning its insertion index, or `None` if it is already a member.
    pub fn add(&mut self, entity: Entity) -> Option<OldZ> {
        if self.contains(entity) {
            return None;
        }
        self.members.push(entity);
        let old_z = OldZ(self.added);
        self.added += 1;
        Some(old_z)
    }

    pub fn remove(&mut self, entity: Entity) -> bool {
        let before = self.members.len();
        self.members.retain(|member| *member != entity);
        self.members.len() != before
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.members.contains(&entity)
    }

    /// Members in draw order, back to front, as of the last sort.
    pub fn members(&self) -> &[Entity] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn stats(&self) -> SortStats {
        self.stats
    }
}

struct Member {
    entity: Entity,
    position: Vec3,
    iso_box: IsoBox,
    old_z: Option<OldZ>,
}

impl IsoSortable for Member {
    fn iso_box(&self) -> IsoBox {
        self.iso_box
    }

    fn iso_position(&self) -> Vec3 {
        self.position
    }

    fn insertion_index(&self) -> usize {
        self.old_z.map_or(usize::MAX, |old_z| old_z.0)
    }
}

pub fn sort_iso_groups(
    mut groups: Query<(Entity, &mut IsoGroup)>,
    objects: Query<(&IsoPosition, Option<&IsoBounds>, Option<&OldZ>)>,
    projector: Res<IsoProjector>,
    settings: Res<DepthSortSettings>,
) {
    for (group_entity, mut group) in &mut groups {
        let mut members = Vec::with_capacity(group.len());
        for &entity in &group.members {
            if let Ok((position, bounds, old_z)) = objects.get(entity) {
                members.push(Member {
                    entity,
                    position: position.0,
                    iso_box: bounds.map_or(IsoBox::point(position.0), |b| b.at(position.0)),
                    old_z: old_z.copied(),
                });
            }
        }

        let pruned = group.len() - members.len();
        if pruned > 0 {
            debug!(group = ?group_entity, pruned, "Pruned missing group members");
        }

        let stats = sort_collection(&mut members, group.mode, &projector, settings.padding);

        group.members = members.into_iter().map(|member| member.entity).collect();
        group.stats = stats;
    }
}
