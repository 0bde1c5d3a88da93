use bevy::{
    ecs::system::{Query, Res, Resource},
    gizmos::gizmos::Gizmos,
    render::color::Color,
};

use isoscape_core::{
    bounds::IsoBox,
    group::{IsoBounds, IsoPosition},
    projector::IsoProjector,
};

use crate::iso_sprite::screen_to_world;

/// Outline every object's iso bounds while this resource exists.
#[derive(Resource, Default)]
pub struct IsoBoundsDebug;

// Index pairs into `IsoBox::corners`
const EDGES: [(usize, usize); 12] = [
    (0, 1),
    (1, 3),
    (3, 2),
    (2, 0),
    (4, 5),
    (5, 7),
    (7, 6),
    (6, 4),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
];

pub fn iso_bounds_gizmos(
    mut gizmos: Gizmos,
    projector: Res<IsoProjector>,
    bounds_query: Query<(&IsoPosition, &IsoBounds)>,
) {
    for (position, bounds) in &bounds_query {
        for (start, end) in box_outline(&bounds.at(position.0), &projector) {
            gizmos.line_2d(start, end, Color::LIME_GREEN);
        }
    }
}

fn box_outline(
    iso_box: &IsoBox,
    projector: &IsoProjector,
) -> impl Iterator<Item = (bevy::math::Vec2, bevy::math::Vec2)> {
    let corners = iso_box
        .corners()
        .map(|corner| screen_to_world(projector.project(corner), projector.world_size));
    EDGES
        .into_iter()
        .map(move |(start, end)| (corners[start], corners[end]))
}
