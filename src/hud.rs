use bevy::{
    diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin},
    prelude::*,
};
use isoscape_core::{group::IsoGroup, sort::SortMode};

use crate::types::DemoScene;

const HELP: &str = "Tab: next demo  F3: iso bounds  Arrows/wheel: camera";

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_hud)
            .add_systems(Update, update_hud);
    }
}

#[derive(Component)]
pub struct HudText;

fn spawn_hud(mut commands: Commands) {
    let style = TextStyle {
        font_size: 18.,
        color: Color::WHITE,
        ..default()
    };
    commands.spawn((
        TextBundle::from_sections([
            TextSection::new("", style.clone()),
            TextSection::new("\n", style.clone()),
            TextSection::new(HELP, style),
        ])
        .with_style(Style {
            position_type: PositionType::Absolute,
            top: Val::Px(8.),
            left: Val::Px(8.),
            ..default()
        }),
        HudText,
        Name::new("Hud"),
    ));
}

/// The status line shown for a demo scene and the group it is sorting.
pub fn hud_line(scene: DemoScene, fps: Option<f64>, group: Option<&IsoGroup>) -> String {
    let fps = match fps {
        Some(fps) => format!("{fps:.0} fps"),
        None => "-- fps".to_string(),
    };
    let status = match (scene, group) {
        (_, None) => "Loading".to_string(),
        (DemoScene::DepthSorting, Some(group)) => {
            format!("Click to toggle! Sorting: {}", group.mode)
        }
        (DemoScene::Wander, Some(group)) => {
            let stats = group.stats();
            let mut line = format!(
                "Click to spawn more cubes! {} cubes, {} edges",
                group.len(),
                stats.edges
            );
            if group.mode == SortMode::Topological && stats.cycles_broken > 0 {
                line.push_str(&format!(", {} cycles broken", stats.cycles_broken));
            }
            line
        }
    };
    format!("{fps} | {status}")
}

fn update_hud(
    diagnostics: Res<DiagnosticsStore>,
    scene: Res<State<DemoScene>>,
    groups: Query<&IsoGroup>,
    mut hud_query: Query<&mut Text, With<HudText>>,
) {
    let fps = diagnostics
        .get(FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|fps| fps.smoothed());
    let line = hud_line(*scene.get(), fps, groups.iter().next());
    for mut text in &mut hud_query {
        if text.sections[0].value != line {
            text.sections[0].value = line.clone();
        }
    }
}
