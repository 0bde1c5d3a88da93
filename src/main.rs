use bevy::{diagnostic::FrameTimeDiagnosticsPlugin, prelude::*, window::WindowResolution};
use isoscape_core::{group::DepthSortSettings, IsoscapeCorePlugins};
use isoscape_render::IsoscapeRenderPlugins;

use crate::{
    camera::PanZoomCameraPlugin,
    config::{load_config, ConfigOrigin, DemoConfig},
    debug::DebugPlugin,
    depth_sorting::DepthSortingDemoPlugin,
    hud::HudPlugin,
    types::DemoScene,
    wander::{DemoRng, WanderDemoPlugin},
};

mod camera;
mod config;
mod debug;
mod depth_sorting;
mod hud;
mod types;
mod wander;

fn main() -> anyhow::Result<()> {
    let (config, origin) = load_config()?;

    let start_scene = config.start_scene;
    let mut app = App::new();
    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: config.window.title.clone(),
                    resolution: WindowResolution::new(config.window.width, config.window.height),
                    ..default()
                }),
                ..default()
            })
            .set(ImagePlugin::default_nearest()),
    )
    .add_plugins(FrameTimeDiagnosticsPlugin::default())
    .add_plugins((IsoscapeCorePlugins, IsoscapeRenderPlugins))
    .insert_resource(ClearColor(Color::rgb(0.12, 0.12, 0.16)))
    .insert_resource(config.projector())
    .insert_resource(DepthSortSettings {
        padding: config.padding,
    })
    .insert_resource(config.layering)
    .insert_resource(config.camera.clone())
    .insert_resource(DemoRng::seeded(config.seed))
    .add_state::<DemoScene>()
    .insert_resource(origin)
    .insert_resource(config)
    .add_plugins((
        PanZoomCameraPlugin,
        DebugPlugin,
        HudPlugin,
        DepthSortingDemoPlugin,
        WanderDemoPlugin,
    ))
    .add_systems(Startup, log_config_origin)
    .add_systems(Update, switch_scene);

    if start_scene != DemoScene::default() {
        app.insert_resource(NextState(Some(start_scene)));
    }

    app.run();
    Ok(())
}

fn log_config_origin(origin: Res<ConfigOrigin>, config: Res<DemoConfig>) {
    match origin.as_ref() {
        ConfigOrigin::File(path) => info!(path = %path.display(), "Loaded config"),
        ConfigOrigin::Default => info!("No config file found, using defaults"),
    }
    debug!(?config, "Running with");
}

fn switch_scene(
    keyboard_input: Res<Input<KeyCode>>,
    scene: Res<State<DemoScene>>,
    mut next_scene: ResMut<NextState<DemoScene>>,
) {
    if keyboard_input.just_pressed(KeyCode::Tab) {
        let next = scene.get().next();
        info!(?next, "Switching demo");
        next_scene.set(next);
    }
}
