use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use bevy::{
    ecs::system::Resource,
    math::{Vec2, Vec3},
};
use isoscape_core::projector::{IsoProjector, ProjectionAngle};
use isoscape_render::iso_sprite::IsoLayering;
use serde::Deserialize;
use thiserror::Error;

use crate::{camera::CameraSettings, types::DemoScene};

pub const DEFAULT_CONFIG_PATH: &str = "assets/config/isoscape.ron";
pub const CONFIG_PATH_ENV: &str = "ISOSCAPE_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("invalid config file {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: f32,
    pub height: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "isoscape".to_string(),
            width: 800.,
            height: 600.,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProjectorConfig {
    pub angle: ProjectionAngle,
    /// Fraction of the window the iso origin sits at, y down.
    pub anchor: (f32, f32),
}

impl Default for ProjectorConfig {
    fn default() -> Self {
        Self {
            angle: ProjectionAngle::Classic,
            anchor: (0.5, 0.2),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CubeConfig {
    /// Sprite size in pixels; the iso bounds are derived from it.
    pub sprite_size: (f32, f32),
    /// Height every bobbing cube rises to.
    pub bob_height: f32,
    /// Half extent of the floor the wandering cubes stay on, in iso units.
    pub floor_size: f32,
    pub max_speed: f32,
}

impl Default for CubeConfig {
    fn default() -> Self {
        Self {
            sprite_size: (64., 64.),
            bob_height: 10.,
            floor_size: 320.,
            max_speed: 50.,
        }
    }
}

#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub window: WindowConfig,
    pub projector: ProjectorConfig,
    pub padding: f32,
    pub layering: IsoLayering,
    pub camera: CameraSettings,
    pub cubes: CubeConfig,
    pub seed: u64,
    pub start_scene: DemoScene,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            projector: ProjectorConfig::default(),
            padding: isoscape_core::sort::DEFAULT_PADDING,
            layering: IsoLayering::default(),
            camera: CameraSettings::default(),
            cubes: CubeConfig::default(),
            seed: 0,
            start_scene: DemoScene::default(),
        }
    }
}

impl DemoConfig {
    pub fn parse(path: &Path, source: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(source).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate().map_err(|reason| ConfigError::Invalid {
            path: path.to_path_buf(),
            reason,
        })?;
        Ok(config)
    }

    /// Rejects values the demo systems cannot run with, such as an empty zoom range or a
    /// negative speed.
    pub fn validate(&self) -> Result<(), String> {
        let finite = [
            ("padding", self.padding),
            ("cubes.floor_size", self.cubes.floor_size),
            ("cubes.sprite_size.0", self.cubes.sprite_size.0),
            ("cubes.sprite_size.1", self.cubes.sprite_size.1),
            ("cubes.max_speed", self.cubes.max_speed),
            ("camera.min_zoom", self.camera.min_zoom),
            ("camera.max_zoom", self.camera.max_zoom),
        ];
        if let Some((name, _)) = finite.iter().find(|(_, value)| !value.is_finite()) {
            return Err(format!("{name} must be a finite number"));
        }
        if self.camera.min_zoom > self.camera.max_zoom {
            return Err(format!(
                "camera.min_zoom ({}) is greater than camera.max_zoom ({})",
                self.camera.min_zoom, self.camera.max_zoom
            ));
        }
        if self.cubes.max_speed < 0. {
            return Err(format!(
                "cubes.max_speed ({}) must not be negative",
                self.cubes.max_speed
            ));
        }
        if self.cubes.floor_size < 0. {
            return Err(format!(
                "cubes.floor_size ({}) must not be negative",
                self.cubes.floor_size
            ));
        }
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &source)
    }

    pub fn projector(&self) -> IsoProjector {
        IsoProjector::new(
            self.projector.angle,
            Vec2::new(self.window.width, self.window.height),
        )
        .with_anchor(Vec2::new(self.projector.anchor.0, self.projector.anchor.1))
    }

    pub fn sprite_size(&self) -> Vec2 {
        Vec2::new(self.cubes.sprite_size.0, self.cubes.sprite_size.1)
    }

    /// Lower and upper corner the wandering cubes' positions stay between.
    pub fn floor(&self) -> (Vec3, Vec3) {
        (
            Vec3::ZERO,
            Vec3::new(self.cubes.floor_size, self.cubes.floor_size, 0.),
        )
    }
}

/// Where the running config came from, logged once the app is up.
#[derive(Resource, Debug, Clone, PartialEq)]
pub enum ConfigOrigin {
    File(PathBuf),
    Default,
}

/// Loads the config from `ISOSCAPE_CONFIG` or the default path. A missing default file
/// falls back to built in settings; an explicitly requested file must exist.
pub fn load_config() -> anyhow::Result<(DemoConfig, ConfigOrigin)> {
    match std::env::var_os(CONFIG_PATH_ENV) {
        Some(path) => {
            let path = PathBuf::from(path);
            let config = DemoConfig::load(&path)
                .with_context(|| format!("loading config named by {CONFIG_PATH_ENV}"))?;
            Ok((config, ConfigOrigin::File(path)))
        }
        None => load_config_or_default(Path::new(DEFAULT_CONFIG_PATH)),
    }
}

pub fn load_config_or_default(path: &Path) -> anyhow::Result<(DemoConfig, ConfigOrigin)> {
    if !path.exists() {
        return Ok((DemoConfig::default(), ConfigOrigin::Default));
    }
    let config = DemoConfig::load(path)?;
    Ok((config, ConfigOrigin::File(path.to_path_buf())))
}

#[cfg(test)]
mod test {
    use bevy::utils::default;

    use super::*;

    const SHIPPED: &str = include_str!("../assets/config/isoscape.ron");

    #[test]
    fn shipped_config_parses() {
        let config = DemoConfig::parse(Path::new(DEFAULT_CONFIG_PATH), SHIPPED).unwrap();

        assert_eq!(config.window.width, 800.);
        assert_eq!(config.projector.anchor, (0.5, 0.2));
        assert_eq!(config.start_scene, DemoScene::DepthSorting);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let config = DemoConfig::parse(Path::new("inline"), "(seed: 7)").unwrap();

        assert_eq!(config.seed, 7);
        assert_eq!(config.window, WindowConfig::default());
        assert_eq!(config.padding, isoscape_core::sort::DEFAULT_PADDING);
    }

    #[test]
    fn custom_angle_parses() {
        let config =
            DemoConfig::parse(Path::new("inline"), "(projector: (angle: Custom(0.5)))").unwrap();

        assert_eq!(config.projector.angle, ProjectionAngle::Custom(0.5));
        assert_eq!(config.projector.anchor, ProjectorConfig::default().anchor);
    }

    #[test]
    fn parse_errors_name_the_file() {
        let err = DemoConfig::parse(Path::new("broken.ron"), "(seed: \"seven\")").unwrap_err();

        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("broken.ron"));
    }

    fn invalid_reason(source: &str) -> String {
        match DemoConfig::parse(Path::new("bad.ron"), source) {
            Err(ConfigError::Invalid { path, reason }) => {
                assert_eq!(path, Path::new("bad.ron"));
                reason
            }
            other => panic!("expected an invalid config, got {other:?}"),
        }
    }

    #[test]
    fn inverted_zoom_range_is_rejected() {
        let reason = invalid_reason(
            "(camera: (zoom_speed: 0.1, min_zoom: 4.0, max_zoom: 0.25, pan_speed: 300.0))",
        );

        assert!(reason.contains("min_zoom"));
    }

    #[test]
    fn negative_max_speed_is_rejected() {
        let reason = invalid_reason("(cubes: (max_speed: -5.0))");

        assert!(reason.contains("max_speed"));
    }

    #[test]
    fn non_finite_padding_is_rejected() {
        let config = DemoConfig {
            padding: f32::NAN,
            ..default()
        };

        assert!(config.validate().unwrap_err().contains("padding"));
    }

    #[test]
    fn non_finite_floor_size_is_rejected() {
        let mut config = DemoConfig::default();
        config.cubes.floor_size = f32::INFINITY;

        assert!(config.validate().unwrap_err().contains("floor_size"));
    }

    #[test]
    fn non_finite_sprite_size_is_rejected() {
        let mut config = DemoConfig::default();
        config.cubes.sprite_size = (64., f32::NAN);

        assert!(config.validate().unwrap_err().contains("sprite_size"));
    }

    #[test]
    fn nan_zoom_is_rejected() {
        let mut config = DemoConfig::default();
        config.camera.max_zoom = f32::NAN;

        assert!(config.validate().unwrap_err().contains("max_zoom"));
    }

    #[test]
    fn invalid_errors_name_the_file() {
        let err =
            DemoConfig::parse(Path::new("bad.ron"), "(cubes: (max_speed: -1.0))").unwrap_err();

        assert!(err.to_string().contains("bad.ron"));
        assert!(err.to_string().contains("max_speed"));
    }

    #[test]
    fn defaults_are_valid() {
        assert_eq!(DemoConfig::default().validate(), Ok(()));
    }

    #[test]
    fn missing_default_file_falls_back() {
        let (config, origin) =
            load_config_or_default(Path::new("does/not/exist/isoscape.ron")).unwrap();

        assert_eq!(config, DemoConfig::default());
        assert_eq!(origin, ConfigOrigin::Default);
    }

    #[test]
    fn projector_uses_window_size_and_anchor() {
        let config = DemoConfig::default();
        let projector = config.projector();

        assert_eq!(projector.world_size, Vec2::new(800., 600.));
        assert_eq!(projector.project(Vec3::ZERO), Vec2::new(400., 120.));
    }
}
