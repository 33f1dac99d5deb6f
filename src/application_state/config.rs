//! # Configuration
//!
//! Startup settings, read once from a JSON file. Every field has a default, so an empty
//! object (or no file at all) yields a working setup.
//!
//! The file is chosen with the `MINECUM_CONFIG` environment variable. Loading always
//! validates, and any invalid value aborts startup instead of being corrected.

use std::{
    fmt, fs, io,
    num::NonZeroU32,
    path::{Path, PathBuf},
};

use cgmath::Point3;
use log::info;
use serde::Deserialize;

use crate::engine_state::{
    player::Player,
    voxels::{
        coordinate::{ChunkExtents, WorldLayout, MAX_CHUNK_EXTENT, MAX_DRAW_DISTANCE},
        generation::{GenerationMethod, MAX_TERRAIN_HEIGHT},
        world::{MeshRetention, World},
    },
};

use super::input_script::{ScriptAction, ScriptStep};

/// Environment variable naming the configuration file
pub const CONFIG_PATH_VARIABLE: &str = "MINECUM_CONFIG";

/// Why a configuration could not be used.
#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read
    Io {
        /// The file that was requested
        path: PathBuf,
        /// The underlying failure
        source: io::Error,
    },
    /// The file is not valid JSON for this schema
    Parse(serde_json::Error),
    /// A value is out of range
    Invalid {
        /// Dotted path of the offending field
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "could not read config {}: {source}", path.display())
            }
            Self::Parse(e) => write!(f, "config parse error: {e}"),
            Self::Invalid { field, reason } => write!(f, "invalid config value {field}: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(e) => Some(e),
            Self::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

/// Everything configurable at startup.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// World layout and streaming
    pub world: WorldConfig,
    /// Player body and controls
    pub player: PlayerConfig,
    /// Headless demo run
    pub demo: DemoConfig,
}

/// World layout and streaming settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// World-space corner of chunk (0, 0)
    pub origin: [f32; 3],
    /// Size of a chunk in blocks
    pub chunk_extents: ChunkExtents,
    /// Radius of the active square, in chunks
    pub draw_distance: i32,
    /// Terrain generator
    pub generation: GenerationMethod,
    /// Fate of deactivated chunks' meshes
    pub mesh_retention: MeshRetention,
    /// Run a full activation pass every frame
    pub recompute_every_frame: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            origin: [0.0, 0.0, 0.0],
            chunk_extents: ChunkExtents::default(),
            draw_distance: 2,
            generation: GenerationMethod::default(),
            mesh_retention: MeshRetention::default(),
            recompute_every_frame: false,
        }
    }
}

impl WorldConfig {
    /// The grid layout these settings describe.
    pub fn layout(&self) -> WorldLayout {
        WorldLayout::new(Point3::from(self.origin), self.chunk_extents)
    }

    /// Creates the world these settings describe.
    pub fn build_world(&self) -> Result<World, ConfigError> {
        self.validate()?;
        let draw_distance = u32::try_from(self.draw_distance)
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or_else(|| invalid("world.draw_distance", "must be at least 1"))?;

        Ok(World::new(self.layout(), draw_distance, self.generation.build())
            .with_retention(self.mesh_retention)
            .with_recompute_every_frame(self.recompute_every_frame))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_DRAW_DISTANCE).contains(&self.draw_distance) {
            return Err(invalid(
                "world.draw_distance",
                format!(
                    "must be between 1 and {MAX_DRAW_DISTANCE}, got {}",
                    self.draw_distance
                ),
            ));
        }
        let extents = self.chunk_extents;
        let in_range = |extent: i32| (1..=MAX_CHUNK_EXTENT).contains(&extent);
        if !(in_range(extents.x) && in_range(extents.y) && in_range(extents.z)) {
            return Err(invalid(
                "world.chunk_extents",
                format!(
                    "every extent must be between 1 and {MAX_CHUNK_EXTENT}, got {}x{}x{}",
                    extents.x, extents.y, extents.z
                ),
            ));
        }
        if !self.origin.iter().all(|value| value.is_finite()) {
            return Err(invalid("world.origin", "must be finite"));
        }
        match self.generation {
            GenerationMethod::Perlin {
                scale,
                base_height,
                amplitude,
                ..
            } => {
                if !scale.is_finite() {
                    return Err(invalid("world.generation", "scale must be finite"));
                }
                if amplitude.is_nan() || amplitude.abs() > f64::from(MAX_TERRAIN_HEIGHT) {
                    return Err(invalid(
                        "world.generation",
                        format!("amplitude must be within ±{MAX_TERRAIN_HEIGHT}, got {amplitude}"),
                    ));
                }
                if base_height.abs() > MAX_TERRAIN_HEIGHT {
                    return Err(invalid(
                        "world.generation",
                        format!("base_height must be within ±{MAX_TERRAIN_HEIGHT}, got {base_height}"),
                    ));
                }
            }
            GenerationMethod::Flat { height } if height.abs() > MAX_TERRAIN_HEIGHT => {
                return Err(invalid(
                    "world.generation",
                    format!("height must be within ±{MAX_TERRAIN_HEIGHT}, got {height}"),
                ));
            }
            _ => {}
        }
        Ok(())
    }
}

/// Player body and control settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Where the player's feet start
    pub spawn: [f32; 3],
    /// Movement speed in blocks per second
    pub speed: f32,
    /// Mouse look sensitivity in degrees per unit
    pub sensitivity: f32,
    /// Width of the bounding box
    pub width: f32,
    /// Height of the bounding box
    pub height: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        PlayerConfig {
            spawn: [8.0, 20.0, 8.0],
            speed: 2.5,
            sensitivity: 2.0,
            width: 0.6,
            height: 1.8,
        }
    }
}

impl PlayerConfig {
    /// Creates the player these settings describe.
    pub fn build_player(&self) -> Player {
        Player::new(Point3::from(self.spawn), self.width, self.height, self.speed)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.spawn.iter().all(|value| value.is_finite()) {
            return Err(invalid("player.spawn", "must be finite"));
        }
        let positive = |value: f32| value.is_finite() && value > 0.0;
        if !positive(self.speed) {
            return Err(invalid("player.speed", format!("must be positive, got {}", self.speed)));
        }
        if !positive(self.width) || !positive(self.height) {
            return Err(invalid(
                "player.width",
                format!("player size must be positive, got {}x{}", self.width, self.height),
            ));
        }
        if !self.sensitivity.is_finite() {
            return Err(invalid("player.sensitivity", "must be finite"));
        }
        Ok(())
    }
}

/// Headless demo settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Number of frames to run
    pub frames: u32,
    /// Simulated time per frame, in milliseconds
    pub frame_time_ms: u64,
    /// Scripted input
    pub script: Vec<ScriptStep>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        DemoConfig {
            frames: 600,
            frame_time_ms: 16,
            script: vec![
                ScriptStep::new(30, ScriptAction::Look { delta_x: 3.0, delta_y: 0.0 }),
                ScriptStep::new(
                    240,
                    ScriptAction::Move {
                        forward: true,
                        backward: false,
                        left: false,
                        right: false,
                        up: false,
                        down: false,
                    },
                ),
                ScriptStep::new(330, ScriptAction::Wander { seed: 7 }),
            ],
        }
    }
}

impl DemoConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_time_ms == 0 {
            return Err(invalid("demo.frame_time_ms", "must be at least 1"));
        }
        Ok(())
    }
}

impl AppConfig {
    /// Parses and validates a configuration.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates the configuration file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Loads the file named by `MINECUM_CONFIG`, or the defaults when it is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_PATH_VARIABLE) {
            Some(path) => Self::load(PathBuf::from(path)),
            None => {
                info!("{} not set, using default config", CONFIG_PATH_VARIABLE);
                let config = AppConfig::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    /// Checks every value against its allowed range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.world.validate()?;
        self.player.validate()?;
        self.demo.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_defaults() {
        let config = AppConfig::from_json_str("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.world.draw_distance, 2);
        assert_eq!(config.world.chunk_extents, ChunkExtents::new(16, 32, 16));
        assert_eq!(config.world.mesh_retention, MeshRetention::Release);
    }

    #[test]
    fn nested_sections_override_defaults() {
        let config = AppConfig::from_json_str(
            r#"{
                "world": {
                    "draw_distance": 4,
                    "chunk_extents": {"x": 8, "y": 16, "z": 8},
                    "generation": {"method": "flat", "height": 3},
                    "mesh_retention": {"policy": "retain_recent", "capacity": 32}
                },
                "player": {"speed": 6.0},
                "demo": {"frames": 10}
            }"#,
        )
        .unwrap();

        assert_eq!(config.world.draw_distance, 4);
        assert_eq!(config.world.generation, GenerationMethod::Flat { height: 3 });
        assert_eq!(config.player.speed, 6.0);
        assert_eq!(config.player.sensitivity, 2.0);
        assert_eq!(config.demo.frames, 10);
        assert_eq!(config.demo.frame_time_ms, 16);

        let world = config.world.build_world().unwrap();
        assert_eq!(world.draw_distance(), 4);
        assert_eq!(world.layout().extents, ChunkExtents::new(8, 16, 8));
    }

    #[test]
    fn zero_draw_distance_is_rejected() {
        let error = AppConfig::from_json_str(r#"{"world": {"draw_distance": 0}}"#).unwrap_err();
        assert!(matches!(
            error,
            ConfigError::Invalid {
                field: "world.draw_distance",
                ..
            }
        ));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let cases = [
            r#"{"world": {"chunk_extents": {"x": 16, "y": 0, "z": 16}}}"#,
            r#"{"world": {"chunk_extents": {"x": 4096, "y": 32, "z": 16}}}"#,
            r#"{"world": {"draw_distance": 2147483647}}"#,
            r#"{"world": {"draw_distance": 100000}}"#,
            r#"{"world": {"generation": {"method": "perlin", "amplitude": 1e12}}}"#,
            r#"{"world": {"generation": {"method": "perlin", "base_height": 2147483647}}}"#,
            r#"{"world": {"generation": {"method": "flat", "height": -2147483648}}}"#,
            r#"{"player": {"speed": -1.0}}"#,
            r#"{"player": {"height": 0.0}}"#,
            r#"{"demo": {"frame_time_ms": 0}}"#,
        ];
        for case in cases {
            assert!(
                matches!(AppConfig::from_json_str(case), Err(ConfigError::Invalid { .. })),
                "{case} should be invalid"
            );
        }
    }

    #[test]
    fn malformed_values_fail_to_parse() {
        let cases = [
            r#"{"world": {"mesh_retention": {"policy": "retain_recent", "capacity": 0}}}"#,
            r#"{"world": {"generation": {"method": "volcanic"}}}"#,
            r#"{"world": "#,
        ];
        for case in cases {
            assert!(
                matches!(AppConfig::from_json_str(case), Err(ConfigError::Parse(_))),
                "{case} should not parse"
            );
        }
    }

    #[test]
    fn missing_file_reports_the_path() {
        let error = AppConfig::load("/nonexistent/minecum.json").unwrap_err();
        match error {
            ConfigError::Io { path, .. } => assert_eq!(path, PathBuf::from("/nonexistent/minecum.json")),
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn largest_accepted_world_builds_and_activates() {
        let json = format!(
            r#"{{"world": {{"draw_distance": {MAX_DRAW_DISTANCE},
                "chunk_extents": {{"x": 1, "y": 1, "z": 1}},
                "generation": {{"method": "perlin", "base_height": {MAX_TERRAIN_HEIGHT}, "amplitude": {MAX_TERRAIN_HEIGHT}}}}}}}"#
        );
        let config = AppConfig::from_json_str(&json).unwrap();
        let mut world = config.world.build_world().unwrap();
        let report = world.update(Point3::new(0.0, 0.0, 0.0));
        let side = (2 * MAX_DRAW_DISTANCE + 1) as usize;
        assert_eq!(report.activated.len(), side * side);
    }
}
