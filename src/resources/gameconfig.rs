//! Game configuration resource.
//!
//! Manages game settings loaded from an INI configuration file. Provides
//! defaults for safe startup and methods to load/save configuration.
//!
//! # Configuration File Format
//!
//! ```ini
//! [window]
//! width = 1024
//! height = 576
//! target_fps = 60
//! vsync = true
//! fullscreen = false
//!
//! [render]
//! pixels_per_unit = 100
//!
//! [physics]
//! gravity_y = -9.8
//! step_rate = 60
//! max_frame_time = 0.25
//! velocity_iterations = 8
//! position_iterations = 3
//! accumulator = fixed
//!
//! [player]
//! min_walk_speed_sq = 0.1
//! stand_friction = 100
//! walk_friction = 0.2
//! walk_speed = 1.5
//! jump_speed = 3
//! air_speed_cap = 1.5
//! air_acceleration = 1.6667
//!
//! [camera]
//! follow_speed = 0.1
//! min_zoom = 0.01
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

use crate::systems::physics::AccumulatorMode;

/// Default safe values for startup
const DEFAULT_WINDOW_WIDTH: u32 = 1024;
const DEFAULT_WINDOW_HEIGHT: u32 = 576;
const DEFAULT_TARGET_FPS: u32 = 60;
const DEFAULT_VSYNC: bool = true;
const DEFAULT_FULLSCREEN: bool = false;
const DEFAULT_PIXELS_PER_UNIT: f32 = 100.0;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// `[physics]` section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsConfig {
    pub gravity_y: f32,
    /// Fixed steps per second.
    pub step_rate: u32,
    /// Upper bound on the frame time fed to the accumulator.
    pub max_frame_time: f32,
    pub velocity_iterations: u32,
    pub position_iterations: u32,
    pub accumulator: AccumulatorMode,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity_y: -9.8,
            step_rate: 60,
            max_frame_time: 0.25,
            velocity_iterations: 8,
            position_iterations: 3,
            accumulator: AccumulatorMode::Fixed,
        }
    }
}

impl PhysicsConfig {
    /// Fixed step size in seconds.
    pub fn step(&self) -> f32 {
        1.0 / self.step_rate.max(1) as f32
    }
}

/// `[player]` section: movement tuning of the character controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerTuning {
    /// Squared speed separating standing from moving.
    pub min_walk_speed_sq: f32,
    /// Friction while no horizontal input is held.
    pub stand_friction: f32,
    /// Friction while walking.
    pub walk_friction: f32,
    pub walk_speed: f32,
    pub jump_speed: f32,
    /// Horizontal speed above which air control stops pushing.
    pub air_speed_cap: f32,
    /// Air control force per unit mass.
    pub air_acceleration: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            min_walk_speed_sq: 0.1,
            stand_friction: 100.0,
            walk_friction: 0.2,
            walk_speed: 1.5,
            jump_speed: 3.0,
            air_speed_cap: 1.5,
            air_acceleration: 100.0 / 60.0,
        }
    }
}

/// `[camera]` section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTuning {
    pub follow_speed: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    pub min_zoom: f32,
}

impl Default for CameraTuning {
    fn default() -> Self {
        Self {
            follow_speed: 0.1,
            min_speed: 0.01,
            max_speed: 1.0,
            min_zoom: 0.01,
        }
    }
}

/// Game configuration resource.
#[derive(Resource, Debug, Clone)]
pub struct GameConfig {
    /// Window width in pixels.
    pub window_width: u32,
    /// Window height in pixels.
    pub window_height: u32,
    /// Target frames per second.
    pub target_fps: u32,
    /// Enable vertical sync.
    pub vsync: bool,
    /// Start in fullscreen mode.
    pub fullscreen: bool,
    /// Pixels drawn per world unit at zoom 1.
    pub pixels_per_unit: f32,
    pub physics: PhysicsConfig,
    pub player: PlayerTuning,
    pub camera: CameraTuning,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn get_f32(config: &Ini, section: &str, key: &str) -> Result<Option<f32>, String> {
    config
        .getfloat(section, key)
        .map(|v| v.map(|v| v as f32))
        .map_err(|e| format!("[{}] {}: {}", section, key, e))
}

fn get_u32(config: &Ini, section: &str, key: &str) -> Result<Option<u32>, String> {
    config
        .getuint(section, key)
        .map(|v| v.map(|v| v as u32))
        .map_err(|e| format!("[{}] {}: {}", section, key, e))
}

fn get_bool(config: &Ini, section: &str, key: &str) -> Result<Option<bool>, String> {
    config
        .getbool(section, key)
        .map_err(|e| format!("[{}] {}: {}", section, key, e))
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            target_fps: DEFAULT_TARGET_FPS,
            vsync: DEFAULT_VSYNC,
            fullscreen: DEFAULT_FULLSCREEN,
            pixels_per_unit: DEFAULT_PIXELS_PER_UNIT,
            physics: PhysicsConfig::default(),
            player: PlayerTuning::default(),
            camera: CameraTuning::default(),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values. Returns an
    /// error if the file cannot be read or a present value does not parse.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;
        self.apply(&config)?;

        info!(
            "Loaded config: {}x{} window, fps={}, vsync={}, ppu={}, step rate={}, accumulator={:?}",
            self.window_width,
            self.window_height,
            self.target_fps,
            self.vsync,
            self.pixels_per_unit,
            self.physics.step_rate,
            self.physics.accumulator
        );

        Ok(())
    }

    /// Load configuration from INI text.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .read(text.to_string())
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        self.apply(&config)
    }

    fn apply(&mut self, config: &Ini) -> Result<(), String> {
        // [window] section
        if let Some(width) = get_u32(config, "window", "width")? {
            self.window_width = width;
        }
        if let Some(height) = get_u32(config, "window", "height")? {
            self.window_height = height;
        }
        if let Some(fps) = get_u32(config, "window", "target_fps")? {
            self.target_fps = fps;
        }
        if let Some(vsync) = get_bool(config, "window", "vsync")? {
            self.vsync = vsync;
        }
        if let Some(fullscreen) = get_bool(config, "window", "fullscreen")? {
            self.fullscreen = fullscreen;
        }

        // [render] section
        if let Some(ppu) = get_f32(config, "render", "pixels_per_unit")? {
            self.pixels_per_unit = ppu;
        }

        // [physics] section
        let physics = &mut self.physics;
        if let Some(v) = get_f32(config, "physics", "gravity_y")? {
            physics.gravity_y = v;
        }
        if let Some(v) = get_u32(config, "physics", "step_rate")? {
            if v == 0 {
                return Err("[physics] step_rate: must be positive".to_string());
            }
            physics.step_rate = v;
        }
        if let Some(v) = get_f32(config, "physics", "max_frame_time")? {
            physics.max_frame_time = v;
        }
        if let Some(v) = get_u32(config, "physics", "velocity_iterations")? {
            physics.velocity_iterations = v;
        }
        if let Some(v) = get_u32(config, "physics", "position_iterations")? {
            physics.position_iterations = v;
        }
        if let Some(v) = config.get("physics", "accumulator") {
            physics.accumulator = v.parse()?;
        }

        // [player] section
        let player = &mut self.player;
        if let Some(v) = get_f32(config, "player", "min_walk_speed_sq")? {
            player.min_walk_speed_sq = v;
        }
        if let Some(v) = get_f32(config, "player", "stand_friction")? {
            player.stand_friction = v;
        }
        if let Some(v) = get_f32(config, "player", "walk_friction")? {
            player.walk_friction = v;
        }
        if let Some(v) = get_f32(config, "player", "walk_speed")? {
            player.walk_speed = v;
        }
        if let Some(v) = get_f32(config, "player", "jump_speed")? {
            player.jump_speed = v;
        }
        if let Some(v) = get_f32(config, "player", "air_speed_cap")? {
            player.air_speed_cap = v;
        }
        if let Some(v) = get_f32(config, "player", "air_acceleration")? {
            player.air_acceleration = v;
        }

        // [camera] section
        let camera = &mut self.camera;
        if let Some(v) = get_f32(config, "camera", "follow_speed")? {
            camera.follow_speed = v;
        }
        if let Some(v) = get_f32(config, "camera", "min_speed")? {
            camera.min_speed = v;
        }
        if let Some(v) = get_f32(config, "camera", "max_speed")? {
            camera.max_speed = v;
        }
        if let Some(v) = get_f32(config, "camera", "min_zoom")? {
            camera.min_zoom = v;
        }

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        // [window] section
        config.set("window", "width", Some(self.window_width.to_string()));
        config.set("window", "height", Some(self.window_height.to_string()));
        config.set("window", "target_fps", Some(self.target_fps.to_string()));
        config.set("window", "vsync", Some(self.vsync.to_string()));
        config.set("window", "fullscreen", Some(self.fullscreen.to_string()));

        // [render] section
        config.set(
            "render",
            "pixels_per_unit",
            Some(self.pixels_per_unit.to_string()),
        );

        // [physics] section
        let p = &self.physics;
        config.set("physics", "gravity_y", Some(p.gravity_y.to_string()));
        config.set("physics", "step_rate", Some(p.step_rate.to_string()));
        config.set("physics", "max_frame_time", Some(p.max_frame_time.to_string()));
        config.set(
            "physics",
            "velocity_iterations",
            Some(p.velocity_iterations.to_string()),
        );
        config.set(
            "physics",
            "position_iterations",
            Some(p.position_iterations.to_string()),
        );
        config.set("physics", "accumulator", Some(p.accumulator.to_string()));

        // [player] section
        let t = &self.player;
        for (key, value) in [
            ("min_walk_speed_sq", t.min_walk_speed_sq),
            ("stand_friction", t.stand_friction),
            ("walk_friction", t.walk_friction),
            ("walk_speed", t.walk_speed),
            ("jump_speed", t.jump_speed),
            ("air_speed_cap", t.air_speed_cap),
            ("air_acceleration", t.air_acceleration),
        ] {
            config.set("player", key, Some(value.to_string()));
        }

        // [camera] section
        let c = &self.camera;
        for (key, value) in [
            ("follow_speed", c.follow_speed),
            ("min_speed", c.min_speed),
            ("max_speed", c.max_speed),
            ("min_zoom", c.min_zoom),
        ] {
            config.set("camera", key, Some(value.to_string()));
        }

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// Get the window size.
    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }
}
