//! Simulator configuration (parsed from TOML) and its enums

use haze_core::{Color, HazeError, Result};
use serde::Serialize;
use std::path::Path;

/// Upper bound on the pool size accepted by `validate`
pub const MAX_PARTICLES: usize = 10_000;

/// Direction particles drift in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
    Top,
    Bottom,
    Random,
}

impl Direction {
    pub const NAMES: [&'static str; 5] = ["left", "right", "top", "bottom", "random"];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            "top" => Some(Self::Top),
            "bottom" => Some(Self::Bottom),
            "random" => Some(Self::Random),
            _ => None,
        }
    }
}

/// Region of the surface where particles (re)appear
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Left,
    Right,
    Top,
    Bottom,
    Center,
    Random,
}

impl Origin {
    pub const NAMES: [&'static str; 6] = ["left", "right", "top", "bottom", "center", "random"];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            "top" => Some(Self::Top),
            "bottom" => Some(Self::Bottom),
            "center" => Some(Self::Center),
            "random" => Some(Self::Random),
            _ => None,
        }
    }
}

/// Configuration for one `SmokeSimulator`. Immutable once the simulator exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulatorConfig {
    pub num_particles: usize,
    pub min_size: f32,
    pub max_size: f32,
    pub min_opacity: f32,
    pub max_opacity: f32,
    pub min_duration_ms: f32,
    pub max_duration_ms: f32,
    /// Upper bound of the per-tick rotation increment, radians
    pub rotation_speed: f32,
    pub fps: f32,
    pub direction: Direction,
    pub origin: Origin,
    pub movement_intensity: f32,
    pub fade_in_out: bool,
    /// Color composited over each sprite's opaque pixels
    pub tint: Color,
    pub canvas_opacity_percent: f32,
    pub enable_animation: bool,
    /// Animate even when the platform prefers reduced motion
    pub force_animation: bool,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            num_particles: 20,
            min_size: 500.0,
            max_size: 3000.0,
            min_opacity: 0.1,
            max_opacity: 0.8,
            min_duration_ms: 10_000.0,
            max_duration_ms: 20_000.0,
            rotation_speed: 0.002,
            fps: 24.0,
            direction: Direction::Right,
            origin: Origin::Random,
            movement_intensity: 1.0,
            fade_in_out: true,
            tint: Color::from_hex(0x330B0B),
            canvas_opacity_percent: 100.0,
            enable_animation: true,
            force_animation: false,
        }
    }
}

impl SimulatorConfig {
    /// Parse a SimulatorConfig from a TOML table. Missing or mistyped keys keep their defaults.
    pub fn from_toml(table: &toml::value::Table) -> Self {
        let mut config = Self::default();

        if let Some(v) = table.get("num_particles") {
            config.num_particles = v.as_integer().unwrap_or(20).max(0) as usize;
        }
        if let Some(v) = table.get("min_size") {
            config.min_size = toml_f32(v, config.min_size);
        }
        if let Some(v) = table.get("max_size") {
            config.max_size = toml_f32(v, config.max_size);
        }
        if let Some(v) = table.get("min_opacity") {
            config.min_opacity = toml_f32(v, config.min_opacity);
        }
        if let Some(v) = table.get("max_opacity") {
            config.max_opacity = toml_f32(v, config.max_opacity);
        }
        if let Some(v) = table.get("min_duration_ms") {
            config.min_duration_ms = toml_f32(v, config.min_duration_ms);
        }
        if let Some(v) = table.get("max_duration_ms") {
            config.max_duration_ms = toml_f32(v, config.max_duration_ms);
        }
        if let Some(v) = table.get("rotation_speed") {
            config.rotation_speed = toml_f32(v, config.rotation_speed);
        }
        if let Some(v) = table.get("fps") {
            config.fps = toml_f32(v, config.fps);
        }
        if let Some(v) = table.get("direction").and_then(|v| v.as_str()) {
            config.direction = Direction::parse(v).unwrap_or_else(|| {
                log::warn!("{}; falling back to random", unknown_value(v, &Direction::NAMES));
                Direction::Random
            });
        }
        if let Some(v) = table.get("origin").and_then(|v| v.as_str()) {
            config.origin = Origin::parse(v).unwrap_or_else(|| {
                log::warn!("{}; falling back to random", unknown_value(v, &Origin::NAMES));
                Origin::Random
            });
        }
        if let Some(v) = table.get("movement_intensity") {
            config.movement_intensity = toml_f32(v, config.movement_intensity);
        }
        if let Some(v) = table.get("fade_in_out") {
            config.fade_in_out = v.as_bool().unwrap_or(true);
        }
        if let Some(v) = table.get("tint").and_then(|v| v.as_str()) {
            match Color::parse_hex(v) {
                Ok(c) => config.tint = c,
                Err(e) => log::warn!("{e}; keeping tint {}", config.tint),
            }
        }
        if let Some(v) = table.get("canvas_opacity_percent") {
            config.canvas_opacity_percent = toml_f32(v, config.canvas_opacity_percent);
        }
        if let Some(v) = table.get("enable_animation") {
            config.enable_animation = v.as_bool().unwrap_or(true);
        }
        if let Some(v) = table.get("force_animation") {
            config.force_animation = v.as_bool().unwrap_or(false);
        }

        config
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let table: toml::value::Table = toml::from_str(source)?;
        let config = Self::from_toml(&table);
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Canvas opacity as a [0, 1] multiplier
    pub fn canvas_opacity(&self) -> f32 {
        (self.canvas_opacity_percent / 100.0).clamp(0.0, 1.0)
    }

    /// Check every range; the first violation is reported
    pub fn validate(&self) -> Result<()> {
        check_range("num_particles", self.num_particles as f64, 1.0, MAX_PARTICLES as f64)?;
        check_range("min_size", self.min_size as f64, f64::MIN_POSITIVE, f64::MAX)?;
        check_range("max_size", self.max_size as f64, self.min_size as f64, f64::MAX)?;
        check_range("min_opacity", self.min_opacity as f64, 0.0, 1.0)?;
        check_range("max_opacity", self.max_opacity as f64, self.min_opacity as f64, 1.0)?;
        check_range("min_duration_ms", self.min_duration_ms as f64, f64::MIN_POSITIVE, f64::MAX)?;
        check_range(
            "max_duration_ms",
            self.max_duration_ms as f64,
            self.min_duration_ms as f64,
            f64::MAX,
        )?;
        check_range("rotation_speed", self.rotation_speed as f64, 0.0, f64::MAX)?;
        check_range("fps", self.fps as f64, f64::MIN_POSITIVE, f64::MAX)?;
        check_range("movement_intensity", self.movement_intensity as f64, 0.0, f64::MAX)?;
        check_range("canvas_opacity_percent", self.canvas_opacity_percent as f64, 0.0, 100.0)?;
        Ok(())
    }
}

fn check_range(field: &str, value: f64, min: f64, max: f64) -> Result<()> {
    // NaN fails both comparisons, so it is rejected too
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(HazeError::ValueOutOfRange {
            field: field.to_string(),
            min,
            max,
            value,
        })
    }
}

fn unknown_value(value: &str, allowed: &[&str]) -> HazeError {
    HazeError::InvalidEnumValue {
        value: value.to_string(),
        allowed: allowed.iter().map(|s| s.to_string()).collect(),
    }
}

// ── TOML helpers (handle integer/float coercion) ──

fn toml_f32(v: &toml::Value, default: f32) -> f32 {
    v.as_float()
        .map(|f| f as f32)
        .or_else(|| v.as_integer().map(|i| i as f32))
        .unwrap_or(default)
}
