//! Spawn distributions: where a particle appears, how it moves, how long it lives

use crate::config::{Direction, Origin, SimulatorConfig};
use crate::particle::Particle;
use crate::rand::RandomSource;
use haze_core::Extent;
use std::f32::consts::TAU;

/// Starting position for `origin` on a surface of `extent`
pub fn spawn_position(origin: Origin, extent: Extent, rng: &mut impl RandomSource) -> (f32, f32) {
    let (w, h) = (extent.width, extent.height);
    match origin {
        Origin::Left => (-w * 0.8, rng.range(-h / 2.0, h / 2.0)),
        Origin::Right => (w * 0.8, rng.range(-h / 2.0, h / 2.0)),
        Origin::Top => (rng.range(-w / 2.0, w / 2.0), -h * 0.8),
        Origin::Bottom => (rng.range(-w / 2.0, w / 2.0), h * 0.8),
        Origin::Center => (rng.range(-w * 0.2, w * 0.2), rng.range(-h * 0.2, h * 0.2)),
        Origin::Random => (rng.range(-w, 0.0), rng.range(-h / 2.0, h / 2.0)),
    }
}

/// Per-tick displacement for `direction`, scaled by `intensity`
pub fn spawn_velocity(
    direction: Direction,
    intensity: f32,
    rng: &mut impl RandomSource,
) -> (f32, f32) {
    let base = 0.5 * intensity;
    match direction {
        Direction::Right => (along(base, rng), across(base, rng)),
        Direction::Left => (-along(base, rng), across(base, rng)),
        Direction::Top => {
            let sy = -along(base, rng);
            (across(base, rng), sy)
        }
        Direction::Bottom => {
            let sy = along(base, rng);
            (across(base, rng), sy)
        }
        Direction::Random => (
            rng.range(-0.5 * base, 0.5 * base),
            rng.range(-0.5 * base, 0.5 * base),
        ),
    }
}

/// Main-axis speed: 0.5..1.5 × base
fn along(base: f32, rng: &mut impl RandomSource) -> f32 {
    rng.range(0.5 * base, 1.5 * base)
}

/// Cross-axis drift: ±0.25 × base
fn across(base: f32, rng: &mut impl RandomSource) -> f32 {
    rng.range(-0.25 * base, 0.25 * base)
}

/// Reset `particle` in place with fresh attributes drawn from `config`
pub fn respawn(
    particle: &mut Particle,
    extent: Extent,
    config: &SimulatorConfig,
    rng: &mut impl RandomSource,
) {
    let (x, y) = spawn_position(config.origin, extent, rng);
    let (speed_x, speed_y) = spawn_velocity(config.direction, config.movement_intensity, rng);
    let initial_opacity = rng.range(config.min_opacity, config.max_opacity);

    particle.x = x;
    particle.y = y;
    particle.size = rng.range(config.min_size, config.max_size);
    particle.rotation = rng.range(0.0, TAU);
    particle.rotation_speed = rng.range(0.0, config.rotation_speed);
    particle.speed_x = speed_x;
    particle.speed_y = speed_y;
    particle.total_duration_ms = rng.range(config.min_duration_ms, config.max_duration_ms);
    particle.elapsed_ms = 0.0;
    particle.initial_opacity = initial_opacity;
    particle.current_opacity = if config.fade_in_out {
        0.0
    } else {
        initial_opacity
    };
    particle.alive = true;
}
