//! Particle state and the fixed-size pool

use crate::curves::{fade_factor, FADE_IN_END};
use haze_core::Extent;

/// Particles fainter than this are culled and never drawn
pub const MIN_VISIBLE_OPACITY: f32 = 0.01;
/// Extra room around the surface before a particle counts as off-screen
pub const OFFSCREEN_MARGIN: f32 = 200.0;

/// One smoke sprite
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    /// Side length of the drawn square
    pub size: f32,
    pub rotation: f32,
    /// Radians added to `rotation` every tick
    pub rotation_speed: f32,
    pub speed_x: f32,
    pub speed_y: f32,
    pub total_duration_ms: f32,
    pub elapsed_ms: f32,
    pub initial_opacity: f32,
    pub current_opacity: f32,
    pub alive: bool,
}

impl Particle {
    pub fn dead() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            size: 0.0,
            rotation: 0.0,
            rotation_speed: 0.0,
            speed_x: 0.0,
            speed_y: 0.0,
            total_duration_ms: 0.0,
            elapsed_ms: 0.0,
            initial_opacity: 0.0,
            current_opacity: 0.0,
            alive: false,
        }
    }

    /// Normalized age in [0, 1]
    pub fn life_progress(&self) -> f32 {
        if self.total_duration_ms <= 0.0 {
            1.0
        } else {
            (self.elapsed_ms / self.total_duration_ms).clamp(0.0, 1.0)
        }
    }

    /// Advance by `dt_ms`, recompute opacity, and decide whether the particle survives.
    ///
    /// The faint-opacity cull is skipped while fading in: a fresh particle starts
    /// at zero opacity and would otherwise be culled before it ever shows.
    pub fn update(&mut self, dt_ms: f32, extent: Extent, fade_in_out: bool) {
        if !self.alive {
            return;
        }

        self.elapsed_ms += dt_ms;
        self.rotation += self.rotation_speed;
        self.x += self.speed_x;
        self.y += self.speed_y;

        let progress = self.life_progress();
        self.current_opacity = if fade_in_out {
            self.initial_opacity * fade_factor(progress)
        } else {
            self.initial_opacity
        };

        let expired = self.elapsed_ms >= self.total_duration_ms;
        let faded = self.current_opacity <= MIN_VISIBLE_OPACITY
            && !(fade_in_out && progress < FADE_IN_END);
        if expired || faded || self.is_offscreen(extent) {
            self.alive = false;
        }
    }

    /// Bounding square fully outside the surface plus margin.
    /// Uses `size` as the reach in every direction and ignores rotation.
    pub fn is_offscreen(&self, extent: Extent) -> bool {
        self.x + self.size < -OFFSCREEN_MARGIN
            || self.x - self.size > extent.width + OFFSCREEN_MARGIN
            || self.y + self.size < -OFFSCREEN_MARGIN
            || self.y - self.size > extent.height + OFFSCREEN_MARGIN
    }

    pub fn is_visible(&self) -> bool {
        self.alive && self.current_opacity > MIN_VISIBLE_OPACITY
    }
}

/// Fixed-capacity pool. Particles are recycled in place; the length never changes.
pub struct ParticlePool {
    particles: Vec<Particle>,
}

impl ParticlePool {
    pub fn new(capacity: usize) -> Self {
        let mut particles = Vec::with_capacity(capacity);
        for _ in 0..capacity {
            particles.push(Particle::dead());
        }
        Self { particles }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn alive_count(&self) -> usize {
        self.particles.iter().filter(|p| p.alive).count()
    }

    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    pub fn as_mut_slice(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.particles.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Particle> {
        self.particles.iter_mut()
    }
}
