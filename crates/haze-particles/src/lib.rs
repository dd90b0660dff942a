//! Haze Particles - pooled smoke background simulation
//!
//! Provides a fixed-size particle field with:
//! - Kinematic drift, rotation and a fade-in/hold/fade-out opacity envelope
//! - In-place recycling: the pool never grows or shrinks
//! - Origin and direction spawn distributions from `SimulatorConfig`
//! - Drawing through an abstract `Surface`, with a source-atop tint pass
//! - FPS-capped ticking driven by an injected frame scheduler

pub mod config;
pub mod curves;
pub mod particle;
pub mod rand;
pub mod simulator;
pub mod spawn;
pub mod surface;

pub use config::{Direction, Origin, SimulatorConfig};
pub use particle::{Particle, ParticlePool};
pub use rand::{ParticleRng, RandomSource};
pub use simulator::{SimulatorState, SmokeSimulator};
pub use spawn::respawn;
pub use surface::{CompositeMode, DrawCommand, RecordingSurface, Surface};
