//! Headless simulation trace command

use crate::headless::{HeadlessDriver, ResizeAt};
use anyhow::{Context, Result};
use haze_particles::{Particle, RecordingSurface, SimulatorState, SmokeSimulator};
use haze_runtime::Viewport;
use serde::Serialize;

pub struct SimulateArgs {
    pub config: Option<String>,
    pub width: u32,
    pub height: u32,
    pub frames: u64,
    pub driver_hz: f64,
    pub seed: Option<u32>,
    pub resize: Option<ResizeAt>,
    pub reduced_motion: bool,
    pub json: bool,
}

/// Per-tick statistics
#[derive(Debug, Serialize)]
struct TickStats {
    tick: u64,
    time_ms: f64,
    alive: usize,
    visible: usize,
    respawned: usize,
    draws: usize,
    mean_opacity: f32,
    resized: bool,
}

pub fn run(args: SimulateArgs) -> Result<()> {
    let config = super::load_config(args.config.as_deref())?;
    let viewport = Viewport::new(args.width as f32, args.height as f32);
    let surface = RecordingSurface::new(viewport.surface_extent());
    let mut driver = HeadlessDriver::new(
        config,
        surface,
        args.seed,
        args.driver_hz,
        args.reduced_motion,
    )?;
    driver.start(());

    let mut ages: Vec<f32> = elapsed(driver.simulator().particles());
    let mut rows = Vec::new();

    if driver.simulator().state() != SimulatorState::Running {
        // Still image: one pass, no frames scheduled
        let sim = driver.simulator_mut();
        rows.push(stats(sim, 0.0, 0, false));
    }

    driver.run(args.frames, args.resize, |sim, step| {
        if !step.ticked {
            return;
        }
        let current = elapsed(sim.particles());
        // Recycled particles restart their life
        let respawned = ages
            .iter()
            .zip(&current)
            .filter(|(before, now)| now < before)
            .count();
        ages = current;
        rows.push(stats(sim, step.time_ms, respawned, step.resized));
    })?;

    if args.json {
        let out = serde_json::to_string_pretty(&rows).context("Failed to serialize stats")?;
        println!("{}", out);
    } else {
        println!(
            "{:>6} {:>10} {:>6} {:>8} {:>9} {:>6} {:>8}",
            "tick", "time_ms", "alive", "visible", "respawned", "draws", "opacity"
        );
        for row in &rows {
            println!(
                "{:>6} {:>10.1} {:>6} {:>8} {:>9} {:>6} {:>8.3}{}",
                row.tick,
                row.time_ms,
                row.alive,
                row.visible,
                row.respawned,
                row.draws,
                row.mean_opacity,
                if row.resized { "  (resized)" } else { "" }
            );
        }
        println!(
            "{} ticks, final state {:?}",
            driver.simulator().ticks(),
            driver.simulator().state()
        );
    }

    Ok(())
}

fn elapsed(particles: &[Particle]) -> Vec<f32> {
    particles.iter().map(|p| p.elapsed_ms).collect()
}

fn stats(
    sim: &mut SmokeSimulator<RecordingSurface>,
    time_ms: f64,
    respawned: usize,
    resized: bool,
) -> TickStats {
    let draws = sim.surface_mut().map_or(0, |s| {
        let n = s.image_draws();
        s.take_commands();
        n
    });
    let particles = sim.particles();
    let alive = particles.iter().filter(|p| p.alive).count();
    let visible = particles.iter().filter(|p| p.is_visible()).count();
    let mean_opacity = if particles.is_empty() {
        0.0
    } else {
        particles.iter().map(|p| p.current_opacity).sum::<f32>() / particles.len() as f32
    };
    TickStats {
        tick: sim.ticks(),
        time_ms,
        alive,
        visible,
        respawned,
        draws,
        mean_opacity,
        resized,
    }
}
