//! Headless host: drives a simulator with a hand-advanced clock

use anyhow::{bail, Context, Result};
use haze_core::Extent;
use haze_particles::{ParticleRng, SimulatorConfig, SmokeSimulator, Surface};
use haze_runtime::{ManualHost, Viewport};

/// A resize delivered once the simulator has run `at_tick` ticks
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResizeAt {
    pub viewport: Viewport,
    pub at_tick: u64,
}

/// Parse `WIDTHxHEIGHT@TICK`, e.g. `800x600@12`
pub fn parse_resize(s: &str) -> Result<ResizeAt, String> {
    let (size, tick) = s
        .split_once('@')
        .ok_or_else(|| format!("expected WIDTHxHEIGHT@TICK, got '{}'", s))?;
    let (w, h) = size
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", size))?;
    let width: u32 = w.trim().parse().map_err(|e| format!("invalid width: {}", e))?;
    let height: u32 = h.trim().parse().map_err(|e| format!("invalid height: {}", e))?;
    let at_tick: u64 = tick.trim().parse().map_err(|e| format!("invalid tick: {}", e))?;
    if width == 0 || height == 0 {
        return Err("resize dimensions must be non-zero".to_string());
    }
    Ok(ResizeAt {
        viewport: Viewport::new(width as f32, height as f32),
        at_tick,
    })
}

/// What one driver callback did
#[derive(Clone, Copy, Debug)]
pub struct Step {
    /// Driver callbacks fired so far, including this one
    pub callback: u64,
    pub time_ms: f64,
    /// Whether this callback advanced the simulation
    pub ticked: bool,
    /// Whether a resize was delivered just before this callback
    pub resized: bool,
}

pub struct HeadlessDriver<S: Surface> {
    host: ManualHost,
    sim: SmokeSimulator<S>,
    frame_ms: f64,
    callbacks: u64,
}

impl<S: Surface> HeadlessDriver<S> {
    /// Build a simulator for `viewport` on `surface`. The surface should already
    /// have the viewport's overscanned extent.
    pub fn new(
        config: SimulatorConfig,
        surface: S,
        seed: Option<u32>,
        driver_hz: f64,
        reduced_motion: bool,
    ) -> Result<Self> {
        if !driver_hz.is_finite() || driver_hz <= 0.0 {
            bail!("Driver rate must be positive, got {}", driver_hz);
        }
        let host = ManualHost::new();
        let rng = match seed {
            Some(seed) => ParticleRng::new(seed),
            None => ParticleRng::from_entropy(),
        };
        let sim = SmokeSimulator::with_rng(
            config,
            host.services(reduced_motion),
            Some(surface),
            rng,
        );
        Ok(Self {
            host,
            sim,
            frame_ms: 1000.0 / driver_hz,
            callbacks: 0,
        })
    }

    pub fn simulator(&self) -> &SmokeSimulator<S> {
        &self.sim
    }

    pub fn simulator_mut(&mut self) -> &mut SmokeSimulator<S> {
        &mut self.sim
    }

    /// Report the sprite load to the simulator
    pub fn start(&mut self, image: S::Image) {
        self.sim.on_image_loaded(Some(image));
    }

    /// Fire driver callbacks until `ticks` simulation steps have run or no
    /// frame is pending. `observe` sees the simulator after every callback.
    pub fn run(
        &mut self,
        ticks: u64,
        resize: Option<ResizeAt>,
        mut observe: impl FnMut(&mut SmokeSimulator<S>, Step),
    ) -> Result<()> {
        let mut resize = resize;
        while self.sim.ticks() < ticks {
            let mut resized = false;
            if let Some(r) = resize.filter(|r| self.sim.ticks() >= r.at_tick) {
                self.deliver_resize(r.viewport)?;
                resize = None;
                resized = true;
            }

            let pending = self.host.scheduler.take_pending();
            if pending.is_empty() {
                log::debug!("no frame pending after {} ticks; stopping", self.sim.ticks());
                break;
            }

            self.host.clock.advance(self.frame_ms);
            self.callbacks += 1;
            let before = self.sim.ticks();
            for handle in pending {
                self.sim.on_frame(handle);
            }
            let step = Step {
                callback: self.callbacks,
                time_ms: self.callbacks as f64 * self.frame_ms,
                ticked: self.sim.ticks() > before,
                resized,
            };
            observe(&mut self.sim, step);
        }
        Ok(())
    }

    /// Deliver a resize the way a host would: only while subscribed
    fn deliver_resize(&mut self, viewport: Viewport) -> Result<()> {
        let listener = self
            .sim
            .resize_listener()
            .context("Simulator is not listening for resizes")?;
        if !self.host.viewport.is_subscribed(listener) {
            bail!("Resize listener {:?} is not registered", listener);
        }
        let extent: Extent = viewport.surface_extent();
        self.sim.handle_resize(extent);
        Ok(())
    }

    /// Stop the simulator and return its surface
    pub fn finish(self) -> Option<S> {
        self.sim.into_surface()
    }
}
