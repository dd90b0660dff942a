//! The smoke field simulator: pool ownership, frame gating, lifecycle

use crate::config::SimulatorConfig;
use crate::curves::FADE_IN_END;
use crate::particle::{Particle, ParticlePool};
use crate::rand::{ParticleRng, RandomSource};
use crate::spawn::{respawn, spawn_position};
use crate::surface::{CompositeMode, Surface};
use haze_core::{Color, Extent};
use haze_runtime::{FrameHandle, FrameLimiter, HostServices, ListenerId};

/// Lifecycle of a `SmokeSimulator`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulatorState {
    /// Waiting for the sprite, or inert because the sprite or surface never arrived
    Uninitialized,
    /// Pool allocated, not ticking (static draw)
    Initialized,
    /// A frame is scheduled
    Running,
    /// Resize in progress; no frame scheduled
    Paused,
    /// Frame cancelled and listener removed. Terminal.
    Disposed,
}

/// Animated smoke background.
///
/// The host builds it, reports the sprite load with `on_image_loaded`, then
/// calls `on_frame` for each frame it was asked to schedule and
/// `handle_resize` while the resize subscription is active.
pub struct SmokeSimulator<S: Surface, R: RandomSource = ParticleRng> {
    config: SimulatorConfig,
    services: HostServices,
    surface: Option<S>,
    image: Option<S::Image>,
    pool: ParticlePool,
    rng: R,
    limiter: FrameLimiter,
    pending_frame: Option<FrameHandle>,
    resize_listener: Option<ListenerId>,
    state: SimulatorState,
    ticks: u64,
}

impl<S: Surface> SmokeSimulator<S, ParticleRng> {
    pub fn new(config: SimulatorConfig, services: HostServices, surface: Option<S>) -> Self {
        Self::with_rng(config, services, surface, ParticleRng::from_entropy())
    }
}

impl<S: Surface, R: RandomSource> SmokeSimulator<S, R> {
    pub fn with_rng(
        config: SimulatorConfig,
        services: HostServices,
        surface: Option<S>,
        rng: R,
    ) -> Self {
        let limiter = FrameLimiter::new(config.fps as f64);
        Self {
            config,
            services,
            surface,
            image: None,
            pool: ParticlePool::new(0),
            rng,
            limiter,
            pending_frame: None,
            resize_listener: None,
            state: SimulatorState::Uninitialized,
            ticks: 0,
        }
    }

    pub fn state(&self) -> SimulatorState {
        self.state
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// The pool, in draw order. Empty until the sprite has loaded.
    pub fn particles(&self) -> &[Particle] {
        self.pool.as_slice()
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    /// Dispose and hand the surface back to the host
    pub fn into_surface(mut self) -> Option<S> {
        self.dispose();
        self.surface.take()
    }

    /// Simulation steps executed so far (throttled frames, not driver callbacks)
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending_frame
    }

    pub fn resize_listener(&self) -> Option<ListenerId> {
        self.resize_listener
    }

    fn should_animate(&self) -> bool {
        self.config.enable_animation
            && (!self.services.reduced_motion || self.config.force_animation)
    }

    /// Sprite load completion. `None` means the load failed; the simulator then
    /// stays inert for good. Ticking starts only from here.
    pub fn on_image_loaded(&mut self, image: Option<S::Image>) {
        if self.state != SimulatorState::Uninitialized || self.image.is_some() {
            log::debug!("sprite load reported in state {:?}; ignoring", self.state);
            return;
        }
        let Some(image) = image else {
            log::debug!("sprite failed to load; smoke stays inert");
            return;
        };
        let Some(surface) = self.surface.as_mut() else {
            log::debug!("no drawing surface; smoke stays inert");
            return;
        };

        let extent = surface.extent();
        surface.set_opacity(self.config.canvas_opacity());
        self.image = Some(image);

        self.pool = ParticlePool::new(self.config.num_particles);
        for p in self.pool.iter_mut() {
            respawn(p, extent, &self.config, &mut self.rng);
        }
        self.resize_listener = Some(self.services.viewport.subscribe_resize());
        self.state = SimulatorState::Initialized;
        log::debug!(
            "smoke pool of {} allocated on {}x{}",
            self.pool.len(),
            extent.width,
            extent.height
        );

        if self.should_animate() {
            self.limiter.reset(self.services.clock.now_ms());
            self.state = SimulatorState::Running;
            self.schedule_frame();
        } else {
            log::debug!("animation disabled or reduced motion requested; drawing once");
            self.static_pass();
        }
    }

    /// Scheduled frame callback. Ignored unless `handle` is the frame this
    /// simulator is currently waiting for and it is still running.
    pub fn on_frame(&mut self, handle: FrameHandle) {
        if self.state != SimulatorState::Running || self.pending_frame != Some(handle) {
            log::debug!("stale frame {:?} in state {:?}", handle, self.state);
            return;
        }
        self.pending_frame = None;
        self.schedule_frame();

        let now = self.services.clock.now_ms();
        if let Some(dt) = self.limiter.poll(now) {
            self.tick(dt as f32);
        }
    }

    /// Surface resize. Positions are re-drawn from the origin distribution for
    /// the new size; velocity and lifetime are kept. One frame is redrawn
    /// without advancing the simulation.
    pub fn handle_resize(&mut self, extent: Extent) {
        match self.state {
            SimulatorState::Uninitialized | SimulatorState::Disposed => {
                log::debug!("resize in state {:?}; ignoring", self.state);
                return;
            }
            _ => {}
        }

        let resume = self.state == SimulatorState::Running;
        if let Some(handle) = self.pending_frame.take() {
            self.services.scheduler.cancel_frame(handle);
        }
        if resume {
            self.state = SimulatorState::Paused;
        }

        if let Some(surface) = self.surface.as_mut() {
            surface.resize(extent);
        }
        for p in self.pool.iter_mut() {
            let (x, y) = spawn_position(self.config.origin, extent, &mut self.rng);
            p.x = x;
            p.y = y;
        }
        self.draw_frame();

        if resume {
            self.state = SimulatorState::Running;
            self.schedule_frame();
        }
    }

    /// Cancel the pending frame and drop the resize subscription. Safe to call repeatedly.
    pub fn dispose(&mut self) {
        if self.state == SimulatorState::Disposed {
            return;
        }
        if let Some(handle) = self.pending_frame.take() {
            self.services.scheduler.cancel_frame(handle);
        }
        if let Some(id) = self.resize_listener.take() {
            self.services.viewport.unsubscribe_resize(id);
        }
        self.state = SimulatorState::Disposed;
        log::debug!("smoke disposed after {} ticks", self.ticks);
    }

    fn schedule_frame(&mut self) {
        self.pending_frame = Some(self.services.scheduler.request_frame());
    }

    /// One still frame. Fading particles are shown at the start of their hold
    /// phase, since a frame at age zero would be fully transparent.
    fn static_pass(&mut self) {
        if self.config.fade_in_out {
            for p in self.pool.iter_mut() {
                p.elapsed_ms = p.total_duration_ms * FADE_IN_END;
            }
        }
        self.tick(0.0);
    }

    /// Advance every particle by `dt_ms`, recycle the dead in place, draw.
    fn tick(&mut self, dt_ms: f32) {
        let (Some(surface), Some(image)) = (self.surface.as_mut(), self.image.as_ref()) else {
            return;
        };
        let extent = surface.extent();
        surface.clear_rect(0.0, 0.0, extent.width, extent.height);

        for p in self.pool.iter_mut() {
            p.update(dt_ms, extent, self.config.fade_in_out);
            if !p.alive {
                respawn(p, extent, &self.config, &mut self.rng);
            }
            if p.is_visible() {
                draw_particle(surface, image, p, self.config.tint);
            }
        }
        self.ticks += 1;
    }

    /// Redraw the current state without advancing it
    fn draw_frame(&mut self) {
        let (Some(surface), Some(image)) = (self.surface.as_mut(), self.image.as_ref()) else {
            return;
        };
        let extent = surface.extent();
        surface.clear_rect(0.0, 0.0, extent.width, extent.height);
        for p in self.pool.iter().filter(|p| p.is_visible()) {
            draw_particle(surface, image, p, self.config.tint);
        }
    }
}

impl<S: Surface, R: RandomSource> Drop for SmokeSimulator<S, R> {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Sprite rotated about its centre, then tinted on its opaque pixels only
fn draw_particle<S: Surface>(surface: &mut S, image: &S::Image, p: &Particle, tint: Color) {
    let half = p.size / 2.0;
    surface.save();
    surface.translate(p.x + half, p.y + half);
    surface.rotate(p.rotation);
    surface.set_global_alpha(p.current_opacity);
    surface.draw_image(image, -half, -half, p.size, p.size);
    surface.set_composite_mode(CompositeMode::SourceAtop);
    surface.fill_rect(-half, -half, p.size, p.size, tint);
    surface.restore();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Origin;
    use crate::surface::{DrawCommand, RecordingSurface};
    use haze_runtime::ManualHost;

    const SURFACE: Extent = Extent::new(800.0, 600.0);

    fn build(
        config: SimulatorConfig,
        reduced_motion: bool,
    ) -> (SmokeSimulator<RecordingSurface>, ManualHost) {
        let host = ManualHost::new();
        let sim = SmokeSimulator::with_rng(
            config,
            host.services(reduced_motion),
            Some(RecordingSurface::new(SURFACE)),
            ParticleRng::new(42),
        );
        (sim, host)
    }

    fn running(config: SimulatorConfig) -> (SmokeSimulator<RecordingSurface>, ManualHost) {
        let (mut sim, host) = build(config, false);
        sim.on_image_loaded(Some(()));
        (sim, host)
    }

    /// Advance the clock by `ms` and deliver every pending frame
    fn drive(sim: &mut SmokeSimulator<RecordingSurface>, host: &ManualHost, ms: f64) {
        host.clock.advance(ms);
        for handle in host.scheduler.take_pending() {
            sim.on_frame(handle);
        }
    }

    #[test]
    fn load_allocates_pool_and_starts() {
        let (sim, host) = running(SimulatorConfig::default());
        assert_eq!(sim.state(), SimulatorState::Running);
        assert_eq!(sim.particles().len(), 20);
        assert!(sim.particles().iter().all(|p| p.alive));
        assert_eq!(host.scheduler.pending_count(), 1);
        assert_eq!(host.viewport.listeners().len(), 1);
        assert_eq!(sim.surface().unwrap().opacity(), 1.0);
    }

    #[test]
    fn canvas_opacity_applied_to_surface() {
        let config = SimulatorConfig {
            canvas_opacity_percent: 40.0,
            ..Default::default()
        };
        let (sim, _host) = running(config);
        assert!((sim.surface().unwrap().opacity() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn failed_image_load_stays_inert() {
        let (mut sim, host) = build(SimulatorConfig::default(), false);
        sim.on_image_loaded(None);
        assert_eq!(sim.state(), SimulatorState::Uninitialized);
        assert!(sim.particles().is_empty());
        assert_eq!(host.scheduler.pending_count(), 0);
        assert!(host.viewport.listeners().is_empty());
    }

    #[test]
    fn missing_surface_stays_inert() {
        let host = ManualHost::new();
        let mut sim: SmokeSimulator<RecordingSurface> = SmokeSimulator::with_rng(
            SimulatorConfig::default(),
            host.services(false),
            None,
            ParticleRng::new(1),
        );
        sim.on_image_loaded(Some(()));
        assert_eq!(sim.state(), SimulatorState::Uninitialized);
        assert_eq!(host.scheduler.pending_count(), 0);
    }

    #[test]
    fn pool_size_never_changes() {
        let config = SimulatorConfig {
            num_particles: 12,
            min_duration_ms: 100.0,
            max_duration_ms: 300.0,
            ..Default::default()
        };
        let (mut sim, host) = running(config);
        for _ in 0..2000 {
            drive(&mut sim, &host, 16.0);
            assert_eq!(sim.particles().len(), 12);
            for p in sim.particles() {
                assert!(p.current_opacity >= 0.0);
                assert!(p.current_opacity <= p.initial_opacity + 1e-6);
                assert!((0.1..=0.8).contains(&p.initial_opacity));
            }
        }
        assert!(sim.ticks() > 0);
    }

    #[test]
    fn driver_faster_than_fps_is_throttled() {
        let (mut sim, host) = running(SimulatorConfig::default());
        let mut tick_times = Vec::new();
        let mut now = 0.0;
        for _ in 0..62 {
            drive(&mut sim, &host, 16.0);
            now += 16.0;
            if sim.ticks() as usize > tick_times.len() {
                tick_times.push(now);
            }
        }
        // 992 ms at 24 fps is under 24 frame windows
        assert!(sim.ticks() <= 23, "ticked {} times", sim.ticks());
        assert!(sim.ticks() >= 20);
        for pair in tick_times.windows(2) {
            assert!(pair[1] - pair[0] >= 32.0);
        }
        // Every driver callback still re-arms exactly one frame
        assert_eq!(host.scheduler.pending_count(), 1);
    }

    #[test]
    fn expired_particle_is_reset_before_draw() {
        let (mut sim, _host) = running(SimulatorConfig::default());
        {
            let p = &mut sim.pool.as_mut_slice()[0];
            p.total_duration_ms = 10_000.0;
            p.elapsed_ms = 9_990.0;
            p.x = 0.0;
            p.y = 0.0;
        }
        sim.tick(10.0);
        let p = &sim.particles()[0];
        assert!(p.alive);
        assert_eq!(p.elapsed_ms, 0.0);
        assert_eq!(p.current_opacity, 0.0);
        assert_eq!(sim.particles().len(), 20);
    }

    #[test]
    fn fade_envelope_in_simulation() {
        let config = SimulatorConfig {
            origin: Origin::Center,
            ..Default::default()
        };
        let (mut sim, _host) = running(config);
        let reset = |sim: &mut SmokeSimulator<RecordingSurface>, elapsed: f32| {
            let p = &mut sim.pool.as_mut_slice()[0];
            p.total_duration_ms = 10_000.0;
            p.elapsed_ms = elapsed;
            p.initial_opacity = 0.5;
            p.speed_x = 0.0;
            p.speed_y = 0.0;
            p.x = 0.0;
            p.y = 0.0;
        };

        reset(&mut sim, 0.0);
        sim.tick(0.0);
        assert_eq!(sim.particles()[0].current_opacity, 0.0);

        reset(&mut sim, 1_990.0);
        sim.tick(10.0);
        assert!((sim.particles()[0].current_opacity - 0.5).abs() < 1e-5);

        reset(&mut sim, 4_990.0);
        sim.tick(10.0);
        assert!((sim.particles()[0].current_opacity - 0.5).abs() < 1e-5);

        reset(&mut sim, 8_990.0);
        sim.tick(10.0);
        assert!((sim.particles()[0].current_opacity - 0.25).abs() < 1e-3);
    }

    #[test]
    fn offscreen_particle_respawns_at_left_origin() {
        let config = SimulatorConfig {
            origin: Origin::Left,
            fade_in_out: false,
            ..Default::default()
        };
        let (mut sim, _host) = running(config);
        {
            let p = &mut sim.pool.as_mut_slice()[3];
            p.size = 500.0;
            p.x = -1_000.0;
            p.speed_x = 0.0;
            p.elapsed_ms = 1_000.0;
        }
        sim.tick(16.0);
        let p = &sim.particles()[3];
        assert!(p.alive);
        assert_eq!(p.x, -640.0);
        assert!((-300.0..=300.0).contains(&p.y));
        assert_eq!(p.elapsed_ms, 0.0);
    }

    #[test]
    fn resize_repositions_without_touching_velocity() {
        let config = SimulatorConfig {
            origin: Origin::Center,
            ..Default::default()
        };
        let (mut sim, host) = running(config);
        drive(&mut sim, &host, 50.0);
        let before: Vec<(f32, f32, f32)> = sim
            .particles()
            .iter()
            .map(|p| (p.speed_x, p.speed_y, p.total_duration_ms))
            .collect();
        let old_frame = sim.pending_frame().unwrap();

        sim.handle_resize(Extent::new(400.0, 300.0));

        assert_eq!(sim.state(), SimulatorState::Running);
        assert_eq!(sim.surface().unwrap().extent(), Extent::new(400.0, 300.0));
        for (p, (sx, sy, dur)) in sim.particles().iter().zip(before) {
            assert!((-80.0..=80.0).contains(&p.x), "x = {}", p.x);
            assert!((-60.0..=60.0).contains(&p.y), "y = {}", p.y);
            assert_eq!((p.speed_x, p.speed_y, p.total_duration_ms), (sx, sy, dur));
        }
        assert_eq!(host.scheduler.cancelled_count(), 1);
        let pending = host.scheduler.peek_pending();
        assert_eq!(pending.len(), 1);
        assert_ne!(pending[0], old_frame);
    }

    #[test]
    fn resize_redraws_once() {
        let (mut sim, _host) = running(SimulatorConfig::default());
        sim.surface.as_mut().unwrap().take_commands();
        sim.handle_resize(Extent::new(1024.0, 768.0));
        let surface = sim.surface().unwrap();
        assert_eq!(surface.clears(), 1);
        assert_eq!(
            surface.commands()[0],
            DrawCommand::Resize(Extent::new(1024.0, 768.0))
        );
    }

    #[test]
    fn resize_before_load_is_ignored() {
        let (mut sim, host) = build(SimulatorConfig::default(), false);
        sim.handle_resize(Extent::new(10.0, 10.0));
        assert_eq!(sim.state(), SimulatorState::Uninitialized);
        assert_eq!(sim.surface().unwrap().extent(), SURFACE);
        assert_eq!(host.scheduler.requested_count(), 0);
    }

    #[test]
    fn dispose_is_idempotent_and_blocks_pending_frame() {
        let (mut sim, host) = running(SimulatorConfig::default());
        let pending = host.scheduler.peek_pending()[0];
        sim.surface.as_mut().unwrap().take_commands();

        sim.dispose();
        sim.dispose();

        assert_eq!(sim.state(), SimulatorState::Disposed);
        assert_eq!(host.scheduler.pending_count(), 0);
        assert_eq!(host.scheduler.cancelled_count(), 1);
        assert!(host.viewport.listeners().is_empty());

        // The host fires the frame anyway
        host.clock.advance(1_000.0);
        sim.on_frame(pending);
        assert_eq!(sim.ticks(), 0);
        assert!(sim.surface().unwrap().commands().is_empty());
        assert_eq!(host.scheduler.pending_count(), 0);

        sim.handle_resize(Extent::new(10.0, 10.0));
        assert_eq!(sim.state(), SimulatorState::Disposed);
    }

    #[test]
    fn stale_handle_is_ignored() {
        let (mut sim, host) = running(SimulatorConfig::default());
        host.clock.advance(1_000.0);
        sim.on_frame(FrameHandle(9_999));
        assert_eq!(sim.ticks(), 0);
        assert_eq!(host.scheduler.pending_count(), 1);
    }

    #[test]
    fn drop_releases_host_resources() {
        let (sim, host) = running(SimulatorConfig::default());
        drop(sim);
        assert_eq!(host.scheduler.pending_count(), 0);
        assert!(host.viewport.listeners().is_empty());
    }

    #[test]
    fn reduced_motion_draws_once_without_scheduling() {
        let config = SimulatorConfig {
            origin: Origin::Center,
            ..Default::default()
        };
        let (mut sim, host) = build(config, true);
        sim.on_image_loaded(Some(()));

        assert_eq!(sim.state(), SimulatorState::Initialized);
        assert_eq!(host.scheduler.requested_count(), 0);
        let surface = sim.surface().unwrap();
        assert_eq!(surface.clears(), 1);
        assert_eq!(surface.image_draws(), 20);
    }

    #[test]
    fn force_animation_overrides_reduced_motion() {
        let config = SimulatorConfig {
            force_animation: true,
            ..Default::default()
        };
        let (mut sim, host) = build(config, true);
        sim.on_image_loaded(Some(()));
        assert_eq!(sim.state(), SimulatorState::Running);
        assert_eq!(host.scheduler.pending_count(), 1);
    }

    #[test]
    fn disabled_animation_is_static() {
        let config = SimulatorConfig {
            enable_animation: false,
            ..Default::default()
        };
        let (mut sim, host) = build(config, false);
        sim.on_image_loaded(Some(()));
        assert_eq!(sim.state(), SimulatorState::Initialized);
        assert_eq!(host.scheduler.pending_count(), 0);
    }

    #[test]
    fn particle_draw_sequence() {
        let config = SimulatorConfig {
            origin: Origin::Center,
            fade_in_out: false,
            num_particles: 1,
            ..Default::default()
        };
        let (mut sim, _host) = running(config);
        sim.surface.as_mut().unwrap().take_commands();
        sim.tick(10.0);

        let p = sim.particles()[0].clone();
        let half = p.size / 2.0;
        let tint = sim.config().tint;
        let expected = vec![
            DrawCommand::ClearRect {
                x: 0.0,
                y: 0.0,
                w: 800.0,
                h: 600.0,
            },
            DrawCommand::Save,
            DrawCommand::Translate {
                x: p.x + half,
                y: p.y + half,
            },
            DrawCommand::Rotate(p.rotation),
            DrawCommand::GlobalAlpha(p.current_opacity),
            DrawCommand::DrawImage {
                x: -half,
                y: -half,
                w: p.size,
                h: p.size,
            },
            DrawCommand::Composite(CompositeMode::SourceAtop),
            DrawCommand::FillRect {
                x: -half,
                y: -half,
                w: p.size,
                h: p.size,
                color: tint,
            },
            DrawCommand::Restore,
        ];
        assert_eq!(sim.surface().unwrap().commands(), expected.as_slice());
    }

    #[test]
    fn repeated_image_load_is_ignored() {
        let (mut sim, host) = running(SimulatorConfig::default());
        let first: Vec<Particle> = sim.particles().to_vec();
        sim.on_image_loaded(Some(()));
        assert_eq!(sim.particles(), first.as_slice());
        assert_eq!(host.viewport.listeners().len(), 1);
        assert_eq!(host.scheduler.pending_count(), 1);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn pool_and_opacity_invariants(
                seed in 1u32..u32::MAX,
                count in 1usize..40,
                steps in proptest::collection::vec(0.0f32..500.0, 1..200),
                fade in any::<bool>(),
            ) {
                let config = SimulatorConfig {
                    num_particles: count,
                    min_duration_ms: 200.0,
                    max_duration_ms: 2_000.0,
                    fade_in_out: fade,
                    ..Default::default()
                };
                let host = ManualHost::new();
                let mut sim = SmokeSimulator::with_rng(
                    config,
                    host.services(false),
                    Some(RecordingSurface::new(SURFACE)),
                    ParticleRng::new(seed),
                );
                sim.on_image_loaded(Some(()));
                for dt in steps {
                    sim.tick(dt);
                    prop_assert_eq!(sim.particles().len(), count);
                    for p in sim.particles() {
                        prop_assert!(p.alive);
                        prop_assert!(p.current_opacity >= 0.0);
                        prop_assert!(p.current_opacity <= p.initial_opacity + 1e-6);
                        prop_assert!(p.elapsed_ms < p.total_duration_ms);
                    }
                }
            }
        }
    }
}
