//! Host capability bundle handed to a simulation

use crate::clock::{ManualClock, TimeSource};
use crate::scheduler::{FrameScheduler, ManualScheduler};
use crate::viewport::{ManualViewport, ViewportEvents};

/// Everything a simulation consumes from its host besides the drawing surface
pub struct HostServices {
    pub scheduler: Box<dyn FrameScheduler>,
    pub viewport: Box<dyn ViewportEvents>,
    pub clock: Box<dyn TimeSource>,
    /// Platform asks for reduced motion (queried once at start)
    pub reduced_motion: bool,
}

impl HostServices {
    pub fn new(
        scheduler: Box<dyn FrameScheduler>,
        viewport: Box<dyn ViewportEvents>,
        clock: Box<dyn TimeSource>,
        reduced_motion: bool,
    ) -> Self {
        Self {
            scheduler,
            viewport,
            clock,
            reduced_motion,
        }
    }
}

/// Hand-driven host: the driver keeps these handles and fires frames,
/// advances time, and delivers resizes itself.
#[derive(Clone)]
pub struct ManualHost {
    pub scheduler: ManualScheduler,
    pub viewport: ManualViewport,
    pub clock: ManualClock,
}

impl ManualHost {
    pub fn new() -> Self {
        Self {
            scheduler: ManualScheduler::new(),
            viewport: ManualViewport::new(),
            clock: ManualClock::new(0.0),
        }
    }

    /// Services sharing this host's scheduler, viewport and clock
    pub fn services(&self, reduced_motion: bool) -> HostServices {
        HostServices::new(
            Box::new(self.scheduler.clone()),
            Box::new(self.viewport.clone()),
            Box::new(self.clock.clone()),
            reduced_motion,
        )
    }
}

impl Default for ManualHost {
    fn default() -> Self {
        Self::new()
    }
}
