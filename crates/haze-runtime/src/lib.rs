//! Haze Runtime - Host capabilities for the frame loop
//!
//! Provides the pieces a host hands to a simulation:
//! - `FrameLimiter` - caps the tick rate of an animation-frame driver
//! - `TimeSource` - millisecond clock (`SystemClock`, `ManualClock`)
//! - `FrameScheduler` - "run before next paint" requests with cancellation
//! - `ViewportEvents` - resize subscription source
//! - `HostServices` - bundle of the above plus the reduced-motion preference

mod clock;
mod host;
mod scheduler;
mod viewport;

pub use clock::{FrameLimiter, ManualClock, SystemClock, TimeSource};
pub use host::{HostServices, ManualHost};
pub use scheduler::{FrameHandle, FrameScheduler, ManualScheduler};
pub use viewport::{ListenerId, ManualViewport, Viewport, ViewportEvents, SURFACE_OVERSCAN};
