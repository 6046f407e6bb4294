//! Viewport runtime: lazy scheduling, load status and the status clock.

mod arena;
mod clock;
mod events;
mod scheduler;
mod status;
mod ticker;

pub use arena::{LoadRecord, ViewportArena, ViewportSlot};
pub use clock::{Clock, ManualClock, Millis, MonotonicClock};
pub use events::ViewportEvent;
pub use scheduler::{
    LoadStart, ObservationHandle, ObserveOptions, ViewportHost, VisibilityScheduler,
    DEFAULT_INTERSECTION_THRESHOLD, DEFAULT_LOOKAHEAD_MARGIN_PX,
};
pub use status::{
    FrameControl, HostilePatterns, LoadAverage, LoadStatus, LoadStatusMachine, StatusThresholds,
    BUILTIN_HOSTILE_HOSTS, DEFAULT_BLOCKED_AFTER_MS, DEFAULT_SLOW_AFTER_MS,
};
pub use ticker::ClockTicker;
