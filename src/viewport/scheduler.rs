//! Decides when each viewport becomes eligible to load.
//!
//! In lazy mode a viewport is eligible once its placeholder comes within a
//! lookahead margin of the visible area. Eligibility is one-way. Each
//! re-arm opens a new observation and tears the previous one down, so
//! notifications from an older observation are ignored.

use super::arena::ViewportArena;
use super::clock::Millis;
use crate::session::BreakpointId;

pub const DEFAULT_LOOKAHEAD_MARGIN_PX: f64 = 200.0;
pub const DEFAULT_INTERSECTION_THRESHOLD: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserveOptions {
    /// Extra space below the visible area that still counts as near
    pub margin_px: f64,
    /// Visible fraction that triggers a notification
    pub threshold: f64,
}

impl Default for ObserveOptions {
    fn default() -> Self {
        Self {
            margin_px: DEFAULT_LOOKAHEAD_MARGIN_PX,
            threshold: DEFAULT_INTERSECTION_THRESHOLD,
        }
    }
}

/// Identifies one observation lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObservationHandle(u64);

impl ObservationHandle {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Layout and intersection capabilities of the embedding host.
pub trait ViewportHost {
    /// Height of the visible area.
    fn visible_height(&self) -> f64;
    /// Top edge of a placeholder relative to the visible area, if mounted.
    fn placeholder_top(&self, id: &BreakpointId) -> Option<f64>;
    /// Start delivering intersection notifications for `targets` under `handle`.
    fn observe(&mut self, handle: ObservationHandle, targets: &[BreakpointId], options: ObserveOptions);
    fn disconnect(&mut self, handle: ObservationHandle);
}

/// A viewport just became eligible and its load cycle starts now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadStart {
    pub id: BreakpointId,
    pub at: Millis,
}

#[derive(Debug)]
pub struct VisibilityScheduler {
    lazy: bool,
    options: ObserveOptions,
    next_handle: u64,
    active: Option<ObservationHandle>,
}

impl VisibilityScheduler {
    pub fn new(lazy: bool, options: ObserveOptions) -> Self {
        Self {
            lazy,
            options,
            next_handle: 1,
            active: None,
        }
    }

    pub fn is_lazy(&self) -> bool {
        self.lazy
    }

    pub fn options(&self) -> ObserveOptions {
        self.options
    }

    pub fn active_observation(&self) -> Option<ObservationHandle> {
        self.active
    }

    /// Re-evaluate every viewport after the breakpoint list or mode changed.
    pub fn arm(
        &mut self,
        arena: &mut ViewportArena,
        host: &mut dyn ViewportHost,
        now: Millis,
    ) -> Vec<LoadStart> {
        self.teardown(host);

        if !self.lazy {
            return mark_all(arena, now);
        }

        let mut starts = Vec::new();
        let limit = host.visible_height() + self.options.margin_px;
        let ids: Vec<BreakpointId> = arena.ids().to_vec();
        let mut pending = Vec::new();
        for id in ids {
            if arena.is_eligible(&id) {
                continue;
            }
            // Viewports already near the top load without waiting for a notification.
            let near = host.placeholder_top(&id).is_some_and(|top| top < limit);
            if near && arena.mark_eligible(&id) {
                starts.push(LoadStart { id, at: now });
            } else {
                pending.push(id);
            }
        }

        if !pending.is_empty() {
            let handle = ObservationHandle(self.next_handle);
            self.next_handle += 1;
            host.observe(handle, &pending, self.options);
            self.active = Some(handle);
            tracing::debug!(handle = handle.0, targets = pending.len(), "Observing viewports");
        }
        starts
    }

    /// Switch lazy mode. Turning it off loads everything immediately.
    pub fn set_lazy(
        &mut self,
        lazy: bool,
        arena: &mut ViewportArena,
        host: &mut dyn ViewportHost,
        now: Millis,
    ) -> Vec<LoadStart> {
        self.lazy = lazy;
        self.arm(arena, host, now)
    }

    /// An observed placeholder intersected the lookahead region.
    pub fn on_visible(
        &mut self,
        handle: ObservationHandle,
        id: &BreakpointId,
        arena: &mut ViewportArena,
        now: Millis,
    ) -> Option<LoadStart> {
        if self.active != Some(handle) {
            tracing::trace!(handle = handle.0, id = %id, "Dropping stale visibility notification");
            return None;
        }
        arena.mark_eligible(id).then(|| LoadStart {
            id: id.clone(),
            at: now,
        })
    }

    /// Manual override for a single viewport.
    pub fn load_now(
        &mut self,
        id: &BreakpointId,
        arena: &mut ViewportArena,
        now: Millis,
    ) -> Option<LoadStart> {
        arena.mark_eligible(id).then(|| LoadStart {
            id: id.clone(),
            at: now,
        })
    }

    pub fn teardown(&mut self, host: &mut dyn ViewportHost) {
        if let Some(handle) = self.active.take() {
            host.disconnect(handle);
        }
    }
}

fn mark_all(arena: &mut ViewportArena, now: Millis) -> Vec<LoadStart> {
    let ids: Vec<BreakpointId> = arena.ids().to_vec();
    ids.into_iter()
        .filter(|id| arena.mark_eligible(id))
        .map(|id| LoadStart { id, at: now })
        .collect()
}
