//! A viewport host whose layout is scripted by the test.

use std::collections::HashMap;

use breakpoint::session::BreakpointId;
use breakpoint::viewport::{ObservationHandle, ObserveOptions, ViewportHost};

/// Placeholders stacked vertically at `spacing` pixels apart, in the order
/// given to [`ScriptedHost::layout`].
#[derive(Debug, Default)]
pub struct ScriptedHost {
    pub visible_height: f64,
    tops: HashMap<BreakpointId, f64>,
    pub observations: Vec<(ObservationHandle, Vec<BreakpointId>)>,
    pub disconnected: Vec<ObservationHandle>,
}

impl ScriptedHost {
    pub fn new(visible_height: f64) -> Self {
        Self {
            visible_height,
            ..Self::default()
        }
    }

    pub fn layout(&mut self, ids: &[BreakpointId], spacing: f64) {
        self.tops = ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i as f64 * spacing))
            .collect();
    }

    pub fn current(&self) -> Option<&(ObservationHandle, Vec<BreakpointId>)> {
        self.observations
            .iter()
            .rev()
            .find(|(h, _)| !self.disconnected.contains(h))
    }
}

impl ViewportHost for ScriptedHost {
    fn visible_height(&self) -> f64 {
        self.visible_height
    }

    fn placeholder_top(&self, id: &BreakpointId) -> Option<f64> {
        self.tops.get(id).copied()
    }

    fn observe(&mut self, handle: ObservationHandle, targets: &[BreakpointId], _options: ObserveOptions) {
        self.observations.push((handle, targets.to_vec()));
    }

    fn disconnect(&mut self, handle: ObservationHandle) {
        self.disconnected.push(handle);
    }
}
