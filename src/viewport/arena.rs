//! Per-viewport runtime slots keyed by breakpoint id.
//!
//! Slots are created when a breakpoint appears and dropped with it, so no
//! load record or eligibility flag outlives its breakpoint.

use std::collections::HashMap;

use super::clock::Millis;
use crate::session::{Breakpoint, BreakpointId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadRecord {
    pub start: Option<Millis>,
    pub end: Option<Millis>,
    pub reload_count: u32,
}

impl LoadRecord {
    pub fn started(at: Millis) -> Self {
        Self {
            start: Some(at),
            end: None,
            reload_count: 0,
        }
    }

    /// A cycle has started and not yet completed.
    pub fn is_open(&self) -> bool {
        self.start.is_some() && self.end.is_none()
    }

    pub fn elapsed(&self, now: Millis) -> Option<Millis> {
        self.start.map(|s| now.saturating_sub(s))
    }

    pub fn duration(&self) -> Option<Millis> {
        match (self.start, self.end) {
            (Some(s), Some(e)) => Some(e.saturating_sub(s)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewportSlot {
    /// Once set, stays set for the slot's lifetime.
    pub eligible: bool,
    pub record: Option<LoadRecord>,
    /// Duration of the most recent completed cycle.
    pub last_load_ms: Option<Millis>,
}

#[derive(Debug, Default)]
pub struct ViewportArena {
    slots: HashMap<BreakpointId, ViewportSlot>,
    order: Vec<BreakpointId>,
}

impl ViewportArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Align slots with `breakpoints`. Returns ids whose slots were dropped.
    pub fn sync(&mut self, breakpoints: &[Breakpoint]) -> Vec<BreakpointId> {
        let order: Vec<BreakpointId> = breakpoints.iter().map(|b| b.id.clone()).collect();
        let removed: Vec<BreakpointId> = self
            .order
            .iter()
            .filter(|id| !order.contains(id))
            .cloned()
            .collect();
        for id in &removed {
            self.slots.remove(id);
        }
        for id in &order {
            self.slots.entry(id.clone()).or_default();
        }
        self.order = order;
        removed
    }

    pub fn ids(&self) -> &[BreakpointId] {
        &self.order
    }

    pub fn contains(&self, id: &BreakpointId) -> bool {
        self.slots.contains_key(id)
    }

    pub fn get(&self, id: &BreakpointId) -> Option<&ViewportSlot> {
        self.slots.get(id)
    }

    pub fn get_mut(&mut self, id: &BreakpointId) -> Option<&mut ViewportSlot> {
        self.slots.get_mut(id)
    }

    pub fn is_eligible(&self, id: &BreakpointId) -> bool {
        self.slots.get(id).is_some_and(|s| s.eligible)
    }

    /// Returns true only on the transition to eligible.
    pub fn mark_eligible(&mut self, id: &BreakpointId) -> bool {
        match self.slots.get_mut(id) {
            Some(slot) if !slot.eligible => {
                slot.eligible = true;
                true
            }
            _ => false,
        }
    }

    pub fn any_open(&self) -> bool {
        self.slots
            .values()
            .any(|s| s.record.is_some_and(|r| r.is_open()))
    }

    /// Slots in breakpoint order.
    pub fn iter(&self) -> impl Iterator<Item = (&BreakpointId, &ViewportSlot)> {
        self.order
            .iter()
            .filter_map(|id| self.slots.get(id).map(|slot| (id, slot)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
