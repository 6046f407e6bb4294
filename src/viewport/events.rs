use super::clock::Millis;
use super::scheduler::ObservationHandle;
use crate::session::BreakpointId;

/// Notifications flowing from the host and the clock into the workbench.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewportEvent {
    /// An observed placeholder came within the lookahead region.
    VisibilityEntered {
        handle: ObservationHandle,
        id: BreakpointId,
        at: Millis,
    },
    /// The embedded frame reported that it finished loading.
    LoadCompleted { id: BreakpointId, at: Millis },
    /// Periodic clock sample while loads are pending.
    Tick { at: Millis },
}
