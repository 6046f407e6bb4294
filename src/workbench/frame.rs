use serde::Serialize;

use crate::session::BreakpointId;
use crate::viewport::{FrameControl, LoadStatus, Millis};

/// Everything a host needs to render one viewport.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameView {
    pub id: BreakpointId,
    pub label: String,
    /// Whether the embedded content should be mounted
    pub should_load: bool,
    pub status: LoadStatus,
    pub controls: &'static [FrameControl],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_ms: Option<Millis>,
    /// Changes on every reload so the host remounts the frame
    pub frame_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
}

pub fn frame_key(id: &BreakpointId, reload_count: u32) -> String {
    format!("{}:{}", id, reload_count)
}
