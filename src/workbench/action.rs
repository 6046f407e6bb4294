//! User-initiated operations on the preview session.

use serde::{Deserialize, Serialize};

use crate::session::{AppearanceMode, BreakpointId, Unit};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    // ========== Target ==========
    /// Point every viewport at a new http(s) page
    LoadUrl(String),
    /// Open the target in a regular browser window
    OpenExternally,

    // ========== Breakpoints ==========
    AddBreakpoint { width: f64, unit: Unit },
    UpdateBreakpoint { id: BreakpointId, width: f64, unit: Unit },
    RemoveBreakpoint(BreakpointId),
    /// Restore default breakpoints and frame height
    ResetSession,
    SetFrameHeight(u32),

    // ========== Appearance ==========
    SetAppearance(AppearanceMode),
    CycleAppearance,

    // ========== Loading ==========
    SetLazyLoad(bool),
    /// Force a waiting placeholder to load
    LoadNow(BreakpointId),
    ReloadFrame(BreakpointId),

    // ========== Presets ==========
    SavePreset(String),
    LoadPreset(String),
    DeletePreset(String),

    // ========== Sharing ==========
    CopyShareLink,
    /// Host reports whether the clipboard write succeeded
    ShareCopied(bool),
}
