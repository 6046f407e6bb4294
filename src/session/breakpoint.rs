//! Breakpoint model: a width plus unit at which the target page is previewed.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Smallest width accepted from manual edits.
pub const MIN_WIDTH: f64 = 100.0;
/// Largest width accepted from manual edits.
pub const MAX_WIDTH: f64 = 5000.0;
/// Default breakpoint widths, in pixels.
pub const DEFAULT_WIDTHS: [f64; 5] = [360.0, 480.0, 768.0, 1024.0, 1280.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Px,
    Em,
}

impl Unit {
    pub fn as_str(self) -> &'static str {
        match self {
            Unit::Px => "px",
            Unit::Em => "em",
        }
    }

    /// Exact, lowercase match only.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "px" => Some(Unit::Px),
            "em" => Some(Unit::Em),
            _ => None,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of a breakpoint, stable for the breakpoint's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BreakpointId(String);

impl BreakpointId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// A fresh identifier for a manually added breakpoint.
    pub fn fresh() -> Self {
        Self(format!("bp-{}", Uuid::new_v4().simple()))
    }

    /// Deterministic identifier for the `index`-th decoded breakpoint.
    pub fn derived(index: usize, width: f64, unit: Unit) -> Self {
        Self(format!("bp{index}_{}{unit}", format_width(width)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BreakpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breakpoint {
    pub id: BreakpointId,
    pub width: f64,
    pub unit: Unit,
}

impl Breakpoint {
    pub fn new(id: BreakpointId, width: f64, unit: Unit) -> Self {
        Self { id, width, unit }
    }

    /// Width token as it appears in a locator, e.g. `768px`.
    pub fn label(&self) -> String {
        format!("{}{}", format_width(self.width), self.unit)
    }
}

/// Format a width the shortest way that parses back to the same value.
pub fn format_width(width: f64) -> String {
    if width.fract() == 0.0 && width.abs() < 1e15 {
        format!("{}", width as i64)
    } else {
        format!("{width}")
    }
}

pub fn is_width_in_range(width: f64) -> bool {
    width.is_finite() && (MIN_WIDTH..=MAX_WIDTH).contains(&width)
}

pub fn default_breakpoints() -> Vec<Breakpoint> {
    DEFAULT_WIDTHS
        .iter()
        .enumerate()
        .map(|(i, &w)| Breakpoint::new(BreakpointId::new(format!("bp{i}")), w, Unit::Px))
        .collect()
}

/// Stable sort ascending by raw width.
pub fn sort_by_width(list: &mut [Breakpoint]) {
    list.sort_by(|a, b| a.width.total_cmp(&b.width));
}
