use thiserror::Error;

use super::appearance::AppearanceMode;
use super::breakpoint::{
    default_breakpoints, is_width_in_range, sort_by_width, Breakpoint, BreakpointId, Unit,
};
use super::codec::{clamp_frame_height, DEFAULT_FRAME_HEIGHT};
use super::locator::{is_http_url, parse_locator, render_locator};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("width {width} is outside the accepted range 100..=5000")]
    WidthOutOfRange { width: f64 },
    #[error("unknown breakpoint: {0}")]
    UnknownBreakpoint(BreakpointId),
    #[error("not an http(s) URL: {0}")]
    InvalidUrl(String),
}

/// The user-visible preview session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub target_url: Option<String>,
    pub breakpoints: Vec<Breakpoint>,
    pub frame_height: u32,
    pub appearance: AppearanceMode,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            target_url: None,
            breakpoints: default_breakpoints(),
            frame_height: DEFAULT_FRAME_HEIGHT,
            appearance: AppearanceMode::System,
        }
    }
}

impl SessionState {
    /// Build a session from a locator, keeping defaults for anything missing or malformed.
    pub fn from_locator(input: &str) -> Self {
        let mut state = Self::default();
        state.apply_locator(input);
        state
    }

    pub fn apply_locator(&mut self, input: &str) {
        let fields = parse_locator(input);
        if let Some(url) = fields.target_url {
            self.target_url = Some(url);
        }
        if let Some(breakpoints) = fields.breakpoints {
            self.breakpoints = breakpoints;
        }
        if let Some(height) = fields.frame_height {
            self.frame_height = height;
        }
        if let Some(mode) = fields.appearance {
            self.appearance = mode;
        }
    }

    pub fn locator(&self) -> String {
        render_locator("", self)
    }

    /// Locator for this session merged into an existing address query.
    pub fn locator_over(&self, existing: &str) -> String {
        render_locator(existing, self)
    }

    pub fn load_url(&mut self, url: &str) -> Result<(), SessionError> {
        let url = url.trim();
        if !is_http_url(url) {
            return Err(SessionError::InvalidUrl(url.to_string()));
        }
        self.target_url = Some(url.to_string());
        Ok(())
    }

    /// Hostname of the loaded target, lowercased.
    pub fn target_host(&self) -> Option<String> {
        let url = url::Url::parse(self.target_url.as_deref()?).ok()?;
        url.host_str().map(|h| h.to_ascii_lowercase())
    }

    pub fn breakpoint(&self, id: &BreakpointId) -> Option<&Breakpoint> {
        self.breakpoints.iter().find(|b| &b.id == id)
    }

    pub fn add_breakpoint(&mut self, width: f64, unit: Unit) -> Result<BreakpointId, SessionError> {
        if !is_width_in_range(width) {
            return Err(SessionError::WidthOutOfRange { width });
        }
        let id = BreakpointId::fresh();
        self.breakpoints.push(Breakpoint::new(id.clone(), width, unit));
        sort_by_width(&mut self.breakpoints);
        Ok(id)
    }

    /// Change a breakpoint's width and unit. Out-of-range edits keep the old value.
    pub fn update_breakpoint(
        &mut self,
        id: &BreakpointId,
        width: f64,
        unit: Unit,
    ) -> Result<(), SessionError> {
        if !is_width_in_range(width) {
            return Err(SessionError::WidthOutOfRange { width });
        }
        let bp = self
            .breakpoints
            .iter_mut()
            .find(|b| &b.id == id)
            .ok_or_else(|| SessionError::UnknownBreakpoint(id.clone()))?;
        bp.width = width;
        bp.unit = unit;
        sort_by_width(&mut self.breakpoints);
        Ok(())
    }

    pub fn remove_breakpoint(&mut self, id: &BreakpointId) -> Option<Breakpoint> {
        let index = self.breakpoints.iter().position(|b| &b.id == id)?;
        Some(self.breakpoints.remove(index))
    }

    pub fn replace_breakpoints(&mut self, breakpoints: Vec<Breakpoint>) {
        self.breakpoints = breakpoints;
    }

    pub fn set_frame_height(&mut self, height: u32) {
        self.frame_height = clamp_frame_height(f64::from(height));
    }

    /// Reset breakpoints and frame height. The target and appearance survive.
    pub fn reset(&mut self) {
        self.breakpoints = default_breakpoints();
        self.frame_height = DEFAULT_FRAME_HEIGHT;
    }
}
