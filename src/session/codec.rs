//! Compact text forms for the session fields carried in a locator.
//!
//! Every decoder fails closed: malformed input yields `None` and the caller
//! keeps its current value.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use super::appearance::AppearanceMode;
use super::breakpoint::{format_width, Breakpoint, BreakpointId, Unit};

pub const MIN_FRAME_HEIGHT: u32 = 300;
pub const MAX_FRAME_HEIGHT: u32 = 1200;
pub const DEFAULT_FRAME_HEIGHT: u32 = 600;
/// One-click frame heights offered next to the free-form slider.
pub const FRAME_HEIGHT_PRESETS: [u32; 5] = [500, 600, 720, 840, 960];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("breakpoint list is empty")]
    Empty,
    #[error("invalid breakpoint token {token:?} at position {index}")]
    InvalidToken { index: usize, token: String },
    #[error("breakpoint width must be positive: {token:?}")]
    NonPositive { token: String },
}

fn token_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^(\d+(?:\.\d+)?)(px|em)$").ok())
        .as_ref()
}

/// Join breakpoints as `<width><unit>` tokens separated by commas.
pub fn encode_breakpoints(list: &[Breakpoint]) -> String {
    list.iter()
        .map(|bp| format!("{}{}", format_width(bp.width), bp.unit))
        .collect::<Vec<_>>()
        .join(",")
}

/// Decode a breakpoint list, rejecting the whole list on any malformed token.
pub fn try_decode_breakpoints(raw: &str) -> Result<Vec<Breakpoint>, CodecError> {
    let mut out = Vec::new();
    // Empty tokens (a trailing comma) are skipped rather than rejected.
    for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let index = out.len();
        let caps = token_pattern()
            .and_then(|re| re.captures(token))
            .ok_or_else(|| CodecError::InvalidToken {
                index,
                token: token.to_string(),
            })?;
        let width: f64 = caps[1].parse().map_err(|_| CodecError::InvalidToken {
            index,
            token: token.to_string(),
        })?;
        if !(width.is_finite() && width > 0.0) {
            return Err(CodecError::NonPositive {
                token: token.to_string(),
            });
        }
        let unit = Unit::parse(&caps[2]).ok_or_else(|| CodecError::InvalidToken {
            index,
            token: token.to_string(),
        })?;
        out.push(Breakpoint::new(
            BreakpointId::derived(index, width, unit),
            width,
            unit,
        ));
    }
    if out.is_empty() {
        return Err(CodecError::Empty);
    }
    Ok(out)
}

pub fn decode_breakpoints(raw: Option<&str>) -> Option<Vec<Breakpoint>> {
    match try_decode_breakpoints(raw?) {
        Ok(list) => Some(list),
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring malformed breakpoint list");
            None
        }
    }
}

pub fn encode_frame_height(height: u32) -> String {
    height.to_string()
}

/// Parse an integer and clamp it into the frame height range. Fractional
/// values are rejected.
pub fn decode_frame_height(raw: Option<&str>) -> Option<u32> {
    let value: i64 = raw?.trim().parse().ok()?;
    let clamped = value.clamp(i64::from(MIN_FRAME_HEIGHT), i64::from(MAX_FRAME_HEIGHT));
    u32::try_from(clamped).ok()
}

pub fn is_frame_height_preset(height: u32) -> bool {
    FRAME_HEIGHT_PRESETS.contains(&height)
}

pub fn clamp_frame_height(value: f64) -> u32 {
    value
        .round()
        .clamp(f64::from(MIN_FRAME_HEIGHT), f64::from(MAX_FRAME_HEIGHT)) as u32
}

pub fn encode_appearance(mode: AppearanceMode) -> &'static str {
    mode.as_str()
}

pub fn decode_appearance(raw: Option<&str>) -> Option<AppearanceMode> {
    AppearanceMode::parse(raw?)
}
