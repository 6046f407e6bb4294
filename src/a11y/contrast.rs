//! Relative luminance and contrast ratio, with the usual conformance bands.

use serde::Serialize;

use super::color::Rgb;

pub const AAA_NORMAL: f64 = 7.0;
pub const AA_NORMAL: f64 = 4.5;
/// Minimum ratio for large text.
pub const AA_LARGE: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ContrastLevel {
    #[serde(rename = "fail")]
    Fail,
    #[serde(rename = "AA-large")]
    AaLarge,
    #[serde(rename = "AA")]
    Aa,
    #[serde(rename = "AAA")]
    Aaa,
}

impl ContrastLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            ContrastLevel::Fail => "fail",
            ContrastLevel::AaLarge => "AA-large",
            ContrastLevel::Aa => "AA",
            ContrastLevel::Aaa => "AAA",
        }
    }

    pub fn is_fail(self) -> bool {
        self == ContrastLevel::Fail
    }
}

fn channel_to_linear(channel: u8) -> f64 {
    let c = f64::from(channel) / 255.0;
    if c <= 0.03928 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

pub fn relative_luminance(color: Rgb) -> f64 {
    0.2126 * channel_to_linear(color.r)
        + 0.7152 * channel_to_linear(color.g)
        + 0.0722 * channel_to_linear(color.b)
}

/// Symmetric, in `1.0..=21.0`.
pub fn contrast_ratio(a: Rgb, b: Rgb) -> f64 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    let (lighter, darker) = if la >= lb { (la, lb) } else { (lb, la) };
    (lighter + 0.05) / (darker + 0.05)
}

/// Large text is held to a lower bar; everything else needs AA or better.
pub fn classify(ratio: f64, large_text: bool) -> ContrastLevel {
    if ratio >= AAA_NORMAL {
        ContrastLevel::Aaa
    } else if ratio >= AA_NORMAL {
        ContrastLevel::Aa
    } else if large_text && ratio >= AA_LARGE {
        ContrastLevel::AaLarge
    } else {
        ContrastLevel::Fail
    }
}

/// At least 24px, or at least 19px when bold.
pub fn is_large_text(font_size_px: f64, font_weight: u16) -> bool {
    font_size_px >= 24.0 || (font_size_px >= 19.0 && font_weight >= 700)
}

/// Computed font sizes are pixel lengths like `16px`.
pub fn parse_font_size(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    let number = raw.strip_suffix("px").unwrap_or(raw).trim();
    number.parse::<f64>().ok().filter(|v| v.is_finite() && *v >= 0.0)
}

/// Numeric weights pass through; keywords map to 400 or 700.
pub fn parse_font_weight(raw: &str) -> u16 {
    match raw.trim() {
        "bold" | "bolder" => 700,
        "" | "normal" | "lighter" => 400,
        other => other
            .parse::<f64>()
            .ok()
            .filter(|w| w.is_finite())
            .map(|w| w.clamp(1.0, 1000.0) as u16)
            .unwrap_or(400),
    }
}
