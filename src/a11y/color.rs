//! CSS color values as they appear in computed styles.
//!
//! Computed values are normally `rgb(...)`/`rgba(...)`; hex, `hsl()`,
//! `transparent` and the basic named colors are accepted too so hand-written
//! snapshots work. `currentColor` and other keywords do not parse.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

impl Serialize for Rgb {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// A color with opacity in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub rgb: Rgb,
    pub alpha: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba {
        rgb: Rgb::BLACK,
        alpha: 0.0,
    };

    pub fn opaque(rgb: Rgb) -> Self {
        Self { rgb, alpha: 1.0 }
    }

    pub fn is_transparent(self) -> bool {
        self.alpha <= 0.0
    }
}

pub fn parse_color(input: &str) -> Option<Rgba> {
    let s = input.trim().to_ascii_lowercase();
    if s == "transparent" {
        return Some(Rgba::TRANSPARENT);
    }
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }
    if let Some(inner) = function_args(&s, &["rgba", "rgb"]) {
        return parse_rgb_args(inner);
    }
    if let Some(inner) = function_args(&s, &["hsla", "hsl"]) {
        return parse_hsl_args(inner);
    }
    named_color(&s).map(Rgba::opaque)
}

fn function_args<'a>(s: &'a str, names: &[&str]) -> Option<&'a str> {
    names.iter().find_map(|name| {
        s.strip_prefix(name)?
            .trim_start()
            .strip_prefix('(')?
            .strip_suffix(')')
    })
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let (r, g, b, a) = match hex.len() {
        3 => (nibble(0)?, nibble(1)?, nibble(2)?, 255),
        4 => (nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?),
        6 => (byte(0)?, byte(2)?, byte(4)?, 255),
        8 => (byte(0)?, byte(2)?, byte(4)?, byte(6)?),
        _ => return None,
    };
    Some(Rgba {
        rgb: Rgb::new(r, g, b),
        alpha: f32::from(a) / 255.0,
    })
}

/// Split `a, b, c[, d]` or `a b c[ / d]`.
fn split_args(inner: &str) -> Option<(Vec<&str>, Option<&str>)> {
    if inner.contains(',') {
        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        return match parts.len() {
            3 => Some((parts, None)),
            4 => Some((parts[..3].to_vec(), Some(parts[3]))),
            _ => None,
        };
    }
    let (channels, alpha) = match inner.split_once('/') {
        Some((c, a)) => (c, Some(a.trim())),
        None => (inner, None),
    };
    let parts: Vec<&str> = channels.split_whitespace().collect();
    (parts.len() == 3).then_some((parts, alpha))
}

fn parse_alpha(raw: Option<&str>) -> Option<f32> {
    let Some(raw) = raw else {
        return Some(1.0);
    };
    let value = match raw.strip_suffix('%') {
        Some(pct) => pct.trim().parse::<f32>().ok()? / 100.0,
        None => raw.parse::<f32>().ok()?,
    };
    value.is_finite().then_some(value.clamp(0.0, 1.0))
}

fn parse_channel(raw: &str) -> Option<u8> {
    let value = match raw.strip_suffix('%') {
        Some(pct) => pct.trim().parse::<f64>().ok()? / 100.0 * 255.0,
        None => raw.parse::<f64>().ok()?,
    };
    value
        .is_finite()
        .then(|| value.round().clamp(0.0, 255.0) as u8)
}

fn parse_rgb_args(inner: &str) -> Option<Rgba> {
    let (parts, alpha) = split_args(inner)?;
    Some(Rgba {
        rgb: Rgb::new(
            parse_channel(parts[0])?,
            parse_channel(parts[1])?,
            parse_channel(parts[2])?,
        ),
        alpha: parse_alpha(alpha)?,
    })
}

fn parse_hsl_args(inner: &str) -> Option<Rgba> {
    let (parts, alpha) = split_args(inner)?;
    let hue: f64 = parts[0].trim_end_matches("deg").parse().ok()?;
    let sat: f64 = parts[1].strip_suffix('%')?.parse().ok()?;
    let light: f64 = parts[2].strip_suffix('%')?.parse().ok()?;
    if !(hue.is_finite() && sat.is_finite() && light.is_finite()) {
        return None;
    }
    Some(Rgba {
        rgb: hsl_to_rgb(hue, sat / 100.0, light / 100.0),
        alpha: parse_alpha(alpha)?,
    })
}

fn hsl_to_rgb(h: f64, s: f64, l: f64) -> Rgb {
    let h = h.rem_euclid(360.0) / 360.0;
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);

    if s == 0.0 {
        let v = (l * 255.0).round() as u8;
        return Rgb::new(v, v, v);
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let channel = |t: f64| {
        let t = t.rem_euclid(1.0);
        let v = if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 0.5 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        };
        (v * 255.0).round().clamp(0.0, 255.0) as u8
    };
    Rgb::new(
        channel(h + 1.0 / 3.0),
        channel(h),
        channel(h - 1.0 / 3.0),
    )
}

fn named_color(name: &str) -> Option<Rgb> {
    let rgb = match name {
        "black" => Rgb::new(0, 0, 0),
        "silver" => Rgb::new(192, 192, 192),
        "gray" | "grey" => Rgb::new(128, 128, 128),
        "white" => Rgb::new(255, 255, 255),
        "maroon" => Rgb::new(128, 0, 0),
        "red" => Rgb::new(255, 0, 0),
        "purple" => Rgb::new(128, 0, 128),
        "fuchsia" | "magenta" => Rgb::new(255, 0, 255),
        "green" => Rgb::new(0, 128, 0),
        "lime" => Rgb::new(0, 255, 0),
        "olive" => Rgb::new(128, 128, 0),
        "yellow" => Rgb::new(255, 255, 0),
        "navy" => Rgb::new(0, 0, 128),
        "blue" => Rgb::new(0, 0, 255),
        "teal" => Rgb::new(0, 128, 128),
        "aqua" | "cyan" => Rgb::new(0, 255, 255),
        "orange" => Rgb::new(255, 165, 0),
        "darkgray" | "darkgrey" => Rgb::new(169, 169, 169),
        "lightgray" | "lightgrey" => Rgb::new(211, 211, 211),
        "dimgray" | "dimgrey" => Rgb::new(105, 105, 105),
        "whitesmoke" => Rgb::new(245, 245, 245),
        "rebeccapurple" => Rgb::new(102, 51, 153),
        _ => return None,
    };
    Some(rgb)
}
