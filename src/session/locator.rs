//! Shareable locator: the query string carrying a whole preview session.
//!
//! Keys are `u` (target URL), `w` (breakpoints), `h` (frame height) and
//! `t` (appearance). Unknown keys are preserved when a locator is rewritten.

use url::form_urlencoded;

use super::appearance::AppearanceMode;
use super::breakpoint::Breakpoint;
use super::codec::{
    decode_appearance, decode_breakpoints, decode_frame_height, encode_appearance,
    encode_breakpoints, encode_frame_height,
};
use super::state::SessionState;

pub const KEY_URL: &str = "u";
pub const KEY_WIDTHS: &str = "w";
pub const KEY_HEIGHT: &str = "h";
pub const KEY_THEME: &str = "t";

const OWN_KEYS: [&str; 4] = [KEY_WIDTHS, KEY_URL, KEY_HEIGHT, KEY_THEME];

/// Fields recovered from a locator. Each is `None` when missing or malformed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocatorFields {
    pub target_url: Option<String>,
    pub breakpoints: Option<Vec<Breakpoint>>,
    pub frame_height: Option<u32>,
    pub appearance: Option<AppearanceMode>,
}

/// True for absolute `http://` or `https://` URLs with a host.
pub fn is_http_url(raw: &str) -> bool {
    let lower = raw.trim_start().to_ascii_lowercase();
    if !(lower.starts_with("http://") || lower.starts_with("https://")) {
        return false;
    }
    url::Url::parse(raw.trim())
        .map(|u| u.host_str().is_some_and(|h| !h.is_empty()))
        .unwrap_or(false)
}

/// Accepts a full address, `?query`, or a bare `k=v&...` string.
fn query_part(input: &str) -> &str {
    let without_fragment = input.split('#').next().unwrap_or("");
    match without_fragment.split_once('?') {
        Some((_, query)) => query,
        None if without_fragment.contains("://") => "",
        None => without_fragment,
    }
}

fn pairs(input: &str) -> Vec<(String, String)> {
    form_urlencoded::parse(query_part(input).as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

fn first<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

pub fn parse_locator(input: &str) -> LocatorFields {
    let pairs = pairs(input);
    LocatorFields {
        target_url: first(&pairs, KEY_URL)
            .filter(|u| is_http_url(u))
            .map(|u| u.trim().to_string()),
        breakpoints: decode_breakpoints(first(&pairs, KEY_WIDTHS)),
        frame_height: decode_frame_height(first(&pairs, KEY_HEIGHT)),
        appearance: decode_appearance(first(&pairs, KEY_THEME)),
    }
}

/// Render `state` as `?w=..&u=..&h=..&t=..`, keeping foreign keys from `existing`.
///
/// `u` is written only when a target is loaded.
pub fn render_locator(existing: &str, state: &SessionState) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (k, v) in pairs(existing) {
        if !OWN_KEYS.contains(&k.as_str()) {
            serializer.append_pair(&k, &v);
        }
    }
    serializer.append_pair(KEY_WIDTHS, &encode_breakpoints(&state.breakpoints));
    if let Some(url) = &state.target_url {
        serializer.append_pair(KEY_URL, url);
    }
    serializer.append_pair(KEY_HEIGHT, &encode_frame_height(state.frame_height));
    serializer.append_pair(KEY_THEME, encode_appearance(state.appearance));
    format!("?{}", serializer.finish())
}
