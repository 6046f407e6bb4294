//! Preview session state and its shareable text form.

mod appearance;
mod breakpoint;
pub mod codec;
pub mod locator;
mod state;

pub use appearance::{Appearance, AppearanceMode, APPEARANCE_KEY};
pub use breakpoint::{
    default_breakpoints, format_width, is_width_in_range, sort_by_width, Breakpoint, BreakpointId,
    Unit, DEFAULT_WIDTHS, MAX_WIDTH, MIN_WIDTH,
};
pub use codec::{
    decode_breakpoints, decode_frame_height, encode_breakpoints, is_frame_height_preset,
    try_decode_breakpoints, CodecError, DEFAULT_FRAME_HEIGHT, FRAME_HEIGHT_PRESETS,
    MAX_FRAME_HEIGHT, MIN_FRAME_HEIGHT,
};
pub use locator::{is_http_url, parse_locator, LocatorFields};
pub use state::{SessionError, SessionState};
