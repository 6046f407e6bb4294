//! Text contrast checks over rendered viewports.

mod color;
mod contrast;
mod document;
mod scanner;

pub use color::{parse_color, Rgb, Rgba};
pub use contrast::{
    classify, contrast_ratio, is_large_text, relative_luminance, ContrastLevel, AAA_NORMAL,
    AA_LARGE, AA_NORMAL,
};
pub use document::{
    AccessDenied, ComputedStyle, DocumentSnapshot, ElementId, ElementSnapshot, Rect,
    RenderSubstrate,
};
pub use scanner::{ContrastIssue, ContrastScanner, ScanLimits, ScanReport};
