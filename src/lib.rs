pub mod a11y;
pub mod config;
pub mod data;
pub mod presets;
pub mod session;
pub mod util;
pub mod viewport;
pub mod web;
pub mod workbench;

pub use a11y::{ContrastScanner, DocumentSnapshot, RenderSubstrate, ScanReport};
pub use config::Config;
pub use data::{AppStateStore, Database};
pub use presets::{MemoryBackend, PresetBackend, PresetStore};
pub use session::{Breakpoint, BreakpointId, SessionState, Unit};
pub use viewport::{Clock, ViewportEvent, ViewportHost};
pub use workbench::{Action, Effect, Workbench};
