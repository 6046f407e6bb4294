//! Named, persisted breakpoint presets.

mod backend;
mod record;
mod store;

pub use backend::{BackendError, MemoryBackend, PresetBackend};
pub use record::{decode_document, MigrationReport, PresetRecord};
pub use store::{Preset, PresetError, PresetPatch, PresetStore, SaveOutcome, PRESETS_KEY};
