//! Shared test utilities
//!
//! - Scripted viewport host with fixed placeholder positions
//! - Document snapshot fixtures and a render substrate serving them
//! - Workbench construction over a manual clock

pub mod documents;
pub mod host;

use std::sync::Arc;

use breakpoint::presets::MemoryBackend;
use breakpoint::viewport::ManualClock;
use breakpoint::{Config, Workbench};

pub const START_MS: u64 = 10_000;

pub struct Harness {
    pub workbench: Workbench,
    pub backend: Arc<MemoryBackend>,
    pub clock: ManualClock,
}

pub fn harness(config: &Config) -> Harness {
    harness_with(config, MemoryBackend::new())
}

pub fn harness_with(config: &Config, backend: MemoryBackend) -> Harness {
    let backend = Arc::new(backend);
    let clock = ManualClock::new(START_MS);
    let workbench = Workbench::new(config, backend.clone(), Arc::new(clock.clone()));
    Harness {
        workbench,
        backend,
        clock,
    }
}

pub fn eager_config() -> Config {
    Config {
        lazy_load: false,
        ..Config::default()
    }
}
