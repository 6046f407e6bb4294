mod settings;

pub use settings::{Config, DEFAULT_TICK_INTERVAL_MS, EXAMPLE_CONFIG};
