use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::a11y::ScanLimits;
use crate::session::AppearanceMode;
use crate::util::paths::config_path;
use crate::viewport::{ObserveOptions, StatusThresholds};
use crate::web::ServerConfig;

/// Example configuration file contents (bundled with the binary)
pub const EXAMPLE_CONFIG: &str = include_str!("config.toml.example");

/// Default interval between status clock samples while any frame is loading
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 500;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Defer frame loads until their placeholder nears the visible area
    pub lazy_load: bool,
    /// Margin and threshold handed to the visibility observer
    pub observe: ObserveOptions,
    /// Elapsed-time thresholds for slow and blocked classification
    pub thresholds: StatusThresholds,
    /// How often the status clock is sampled while a load is pending
    pub tick_interval: Duration,
    /// Extra hostile hosts appended to the built-in list
    pub hostile_hosts: Vec<String>,
    /// Initial appearance when nothing has been persisted yet
    pub appearance: AppearanceMode,
    /// Contrast scanner limits
    pub scan: ScanLimits,
    /// Proxy server settings
    pub server: ServerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lazy_load: true,
            observe: ObserveOptions::default(),
            thresholds: StatusThresholds::default(),
            tick_interval: Duration::from_millis(DEFAULT_TICK_INTERVAL_MS),
            hostile_hosts: Vec::new(),
            appearance: AppearanceMode::System,
            scan: ScanLimits::default(),
            server: ServerConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlViewportConfig {
    pub lazy_load: Option<bool>,
    pub lookahead_margin_px: Option<f64>,
    pub intersection_threshold: Option<f64>,
    pub appearance: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlStatusConfig {
    pub slow_after_ms: Option<u64>,
    pub blocked_after_ms: Option<u64>,
    pub tick_interval_ms: Option<u64>,
    pub hostile_hosts: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlScanConfig {
    pub max_elements: Option<usize>,
    pub max_text_chars: Option<usize>,
    pub sample_chars: Option<usize>,
    pub path_depth: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user_agent: Option<String>,
}

/// Full TOML config file structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub viewport: Option<TomlViewportConfig>,
    pub status: Option<TomlStatusConfig>,
    pub scan: Option<TomlScanConfig>,
    pub server: Option<TomlServerConfig>,
}

impl Config {
    /// Load config from the default location, falling back to defaults
    pub fn load() -> Self {
        let config_file = config_path();

        // Create example config on first run
        if !config_file.exists() {
            Self::create_default_config(&config_file);
        }

        let contents = match fs::read_to_string(&config_file) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::debug!(path = %config_file.display(), error = %e, "No readable config");
                return Config::default();
            }
        };

        match Self::from_toml_str(&contents) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(
                    path = %config_file.display(),
                    error = %e,
                    "Failed to parse config, using defaults"
                );
                Config::default()
            }
        }
    }

    /// Parse a config document and merge it over the defaults
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        let toml_config = toml::from_str::<TomlConfig>(contents)?;
        let mut config = Config::default();
        config.merge(toml_config);
        Ok(config)
    }

    fn merge(&mut self, toml_config: TomlConfig) {
        if let Some(viewport) = toml_config.viewport {
            if let Some(lazy_load) = viewport.lazy_load {
                self.lazy_load = lazy_load;
            }
            if let Some(margin) = viewport.lookahead_margin_px {
                if margin.is_finite() && margin >= 0.0 {
                    self.observe.margin_px = margin;
                } else {
                    tracing::warn!(margin, "Ignoring invalid lookahead margin");
                }
            }
            if let Some(threshold) = viewport.intersection_threshold {
                if (0.0..=1.0).contains(&threshold) {
                    self.observe.threshold = threshold;
                } else {
                    tracing::warn!(threshold, "Ignoring intersection threshold outside 0..=1");
                }
            }
            if let Some(appearance) = viewport.appearance {
                match AppearanceMode::parse(&appearance) {
                    Some(mode) => self.appearance = mode,
                    None => tracing::warn!(value = %appearance, "Unknown appearance mode"),
                }
            }
        }

        if let Some(status) = toml_config.status {
            let slow = status
                .slow_after_ms
                .unwrap_or(self.thresholds.slow_after_ms);
            let blocked = status
                .blocked_after_ms
                .unwrap_or(self.thresholds.blocked_after_ms);
            match StatusThresholds::new(slow, blocked) {
                Some(thresholds) => self.thresholds = thresholds,
                None => tracing::warn!(
                    slow_after_ms = slow,
                    blocked_after_ms = blocked,
                    "Status thresholds must satisfy 0 < slow < blocked, using defaults"
                ),
            }
            match status.tick_interval_ms {
                Some(0) => tracing::warn!("Tick interval must be positive, using default"),
                Some(ms) => self.tick_interval = Duration::from_millis(ms),
                None => {}
            }
            if let Some(hosts) = status.hostile_hosts {
                self.hostile_hosts = hosts
                    .into_iter()
                    .map(|h| h.trim().to_ascii_lowercase())
                    .filter(|h| !h.is_empty())
                    .collect();
            }
        }

        if let Some(scan) = toml_config.scan {
            merge_positive(&mut self.scan.max_elements, scan.max_elements, "max_elements");
            merge_positive(
                &mut self.scan.max_text_chars,
                scan.max_text_chars,
                "max_text_chars",
            );
            merge_positive(&mut self.scan.sample_chars, scan.sample_chars, "sample_chars");
            merge_positive(&mut self.scan.path_depth, scan.path_depth, "path_depth");
        }

        if let Some(server) = toml_config.server {
            if let Some(host) = server.host {
                self.server.host = host;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
            if let Some(user_agent) = server.user_agent {
                self.server.user_agent = user_agent;
            }
        }
    }

    /// Create the default config file from the bundled example
    fn create_default_config(path: &PathBuf) {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                if let Err(e) = fs::create_dir_all(parent) {
                    tracing::warn!(error = %e, "Failed to create config directory");
                    return;
                }
            }
        }

        if let Err(e) = fs::write(path, EXAMPLE_CONFIG) {
            tracing::warn!(error = %e, "Failed to write default config");
        }
    }
}

fn merge_positive(slot: &mut usize, value: Option<usize>, field: &'static str) {
    match value {
        Some(0) => tracing::warn!(field, "Scan limit must be positive, using default"),
        Some(v) => *slot = v,
        None => {}
    }
}
