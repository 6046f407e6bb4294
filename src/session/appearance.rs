use serde::{Deserialize, Serialize};

/// Key under which the chosen appearance mode is persisted.
pub const APPEARANCE_KEY: &str = "theme";

/// User-selected appearance. `System` follows the host preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppearanceMode {
    Light,
    Dark,
    #[default]
    System,
}

/// Appearance actually applied after resolving `System`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Appearance {
    Light,
    Dark,
}

impl AppearanceMode {
    pub fn as_str(self) -> &'static str {
        match self {
            AppearanceMode::Light => "light",
            AppearanceMode::Dark => "dark",
            AppearanceMode::System => "system",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "light" => Some(AppearanceMode::Light),
            "dark" => Some(AppearanceMode::Dark),
            "system" => Some(AppearanceMode::System),
            _ => None,
        }
    }

    /// light -> dark -> system -> light
    pub fn cycle(self) -> Self {
        match self {
            AppearanceMode::Light => AppearanceMode::Dark,
            AppearanceMode::Dark => AppearanceMode::System,
            AppearanceMode::System => AppearanceMode::Light,
        }
    }

    pub fn resolve(self, system_prefers_dark: bool) -> Appearance {
        match self {
            AppearanceMode::Light => Appearance::Light,
            AppearanceMode::Dark => Appearance::Dark,
            AppearanceMode::System if system_prefers_dark => Appearance::Dark,
            AppearanceMode::System => Appearance::Light,
        }
    }
}
