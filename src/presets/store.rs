//! Named breakpoint presets, persisted as one JSON document.
//!
//! Every mutation re-reads the stored document first so that concurrent
//! writers lose as little as possible. Storage failures never abort an
//! operation: the in-memory view stays authoritative for the session.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use super::backend::PresetBackend;
use super::record::{decode_document, encode_document, PresetRecord};
use crate::session::{encode_breakpoints, try_decode_breakpoints, Breakpoint};

/// Storage key of the preset document.
pub const PRESETS_KEY: &str = "presets";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PresetError {
    #[error("preset name must not be empty")]
    EmptyName,
    #[error("no preset named {0:?}")]
    NotFound(String),
    #[error("preset {0:?} holds an invalid breakpoint list")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Preset {
    pub name: String,
    pub encoded_breakpoints: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub associated_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Inserted,
    Updated,
}

/// Session changes produced by loading a preset.
#[derive(Debug, Clone, PartialEq)]
pub struct PresetPatch {
    pub name: String,
    pub breakpoints: Vec<Breakpoint>,
    /// Set only when the session had no target loaded.
    pub adopt_url: Option<String>,
}

pub struct PresetStore {
    backend: Arc<dyn PresetBackend>,
    presets: BTreeMap<String, PresetRecord>,
    active: Option<String>,
    /// False after a failed write, until storage accepts one again.
    in_sync: bool,
}

impl PresetStore {
    /// Read every preset, upgrading legacy entries in place.
    pub fn load_all(backend: Arc<dyn PresetBackend>) -> Self {
        let mut store = Self {
            backend,
            presets: BTreeMap::new(),
            active: None,
            in_sync: true,
        };

        let raw = match store.backend.read(PRESETS_KEY) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "Preset storage unreadable, starting empty");
                store.in_sync = false;
                return store;
            }
        };
        let Some(raw) = raw else {
            return store;
        };

        match decode_document(&raw) {
            Some((presets, report)) => {
                store.presets = presets;
                if report.needs_write_back() {
                    tracing::info!(
                        migrated = report.migrated,
                        dropped = report.dropped,
                        "Upgrading stored presets"
                    );
                    let snapshot = store.presets.clone();
                    store.persist(&snapshot);
                }
            }
            None => {
                tracing::warn!("Stored presets are not an object, ignoring");
            }
        }
        store
    }

    pub fn list(&self) -> Vec<Preset> {
        self.presets
            .iter()
            .map(|(name, record)| to_preset(name, record))
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<Preset> {
        self.presets.get(name).map(|r| to_preset(name, r))
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    /// Name of the most recently saved or loaded preset.
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn save(
        &mut self,
        name: &str,
        breakpoints: &[Breakpoint],
        target_url: Option<&str>,
    ) -> Result<SaveOutcome, PresetError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PresetError::EmptyName);
        }

        let mut latest = self.latest();
        let record = PresetRecord {
            w: encode_breakpoints(breakpoints),
            u: target_url.map(str::to_string),
        };
        let outcome = match latest.insert(name.to_string(), record) {
            Some(_) => SaveOutcome::Updated,
            None => SaveOutcome::Inserted,
        };
        self.persist(&latest);
        self.presets = latest;
        self.active = Some(name.to_string());
        tracing::debug!(name, ?outcome, "Saved preset");
        Ok(outcome)
    }

    /// Decode a preset into a session patch. A failed decode changes nothing.
    pub fn load(
        &mut self,
        name: &str,
        current_url: Option<&str>,
    ) -> Result<PresetPatch, PresetError> {
        let name = name.trim();
        let record = self
            .presets
            .get(name)
            .ok_or_else(|| PresetError::NotFound(name.to_string()))?;
        let breakpoints =
            try_decode_breakpoints(&record.w).map_err(|_| PresetError::Invalid(name.to_string()))?;
        let adopt_url = match current_url {
            Some(_) => None,
            None => record.u.clone(),
        };
        self.active = Some(name.to_string());
        Ok(PresetPatch {
            name: name.to_string(),
            breakpoints,
            adopt_url,
        })
    }

    /// Remove a preset. Returns false when nothing by that name existed.
    pub fn delete(&mut self, name: &str) -> bool {
        let name = name.trim();
        let mut latest = self.latest();
        let existed = latest.remove(name).is_some() | self.presets.contains_key(name);
        if !existed {
            return false;
        }
        self.persist(&latest);
        self.presets = latest;
        if self.active.as_deref() == Some(name) {
            self.active = None;
        }
        true
    }

    /// Freshest view for a read-modify-write cycle.
    fn latest(&self) -> BTreeMap<String, PresetRecord> {
        match self.backend.read(PRESETS_KEY) {
            Ok(Some(raw)) => match decode_document(&raw) {
                Some((presets, _)) => presets,
                None => self.presets.clone(),
            },
            Ok(None) if self.in_sync => BTreeMap::new(),
            Ok(None) => self.presets.clone(),
            Err(e) => {
                tracing::warn!(error = %e, "Preset storage unreadable, using cached presets");
                self.presets.clone()
            }
        }
    }

    fn persist(&mut self, presets: &BTreeMap<String, PresetRecord>) {
        let encoded = match encode_document(presets) {
            Ok(encoded) => encoded,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to encode presets");
                self.in_sync = false;
                return;
            }
        };
        match self.backend.write(PRESETS_KEY, &encoded) {
            Ok(()) => self.in_sync = true,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to persist presets");
                self.in_sync = false;
            }
        }
    }
}

fn to_preset(name: &str, record: &PresetRecord) -> Preset {
    Preset {
        name: name.to_string(),
        encoded_breakpoints: record.w.clone(),
        associated_url: record.u.clone(),
    }
}
