//! Stored preset document and its legacy shapes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One preset as written to storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetRecord {
    /// Encoded breakpoint list
    pub w: String,
    /// Target URL captured at save time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub u: Option<String>,
}

/// Shapes accepted when reading. Older releases stored the bare list string.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredPreset {
    Legacy(String),
    Structured {
        w: String,
        #[serde(default)]
        u: Value,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Entries upgraded from the bare-string shape
    pub migrated: usize,
    /// Entries in neither shape, discarded
    pub dropped: usize,
}

impl MigrationReport {
    pub fn needs_write_back(&self) -> bool {
        self.migrated > 0 || self.dropped > 0
    }
}

/// Decode a stored document into the current shape.
///
/// Returns `None` when the document is not a JSON object at all.
pub fn decode_document(raw: &str) -> Option<(BTreeMap<String, PresetRecord>, MigrationReport)> {
    let Value::Object(entries) = serde_json::from_str::<Value>(raw).ok()? else {
        return None;
    };

    let mut report = MigrationReport::default();
    let mut out = BTreeMap::new();
    for (name, value) in entries {
        match serde_json::from_value::<StoredPreset>(value) {
            Ok(StoredPreset::Legacy(w)) => {
                report.migrated += 1;
                out.insert(name, PresetRecord { w, u: None });
            }
            Ok(StoredPreset::Structured { w, u }) => {
                let u = u.as_str().map(str::to_string);
                out.insert(name, PresetRecord { w, u });
            }
            Err(_) => {
                report.dropped += 1;
            }
        }
    }
    Some((out, report))
}

pub fn encode_document(records: &BTreeMap<String, PresetRecord>) -> Result<String, serde_json::Error> {
    serde_json::to_string(records)
}
