//! Presets persisted through sqlite and driven from the workbench.

use std::sync::Arc;

use breakpoint::presets::{MemoryBackend, PresetBackend, PresetStore, PRESETS_KEY};
use breakpoint::session::{encode_breakpoints, APPEARANCE_KEY};
use breakpoint::workbench::NoticeLevel;
use breakpoint::{Action, AppStateStore, Database, Effect, Workbench};
use tempfile::TempDir;

use super::common::host::ScriptedHost;
use super::common::{eager_config, harness_with};

fn sqlite_backend(dir: &TempDir) -> Arc<AppStateStore> {
    let db = Database::open(dir.path().join("breakpoint.db")).unwrap();
    Arc::new(AppStateStore::new(db.connection()))
}

fn notices(effects: &[Effect]) -> Vec<(NoticeLevel, &str)> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::Notify(n) => Some((n.level, n.message.as_str())),
            _ => None,
        })
        .collect()
}

#[test]
fn test_presets_survive_reopening_the_database() {
    let dir = TempDir::new().unwrap();
    let clock = Arc::new(breakpoint::viewport::ManualClock::new(0));
    let mut host = ScriptedHost::new(800.0);

    {
        let mut wb = Workbench::new(&eager_config(), sqlite_backend(&dir), clock.clone());
        wb.restore("?u=https://example.com&w=375px,414px", &mut host);
        let effects = wb.dispatch(Action::SavePreset("Phones".into()), &mut host).unwrap();
        assert_eq!(notices(&effects), vec![(NoticeLevel::Success, "Preset saved")]);
    }

    let store = PresetStore::load_all(sqlite_backend(&dir));
    let preset = store.get("Phones").unwrap();
    assert_eq!(preset.encoded_breakpoints, "375px,414px");
    assert_eq!(preset.associated_url.as_deref(), Some("https://example.com"));
}

#[test]
fn test_legacy_sqlite_document_is_upgraded() {
    let dir = TempDir::new().unwrap();
    let backend = sqlite_backend(&dir);
    backend
        .write(PRESETS_KEY, r#"{"A": "360px,768px", "B": {"w": "1024px", "u": "https://b.test"}}"#)
        .unwrap();

    let mut store = PresetStore::load_all(backend.clone());
    assert_eq!(store.len(), 2);
    assert_eq!(store.get("A").unwrap().associated_url, None);

    let stored: serde_json::Value =
        serde_json::from_str(&backend.read(PRESETS_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(stored["A"], serde_json::json!({"w": "360px,768px"}));
    assert_eq!(stored["B"]["u"], "https://b.test");

    let first = store.load("A", None).unwrap();
    let second = store.load("A", None).unwrap();
    assert_eq!(encode_breakpoints(&first.breakpoints), "360px,768px");
    assert_eq!(first.breakpoints, second.breakpoints);
}

#[test]
fn test_two_sessions_do_not_lose_each_others_presets() {
    let dir = TempDir::new().unwrap();
    let mut host = ScriptedHost::new(800.0);
    let clock = Arc::new(breakpoint::viewport::ManualClock::new(0));

    let mut left = Workbench::new(&eager_config(), sqlite_backend(&dir), clock.clone());
    let mut right = Workbench::new(&eager_config(), sqlite_backend(&dir), clock);

    left.dispatch(Action::SavePreset("Left".into()), &mut host).unwrap();
    right.dispatch(Action::SavePreset("Right".into()), &mut host).unwrap();

    let names: Vec<String> = PresetStore::load_all(sqlite_backend(&dir))
        .list()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, vec!["Left", "Right"]);
}

#[test]
fn test_loading_preset_applies_breakpoints_and_rewrites_locator() {
    let backend = MemoryBackend::new().with_entry(
        PRESETS_KEY,
        r#"{"Tablets": {"w": "768px,1024px", "u": "https://tablets.test"}}"#,
    );
    let mut h = harness_with(&eager_config(), backend);
    let mut host = ScriptedHost::new(800.0);
    h.workbench.restore("", &mut host);

    let effects = h
        .workbench
        .dispatch(Action::LoadPreset("Tablets".into()), &mut host)
        .unwrap();
    assert_eq!(notices(&effects), vec![(NoticeLevel::Info, "Loaded preset Tablets")]);
    assert!(effects.contains(&Effect::ReplaceLocator(
        "?w=768px%2C1024px&u=https%3A%2F%2Ftablets.test&h=600&t=system".into()
    )));
    assert!(effects.contains(&Effect::StartClock));
    assert_eq!(h.workbench.presets().active(), Some("Tablets"));
    assert_eq!(h.workbench.frames().len(), 2);
}

#[test]
fn test_appearance_choice_is_stored_next_to_presets() {
    let dir = TempDir::new().unwrap();
    let mut host = ScriptedHost::new(800.0);
    let clock = Arc::new(breakpoint::viewport::ManualClock::new(0));

    let mut wb = Workbench::new(&eager_config(), sqlite_backend(&dir), clock.clone());
    wb.dispatch(
        Action::SetAppearance(breakpoint::session::AppearanceMode::Dark),
        &mut host,
    )
    .unwrap();

    let backend = sqlite_backend(&dir);
    assert_eq!(backend.read(APPEARANCE_KEY).unwrap().as_deref(), Some("dark"));
    let reopened = Workbench::new(&eager_config(), backend, clock);
    assert_eq!(
        reopened.session().appearance,
        breakpoint::session::AppearanceMode::Dark
    );
}
