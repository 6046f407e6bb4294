//! Opening a shared locator and writing it back after edits.

use breakpoint::session::{AppearanceMode, SessionState, Unit};
use breakpoint::viewport::{LoadStatus, ViewportEvent};
use breakpoint::{Action, Config, Effect};

use super::common::host::ScriptedHost;
use super::common::{eager_config, harness};

#[test]
fn test_shared_link_opens_two_independent_lazy_cycles() {
    let mut h = harness(&Config::default());
    let mut host = ScriptedHost::new(800.0);

    // Decoded ids depend only on position and width.
    let state = SessionState::from_locator("?u=https://example.com&w=360px,768px&h=600&t=dark");
    let ids: Vec<_> = state.breakpoints.iter().map(|b| b.id.clone()).collect();
    host.layout(&ids, 1200.0);

    let effects = h
        .workbench
        .restore("?u=https://example.com&w=360px,768px&h=600&t=dark", &mut host);
    assert_eq!(effects, vec![Effect::StartClock]);

    let session = h.workbench.session();
    assert_eq!(session.breakpoints.len(), 2);
    assert_eq!(session.frame_height, 600);
    assert_eq!(session.appearance, AppearanceMode::Dark);
    assert_eq!(session.target_url.as_deref(), Some("https://example.com"));

    let frames = h.workbench.frames();
    assert!(frames[0].should_load);
    assert!(!frames[1].should_load);
    let (handle, targets) = host.current().cloned().unwrap();
    assert_eq!(targets, vec![ids[1].clone()]);

    let at = h.clock.advance(300);
    let effects = h.workbench.handle_event(ViewportEvent::LoadCompleted {
        id: ids[0].clone(),
        at,
    });
    assert_eq!(effects, vec![Effect::StopClock]);

    let at = h.clock.advance(200);
    let effects = h.workbench.handle_event(ViewportEvent::VisibilityEntered {
        handle,
        id: ids[1].clone(),
        at,
    });
    assert_eq!(effects, vec![Effect::StartClock]);

    let at = h.clock.advance(900);
    h.workbench.handle_event(ViewportEvent::LoadCompleted {
        id: ids[1].clone(),
        at,
    });

    let frames = h.workbench.frames();
    assert_eq!(frames[0].load_ms, Some(300));
    assert_eq!(frames[1].load_ms, Some(900));
    assert!(frames.iter().all(|f| f.status == LoadStatus::Idle));
    assert_eq!(h.workbench.average_load().map(|a| a.avg_ms), Some(600.0));
}

#[test]
fn test_malformed_widths_keep_defaults() {
    let mut h = harness(&eager_config());
    let mut host = ScriptedHost::new(800.0);
    h.workbench.restore("?w=360px,bogus&h=9999", &mut host);

    let widths: Vec<f64> = h.workbench.session().breakpoints.iter().map(|b| b.width).collect();
    assert_eq!(widths, vec![360.0, 480.0, 768.0, 1024.0, 1280.0]);
    assert_eq!(h.workbench.session().frame_height, 1200);
}

#[test]
fn test_edits_rewrite_locator_in_key_order() {
    let mut h = harness(&eager_config());
    let mut host = ScriptedHost::new(800.0);
    h.workbench.restore("?utm_source=mail&w=360px", &mut host);

    h.workbench
        .dispatch(Action::LoadUrl("https://example.com/docs".into()), &mut host)
        .unwrap();
    let effects = h
        .workbench
        .dispatch(
            Action::AddBreakpoint {
                width: 48.0,
                unit: Unit::Em,
            },
            &mut host,
        )
        .unwrap();

    let locator = effects
        .iter()
        .find_map(|e| match e {
            Effect::ReplaceLocator(l) => Some(l.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(
        locator,
        "?utm_source=mail&w=48em%2C360px&u=https%3A%2F%2Fexample.com%2Fdocs&h=600&t=system"
    );

    let reopened = SessionState::from_locator(&locator);
    assert_eq!(reopened.target_url.as_deref(), Some("https://example.com/docs"));
    assert_eq!(reopened.breakpoints.len(), 2);
}

#[test]
fn test_reset_keeps_target_and_appearance() {
    let mut h = harness(&eager_config());
    let mut host = ScriptedHost::new(800.0);
    h.workbench
        .restore("?u=https://example.com&w=360px&h=900&t=light", &mut host);

    h.workbench.dispatch(Action::ResetSession, &mut host).unwrap();
    let session = h.workbench.session();
    assert_eq!(session.breakpoints.len(), 5);
    assert_eq!(session.frame_height, 600);
    assert_eq!(session.appearance, AppearanceMode::Light);
    assert_eq!(session.target_url.as_deref(), Some("https://example.com"));
}
