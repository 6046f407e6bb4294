//! Lazy scheduling and status classification driven by the status clock.

use breakpoint::viewport::{
    FrameControl, LoadStatus, ManualClock, ViewportEvent, DEFAULT_BLOCKED_AFTER_MS,
    DEFAULT_SLOW_AFTER_MS,
};
use breakpoint::{Action, Config, Effect};
use tokio::sync::mpsc;

use super::common::host::ScriptedHost;
use super::common::{eager_config, harness};

#[test]
fn test_status_moves_through_slow_and_blocked() {
    let mut h = harness(&eager_config());
    let mut host = ScriptedHost::new(800.0);
    h.workbench.restore("?u=https://example.com&w=360px", &mut host);
    assert_eq!(h.workbench.frames()[0].status, LoadStatus::Pending);

    let at = h.clock.advance(DEFAULT_SLOW_AFTER_MS - 1);
    h.workbench.handle_event(ViewportEvent::Tick { at });
    assert_eq!(h.workbench.frames()[0].status, LoadStatus::Pending);

    let at = h.clock.advance(1);
    h.workbench.handle_event(ViewportEvent::Tick { at });
    let frames = h.workbench.frames();
    let frame = &frames[0];
    assert_eq!(frame.status, LoadStatus::Slow);
    assert_eq!(frame.controls, &[FrameControl::Reload]);

    let at = h.clock.advance(DEFAULT_BLOCKED_AFTER_MS - DEFAULT_SLOW_AFTER_MS);
    h.workbench.handle_event(ViewportEvent::Tick { at });
    let frames = h.workbench.frames();
    let frame = &frames[0];
    assert_eq!(frame.status, LoadStatus::Blocked);
    assert_eq!(
        frame.controls,
        &[FrameControl::Retry, FrameControl::OpenExternally]
    );

    let effects = h.workbench.dispatch(Action::OpenExternally, &mut host).unwrap();
    assert_eq!(effects, vec![Effect::OpenExternal("https://example.com".into())]);
}

#[test]
fn test_retry_restarts_the_cycle() {
    let mut h = harness(&eager_config());
    let mut host = ScriptedHost::new(800.0);
    h.workbench.restore("?u=https://example.com&w=360px", &mut host);
    let id = h.workbench.frames()[0].id.clone();

    let at = h.clock.advance(DEFAULT_BLOCKED_AFTER_MS);
    h.workbench.handle_event(ViewportEvent::Tick { at });
    assert_eq!(h.workbench.frames()[0].status, LoadStatus::Blocked);

    let effects = h.workbench.dispatch(Action::ReloadFrame(id.clone()), &mut host).unwrap();
    assert!(matches!(&effects[..], [Effect::RemountFrame { key, .. }] if key.ends_with(":1")));
    assert_eq!(h.workbench.frames()[0].status, LoadStatus::Pending);

    let at = h.clock.advance(250);
    h.workbench.handle_event(ViewportEvent::LoadCompleted { id, at });
    assert_eq!(h.workbench.frames()[0].load_ms, Some(250));
}

#[test]
fn test_late_completion_from_removed_viewport_is_ignored() {
    let mut h = harness(&eager_config());
    let mut host = ScriptedHost::new(800.0);
    h.workbench.restore("?u=https://example.com&w=360px,768px", &mut host);
    let removed = h.workbench.frames()[0].id.clone();

    h.workbench
        .dispatch(Action::RemoveBreakpoint(removed.clone()), &mut host)
        .unwrap();
    let at = h.clock.advance(100);
    h.workbench
        .handle_event(ViewportEvent::LoadCompleted { id: removed, at });

    assert_eq!(h.workbench.average_load(), None);
    assert_eq!(h.workbench.frames().len(), 1);
    assert_eq!(h.workbench.frames()[0].status, LoadStatus::Pending);
}

#[test]
fn test_stale_observation_is_dropped_after_rearm() {
    let mut h = harness(&Config::default());
    let mut host = ScriptedHost::new(0.0);
    h.workbench.restore("?u=https://example.com&w=360px,768px", &mut host);
    let (stale, _) = host.current().cloned().unwrap();
    let id = h.workbench.frames()[1].id.clone();

    // Adding a breakpoint re-arms under a new observation.
    h.workbench
        .dispatch(
            Action::AddBreakpoint {
                width: 1440.0,
                unit: breakpoint::session::Unit::Px,
            },
            &mut host,
        )
        .unwrap();
    assert!(host.disconnected.contains(&stale));

    let at = h.clock.advance(10);
    h.workbench
        .handle_event(ViewportEvent::VisibilityEntered { handle: stale, id, at });
    assert!(h.workbench.frames().iter().all(|f| !f.should_load));
}

#[test]
fn test_turning_lazy_off_loads_everything() {
    let mut h = harness(&Config::default());
    let mut host = ScriptedHost::new(0.0);
    h.workbench.restore("?u=https://example.com", &mut host);
    assert!(h.workbench.frames().iter().all(|f| !f.should_load));

    let effects = h.workbench.dispatch(Action::SetLazyLoad(false), &mut host).unwrap();
    assert_eq!(effects, vec![Effect::StartClock]);
    assert!(h.workbench.frames().iter().all(|f| f.should_load));
    assert!(host.current().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_ticker_feeds_the_workbench_until_loads_finish() {
    let mut h = harness(&eager_config());
    let mut host = ScriptedHost::new(800.0);
    let ticker = h.workbench.clock_ticker();
    let (tx, mut rx) = mpsc::unbounded_channel();

    let effects = h.workbench.restore("?u=https://example.com&w=360px", &mut host);
    for effect in effects {
        match effect {
            Effect::StartClock => assert!(ticker.start(tx.clone())),
            Effect::StopClock => assert!(ticker.stop()),
            _ => {}
        }
    }
    assert!(ticker.is_running());

    let mut statuses = Vec::new();
    for _ in 0..5 {
        h.clock.advance(500);
        let event = rx.recv().await.unwrap();
        h.workbench.handle_event(event);
        statuses.push(h.workbench.frames()[0].status);
    }
    assert_eq!(
        statuses,
        vec![
            LoadStatus::Pending,
            LoadStatus::Pending,
            LoadStatus::Pending,
            LoadStatus::Slow,
            LoadStatus::Slow,
        ]
    );

    let id = h.workbench.frames()[0].id.clone();
    let effects = h.workbench.handle_event(ViewportEvent::LoadCompleted {
        id,
        at: h.clock.advance(10),
    });
    assert_eq!(effects, vec![Effect::StopClock]);
    assert!(ticker.stop());
    assert!(!ticker.is_running());
}

#[test]
fn test_manual_clock_is_shared_between_clones() {
    let clock = ManualClock::new(5);
    let other = clock.clone();
    clock.advance(10);
    assert_eq!(breakpoint::Clock::now(&other), 15);
}
