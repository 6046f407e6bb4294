//! The preview workbench: a single-threaded reducer over the session,
//! presets and viewport runtime.
//!
//! Host callbacks arrive as [`ViewportEvent`]s and user operations as
//! [`Action`]s. Both mutate state synchronously and return the [`Effect`]s the
//! host must carry out.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::a11y::{ContrastScanner, RenderSubstrate, ScanReport};
use crate::config::Config;
use crate::presets::{PresetBackend, PresetError, PresetStore, SaveOutcome};
use crate::session::{
    AppearanceMode, BreakpointId, SessionError, SessionState, APPEARANCE_KEY,
};
use crate::viewport::{
    Clock, ClockTicker, HostilePatterns, LoadAverage, LoadStart, LoadStatusMachine, ViewportArena,
    ViewportEvent, ViewportHost, VisibilityScheduler,
};

use super::action::Action;
use super::effect::{Effect, Notice};
use super::frame::{frame_key, FrameView};

#[derive(Debug, Error)]
pub enum WorkbenchError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Preset(#[from] PresetError),
}

pub struct Workbench {
    session: SessionState,
    presets: PresetStore,
    arena: ViewportArena,
    scheduler: VisibilityScheduler,
    status: LoadStatusMachine,
    scanner: ContrastScanner,
    scans: BTreeMap<BreakpointId, ScanReport>,
    backend: Arc<dyn PresetBackend>,
    clock: Arc<dyn Clock>,
    tick_interval: Duration,
    /// Last locator written or restored; foreign keys in it are preserved
    address: String,
    clock_running: bool,
}

impl Workbench {
    pub fn new(config: &Config, backend: Arc<dyn PresetBackend>, clock: Arc<dyn Clock>) -> Self {
        let mut session = SessionState::default();
        session.appearance = stored_appearance(backend.as_ref()).unwrap_or(config.appearance);

        let mut arena = ViewportArena::new();
        arena.sync(&session.breakpoints);

        let hostile = HostilePatterns::builtin().with_extra(config.hostile_hosts.iter());
        let mut status = LoadStatusMachine::new(config.thresholds, hostile);
        status.tick(clock.now());

        Self {
            session,
            presets: PresetStore::load_all(backend.clone()),
            arena,
            scheduler: VisibilityScheduler::new(config.lazy_load, config.observe),
            status,
            scanner: ContrastScanner::new(config.scan),
            scans: BTreeMap::new(),
            backend,
            clock,
            tick_interval: config.tick_interval,
            address: String::new(),
            clock_running: false,
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn presets(&self) -> &PresetStore {
        &self.presets
    }

    pub fn arena(&self) -> &ViewportArena {
        &self.arena
    }

    pub fn scheduler(&self) -> &VisibilityScheduler {
        &self.scheduler
    }

    pub fn is_clock_running(&self) -> bool {
        self.clock_running
    }

    /// A status clock sampling this workbench's clock at the configured
    /// interval. Start and stop it as `StartClock`/`StopClock` effects arrive.
    pub fn clock_ticker(&self) -> ClockTicker {
        ClockTicker::new(self.tick_interval, self.clock.clone())
    }

    /// Apply the locator the page was opened with and arm the viewports.
    /// The locator is not rewritten.
    pub fn restore(&mut self, locator: &str, host: &mut dyn ViewportHost) -> Vec<Effect> {
        self.address = locator.to_string();
        self.session.apply_locator(locator);
        self.sync_viewports();

        let mut effects = Vec::new();
        self.arm(host);
        self.clock_effects(&mut effects);
        effects
    }

    /// Current session as a shareable locator.
    pub fn share_link(&self) -> String {
        self.session.locator_over(&self.address)
    }

    pub fn dispatch(
        &mut self,
        action: Action,
        host: &mut dyn ViewportHost,
    ) -> Result<Vec<Effect>, WorkbenchError> {
        self.status.tick(self.clock.now());
        let mut effects = Vec::new();

        match action {
            Action::LoadUrl(url) => {
                self.session.load_url(&url)?;
                tracing::info!(url = %url, "Loading target");
                self.restart_eligible();
                self.arm(host);
                self.write_locator(&mut effects);
            }
            Action::OpenExternally => {
                if let Some(url) = &self.session.target_url {
                    effects.push(Effect::OpenExternal(url.clone()));
                }
            }
            Action::AddBreakpoint { width, unit } => {
                self.session.add_breakpoint(width, unit)?;
                self.breakpoints_changed(host, &mut effects);
            }
            Action::UpdateBreakpoint { id, width, unit } => {
                self.session.update_breakpoint(&id, width, unit)?;
                self.breakpoints_changed(host, &mut effects);
            }
            Action::RemoveBreakpoint(id) => {
                if self.session.remove_breakpoint(&id).is_none() {
                    return Err(SessionError::UnknownBreakpoint(id).into());
                }
                self.breakpoints_changed(host, &mut effects);
            }
            Action::ResetSession => {
                self.session.reset();
                self.breakpoints_changed(host, &mut effects);
            }
            Action::SetFrameHeight(height) => {
                self.session.set_frame_height(height);
                self.write_locator(&mut effects);
            }
            Action::SetAppearance(mode) => {
                self.set_appearance(mode, &mut effects);
            }
            Action::CycleAppearance => {
                let mode = self.session.appearance.cycle();
                self.set_appearance(mode, &mut effects);
            }
            Action::SetLazyLoad(lazy) => {
                let starts = self
                    .scheduler
                    .set_lazy(lazy, &mut self.arena, host, self.status.now());
                self.begin_loads(starts);
            }
            Action::LoadNow(id) => {
                if let Some(start) = self.scheduler.load_now(&id, &mut self.arena, self.status.now()) {
                    self.begin_loads(vec![start]);
                }
            }
            Action::ReloadFrame(id) => {
                if self.session.target_url.is_some() {
                    let now = self.status.now();
                    if let Some(count) = self.status.reload(&mut self.arena, &id, now) {
                        effects.push(Effect::RemountFrame {
                            key: frame_key(&id, count),
                            id,
                        });
                    }
                }
            }
            Action::SavePreset(name) => {
                let outcome = self.presets.save(
                    &name,
                    &self.session.breakpoints,
                    self.session.target_url.as_deref(),
                )?;
                let message = match outcome {
                    SaveOutcome::Inserted => "Preset saved",
                    SaveOutcome::Updated => "Preset updated",
                };
                effects.push(Effect::Notify(Notice::success(message)));
            }
            Action::LoadPreset(name) => {
                match self.presets.load(&name, self.session.target_url.as_deref()) {
                    Ok(patch) => {
                        self.session.replace_breakpoints(patch.breakpoints);
                        self.sync_viewports();
                        if let Some(url) = patch.adopt_url {
                            if self.session.load_url(&url).is_ok() {
                                self.restart_eligible();
                            }
                        }
                        self.breakpoints_changed(host, &mut effects);
                        effects.push(Effect::Notify(Notice::info(format!(
                            "Loaded preset {}",
                            patch.name
                        ))));
                    }
                    Err(PresetError::Invalid(_)) => {
                        tracing::warn!(name = %name, "Stored preset does not decode");
                        effects.push(Effect::Notify(Notice::error("Preset is invalid")));
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            Action::DeletePreset(name) => {
                if !self.presets.delete(&name) {
                    return Err(PresetError::NotFound(name).into());
                }
                effects.push(Effect::Notify(Notice::info("Preset deleted")));
            }
            Action::CopyShareLink => {
                effects.push(Effect::CopyToClipboard(self.share_link()));
            }
            Action::ShareCopied(ok) => {
                let notice = if ok {
                    Notice::success("Share link copied")
                } else {
                    Notice::error("Copy failed")
                };
                effects.push(Effect::Notify(notice));
            }
        }

        self.clock_effects(&mut effects);
        Ok(effects)
    }

    /// Consume a host or clock notification.
    pub fn handle_event(&mut self, event: ViewportEvent) -> Vec<Effect> {
        match event {
            ViewportEvent::VisibilityEntered { handle, id, at } => {
                self.status.tick(at);
                if let Some(start) = self.scheduler.on_visible(handle, &id, &mut self.arena, at) {
                    self.begin_loads(vec![start]);
                }
            }
            ViewportEvent::LoadCompleted { id, at } => {
                if let Some(ms) = self.status.complete(&mut self.arena, &id, at) {
                    tracing::debug!(viewport = %id, load_ms = ms, "Frame loaded");
                }
            }
            ViewportEvent::Tick { at } => self.status.tick(at),
        }

        let mut effects = Vec::new();
        self.clock_effects(&mut effects);
        effects
    }

    /// Render state for every viewport, in breakpoint order.
    pub fn frames(&self) -> Vec<FrameView> {
        let host = self.session.target_host();
        self.session
            .breakpoints
            .iter()
            .filter_map(|bp| {
                let slot = self.arena.get(&bp.id)?;
                let should_load = slot.eligible && self.session.target_url.is_some();
                let status = self.status.status(&self.arena, &bp.id, host.as_deref());
                let reload_count = slot.record.map_or(0, |r| r.reload_count);
                Some(FrameView {
                    id: bp.id.clone(),
                    label: bp.label(),
                    should_load,
                    status,
                    controls: status.controls(),
                    load_ms: slot.last_load_ms,
                    frame_key: frame_key(&bp.id, reload_count),
                    src: should_load.then(|| self.session.target_url.clone()).flatten(),
                })
            })
            .collect()
    }

    pub fn average_load(&self) -> Option<LoadAverage> {
        self.status.average_load(&self.arena)
    }

    /// Run the contrast scanner over every loaded viewport.
    pub fn scan(&mut self, substrate: &mut dyn RenderSubstrate) -> &BTreeMap<BreakpointId, ScanReport> {
        let loaded: Vec<BreakpointId> = self
            .arena
            .iter()
            .filter(|(_, slot)| slot.eligible)
            .map(|(id, _)| id.clone())
            .collect();
        self.scans = self.scanner.scan(&loaded, substrate);
        &self.scans
    }

    pub fn scan_report(&self, id: &BreakpointId) -> Option<&ScanReport> {
        self.scans.get(id)
    }

    fn sync_viewports(&mut self) {
        for id in self.arena.sync(&self.session.breakpoints) {
            self.scans.remove(&id);
            tracing::debug!(viewport = %id, "Dropped viewport");
        }
    }

    fn breakpoints_changed(&mut self, host: &mut dyn ViewportHost, effects: &mut Vec<Effect>) {
        self.sync_viewports();
        self.arm(host);
        self.write_locator(effects);
    }

    fn arm(&mut self, host: &mut dyn ViewportHost) {
        let starts = self.scheduler.arm(&mut self.arena, host, self.status.now());
        self.begin_loads(starts);
    }

    /// Open load cycles. Without a target nothing loads; eligibility is kept
    /// so the cycles open once a target arrives.
    fn begin_loads(&mut self, starts: Vec<LoadStart>) {
        if self.session.target_url.is_none() {
            return;
        }
        for start in starts {
            self.status.begin(&mut self.arena, &start);
        }
    }

    /// A new target reloads every mounted frame.
    fn restart_eligible(&mut self) {
        let now = self.status.now();
        let starts: Vec<LoadStart> = self
            .arena
            .iter()
            .filter(|(_, slot)| slot.eligible)
            .map(|(id, _)| LoadStart { id: id.clone(), at: now })
            .collect();
        self.begin_loads(starts);
    }

    fn set_appearance(&mut self, mode: AppearanceMode, effects: &mut Vec<Effect>) {
        self.session.appearance = mode;
        if let Err(e) = self.backend.write(APPEARANCE_KEY, mode.as_str()) {
            tracing::warn!(error = %e, "Failed to persist appearance");
        }
        self.write_locator(effects);
    }

    fn write_locator(&mut self, effects: &mut Vec<Effect>) {
        let locator = self.share_link();
        self.address = locator.clone();
        effects.push(Effect::ReplaceLocator(locator));
    }

    fn clock_effects(&mut self, effects: &mut Vec<Effect>) {
        let pending = self.arena.any_open();
        if pending && !self.clock_running {
            self.clock_running = true;
            effects.push(Effect::StartClock);
        } else if !pending && self.clock_running {
            self.clock_running = false;
            effects.push(Effect::StopClock);
        }
    }
}

fn stored_appearance(backend: &dyn PresetBackend) -> Option<AppearanceMode> {
    match backend.read(APPEARANCE_KEY) {
        Ok(raw) => raw.as_deref().and_then(AppearanceMode::parse),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read stored appearance");
            None
        }
    }
}
