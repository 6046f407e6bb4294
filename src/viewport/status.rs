//! Load status classification from elapsed time and target host.
//!
//! An open cycle reads pending, then slow, then blocked as time passes.
//! Targets on a hostile host are blocked from the first sample. Completion
//! always returns the viewport to idle.

use serde::Serialize;

use super::arena::{LoadRecord, ViewportArena};
use super::clock::Millis;
use super::scheduler::LoadStart;
use crate::session::BreakpointId;

pub const DEFAULT_SLOW_AFTER_MS: Millis = 2000;
pub const DEFAULT_BLOCKED_AFTER_MS: Millis = 3500;

/// Hosts known to refuse being embedded in a frame.
pub const BUILTIN_HOSTILE_HOSTS: &[&str] = &[
    "google.com",
    "youtube.com",
    "facebook.com",
    "instagram.com",
    "twitter.com",
    "x.com",
    "linkedin.com",
    "github.com",
    "amazon.com",
    "apple.com",
    "microsoft.com",
    "paypal.com",
    "netflix.com",
    "stackoverflow.com",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadStatus {
    Idle,
    Pending,
    Slow,
    Blocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FrameControl {
    Reload,
    Retry,
    OpenExternally,
}

impl LoadStatus {
    /// Controls offered to the user for a frame in this status.
    pub fn controls(self) -> &'static [FrameControl] {
        match self {
            LoadStatus::Slow => &[FrameControl::Reload],
            LoadStatus::Blocked => &[FrameControl::Retry, FrameControl::OpenExternally],
            LoadStatus::Idle | LoadStatus::Pending => &[],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LoadStatus::Idle => "idle",
            LoadStatus::Pending => "pending",
            LoadStatus::Slow => "slow",
            LoadStatus::Blocked => "blocked",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusThresholds {
    pub slow_after_ms: Millis,
    pub blocked_after_ms: Millis,
}

impl StatusThresholds {
    /// Requires `0 < slow < blocked`.
    pub fn new(slow_after_ms: Millis, blocked_after_ms: Millis) -> Option<Self> {
        (slow_after_ms > 0 && slow_after_ms < blocked_after_ms).then_some(Self {
            slow_after_ms,
            blocked_after_ms,
        })
    }
}

impl Default for StatusThresholds {
    fn default() -> Self {
        Self {
            slow_after_ms: DEFAULT_SLOW_AFTER_MS,
            blocked_after_ms: DEFAULT_BLOCKED_AFTER_MS,
        }
    }
}

/// Domain patterns matched against a host and its parent domains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostilePatterns {
    domains: Vec<String>,
}

impl HostilePatterns {
    pub fn builtin() -> Self {
        Self {
            domains: BUILTIN_HOSTILE_HOSTS.iter().map(|d| d.to_string()).collect(),
        }
    }

    pub fn none() -> Self {
        Self {
            domains: Vec::new(),
        }
    }

    pub fn with_extra<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for domain in extra {
            let domain = domain.as_ref().trim().trim_matches('.').to_ascii_lowercase();
            if !domain.is_empty() && !self.domains.contains(&domain) {
                self.domains.push(domain);
            }
        }
        self
    }

    /// `www.github.com` matches `github.com`; `notgithub.com` does not.
    pub fn matches(&self, host: &str) -> bool {
        let host = host.trim_end_matches('.').to_ascii_lowercase();
        self.domains.iter().any(|d| {
            host == *d
                || host
                    .strip_suffix(d.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadAverage {
    pub avg_ms: f64,
    pub count: usize,
}

#[derive(Debug)]
pub struct LoadStatusMachine {
    thresholds: StatusThresholds,
    hostile: HostilePatterns,
    /// Most recent clock sample. Never moves backwards.
    now: Millis,
}

impl LoadStatusMachine {
    pub fn new(thresholds: StatusThresholds, hostile: HostilePatterns) -> Self {
        Self {
            thresholds,
            hostile,
            now: 0,
        }
    }

    pub fn now(&self) -> Millis {
        self.now
    }

    pub fn thresholds(&self) -> StatusThresholds {
        self.thresholds
    }

    pub fn tick(&mut self, at: Millis) {
        self.now = self.now.max(at);
    }

    pub fn is_hostile(&self, host: Option<&str>) -> bool {
        host.is_some_and(|h| self.hostile.matches(h))
    }

    /// Open a load cycle. An existing record keeps its reload count.
    pub fn begin(&mut self, arena: &mut ViewportArena, start: &LoadStart) {
        self.tick(start.at);
        if let Some(slot) = arena.get_mut(&start.id) {
            let reload_count = slot.record.map_or(0, |r| r.reload_count);
            slot.record = Some(LoadRecord {
                start: Some(start.at),
                end: None,
                reload_count,
            });
        }
    }

    /// Close the open cycle. Completion without an open cycle is ignored.
    pub fn complete(
        &mut self,
        arena: &mut ViewportArena,
        id: &BreakpointId,
        at: Millis,
    ) -> Option<Millis> {
        self.tick(at);
        let slot = arena.get_mut(id)?;
        let record = slot.record.as_mut()?;
        if !record.is_open() {
            tracing::trace!(id = %id, "Ignoring completion without an open load cycle");
            return None;
        }
        record.end = Some(at);
        let duration = record.duration();
        slot.last_load_ms = duration;
        duration
    }

    /// Restart a cycle from scratch and bump the reload count. Slots that were
    /// never mounted have nothing to reload and are left alone.
    pub fn reload(&mut self, arena: &mut ViewportArena, id: &BreakpointId, at: Millis) -> Option<u32> {
        self.tick(at);
        let slot = arena.get_mut(id).filter(|slot| slot.eligible)?;
        let mut record = slot.record.unwrap_or_default();
        record.start = Some(at);
        record.end = None;
        record.reload_count += 1;
        slot.record = Some(record);
        Some(record.reload_count)
    }

    pub fn classify(&self, record: Option<&LoadRecord>, host: Option<&str>) -> LoadStatus {
        let Some(record) = record.filter(|r| r.is_open()) else {
            return LoadStatus::Idle;
        };
        if self.is_hostile(host) {
            return LoadStatus::Blocked;
        }
        let elapsed = record.elapsed(self.now).unwrap_or(0);
        if elapsed >= self.thresholds.blocked_after_ms {
            LoadStatus::Blocked
        } else if elapsed >= self.thresholds.slow_after_ms {
            LoadStatus::Slow
        } else {
            LoadStatus::Pending
        }
    }

    pub fn status(&self, arena: &ViewportArena, id: &BreakpointId, host: Option<&str>) -> LoadStatus {
        self.classify(arena.get(id).and_then(|s| s.record.as_ref()), host)
    }

    /// Mean of the most recent completed duration per viewport.
    pub fn average_load(&self, arena: &ViewportArena) -> Option<LoadAverage> {
        let durations: Vec<Millis> = arena.iter().filter_map(|(_, s)| s.last_load_ms).collect();
        if durations.is_empty() {
            return None;
        }
        let total: Millis = durations.iter().sum();
        Some(LoadAverage {
            avg_ms: total as f64 / durations.len() as f64,
            count: durations.len(),
        })
    }
}
