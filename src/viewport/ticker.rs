//! Periodic status clock, running only while some load is pending.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::clock::Clock;
use super::events::ViewportEvent;

pub struct ClockTicker {
    interval: Duration,
    clock: Arc<dyn Clock>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl ClockTicker {
    pub fn new(interval: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            interval,
            clock,
            task: Mutex::new(None),
        }
    }

    /// Spawn the sampling task. A second start while running is a no-op.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self, tx: mpsc::UnboundedSender<ViewportEvent>) -> bool {
        let mut task = self.task.lock();
        if task.as_ref().is_some_and(|t| !t.is_finished()) {
            return false;
        }

        let clock = self.clock.clone();
        let period = self.interval;
        *task = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                if tx.send(ViewportEvent::Tick { at: clock.now() }).is_err() {
                    break;
                }
            }
        }));
        tracing::debug!(interval_ms = period.as_millis() as u64, "Status clock started");
        true
    }

    /// Returns false when no task was running.
    pub fn stop(&self) -> bool {
        match self.task.lock().take() {
            Some(task) => {
                task.abort();
                tracing::debug!("Status clock stopped");
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.lock().as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for ClockTicker {
    fn drop(&mut self) {
        if let Some(task) = self.task.get_mut().take() {
            task.abort();
        }
    }
}
