use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, OnceLock};
use tokio::task::AbortHandle;

use super::ScheduleState;

/// The planned drain of one node.
///
/// `when` never changes. `finish` and `failed` are written once by the
/// schedule's own timer task and read by lock-holding callers of the engine;
/// both are safe to read without any further synchronisation.
#[derive(Debug)]
pub struct Schedule {
    when: DateTime<Utc>,
    finish: OnceLock<DateTime<Utc>>,
    failed: AtomicBool,
    started: AtomicBool,
    timer: Mutex<Option<AbortHandle>>,
}

impl Schedule {
    pub fn new(when: DateTime<Utc>) -> Self {
        Self {
            when,
            finish: OnceLock::new(),
            failed: AtomicBool::new(false),
            started: AtomicBool::new(false),
            timer: Mutex::new(None),
        }
    }

    pub fn when(&self) -> DateTime<Utc> {
        self.when
    }

    /// When the drain attempt concluded, if it has
    pub fn finish(&self) -> Option<DateTime<Utc>> {
        self.finish.get().copied()
    }

    pub fn is_finished(&self) -> bool {
        self.finish.get().is_some()
    }

    pub fn is_failed(&self) -> bool {
        self.failed.load(Ordering::Acquire)
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }

    pub fn state(&self) -> ScheduleState {
        match (self.is_finished(), self.is_failed(), self.is_started()) {
            (true, true, _) => ScheduleState::Failed,
            (true, false, _) => ScheduleState::Succeeded,
            (false, _, true) => ScheduleState::Running,
            (false, _, false) => ScheduleState::Pending,
        }
    }

    pub(crate) fn mark_started(&self) {
        self.started.store(true, Ordering::Release);
    }

    /// Record the outcome of the drain attempt. Only the first call has any
    /// effect; returns whether this call recorded it.
    pub(crate) fn set_finished(&self, at: DateTime<Utc>, failed: bool) -> bool {
        if self.finish.get().is_some() {
            return false;
        }
        // failed goes first so a reader that sees `finish` also sees the flag
        if failed {
            self.failed.store(true, Ordering::Release);
        }
        self.finish.set(at).is_ok()
    }

    pub(crate) fn arm(&self, timer: AbortHandle) {
        let mut slot = self.timer.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = slot.replace(timer) {
            previous.abort();
        }
    }

    /// Stop the timer. Only prevents a future firing: a drain that already
    /// started keeps running. Returns true if the drain had not started yet.
    pub fn stop(&self) -> bool {
        let timer = self
            .timer
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        match timer {
            Some(timer) => {
                timer.abort();
                !self.is_started()
            }
            None => false,
        }
    }
}
