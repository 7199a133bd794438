//! Drain outcome counters with Prometheus text exposition

use serde::Serialize;
use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::constants::metrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DrainOutcome {
    Succeeded,
    Failed,
}

impl DrainOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            DrainOutcome::Succeeded => metrics::RESULT_SUCCEEDED,
            DrainOutcome::Failed => metrics::RESULT_FAILED,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub succeeded: u64,
    pub failed: u64,
}

#[derive(Debug, Default)]
pub struct DrainMetrics {
    succeeded: AtomicU64,
    failed: AtomicU64,
}

impl DrainMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, outcome: DrainOutcome) {
        match outcome {
            DrainOutcome::Succeeded => self.succeeded.fetch_add(1, Ordering::Relaxed),
            DrainOutcome::Failed => self.failed.fetch_add(1, Ordering::Relaxed),
        };
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            succeeded: self.succeeded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }

    /// Render counters plus the current number of schedules
    pub fn render(&self, active_schedules: usize) -> String {
        let snapshot = self.snapshot();
        let mut out = String::with_capacity(512);

        let _ = writeln!(out, "# HELP {} Number of nodes drained, by result.", metrics::NODES_DRAINED);
        let _ = writeln!(out, "# TYPE {} counter", metrics::NODES_DRAINED);
        for (outcome, value) in [
            (DrainOutcome::Succeeded, snapshot.succeeded),
            (DrainOutcome::Failed, snapshot.failed),
        ] {
            let _ = writeln!(
                out,
                "{}{{result=\"{}\"}} {}",
                metrics::NODES_DRAINED,
                outcome.label(),
                value
            );
        }

        let _ = writeln!(out, "# HELP {} Drain schedules currently tracked.", metrics::ACTIVE_SCHEDULES);
        let _ = writeln!(out, "# TYPE {} gauge", metrics::ACTIVE_SCHEDULES);
        let _ = writeln!(out, "{} {}", metrics::ACTIVE_SCHEDULES, active_schedules);

        out
    }
}
