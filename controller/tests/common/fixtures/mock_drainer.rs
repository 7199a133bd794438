//! In-memory drain executor
//!
//! Records every condition write and drain call, and can be told to reject
//! condition writes, fail drains, or hold drains until released.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use controller::drainer::{DrainCondition, Drainer, Node};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

#[derive(Default)]
pub struct MockDrainer {
    /// Condition writes still to reject; u32::MAX rejects forever
    mark_failures: AtomicU32,
    fail_final_marks: AtomicBool,
    fail_drain: AtomicBool,
    gate: Option<Arc<Notify>>,
    marks: Mutex<Vec<(String, DrainCondition)>>,
    mark_attempts: AtomicU32,
    drains_started: AtomicU32,
    drains_completed: AtomicU32,
}

impl MockDrainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the first `n` condition writes
    pub fn failing_marks(self, n: u32) -> Self {
        self.mark_failures.store(n, Ordering::SeqCst);
        self
    }

    /// Reject every condition write
    pub fn always_failing_marks(self) -> Self {
        self.failing_marks(u32::MAX)
    }

    /// Reject condition writes that carry a drain outcome
    pub fn failing_final_marks(self) -> Self {
        self.fail_final_marks.store(true, Ordering::SeqCst);
        self
    }

    pub fn failing_drain(self) -> Self {
        self.fail_drain.store(true, Ordering::SeqCst);
        self
    }

    /// Hold every drain until the returned gate is notified
    pub fn gated(mut self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.gate = Some(gate.clone());
        (self, gate)
    }

    /// Successful condition writes, in order
    pub fn marks(&self) -> Vec<(String, DrainCondition)> {
        self.marks.lock().unwrap().clone()
    }

    pub fn marks_for(&self, node_name: &str) -> Vec<DrainCondition> {
        self.marks()
            .into_iter()
            .filter(|(name, _)| name == node_name)
            .map(|(_, condition)| condition)
            .collect()
    }

    pub fn mark_attempts(&self) -> u32 {
        self.mark_attempts.load(Ordering::SeqCst)
    }

    pub fn drains_started(&self) -> u32 {
        self.drains_started.load(Ordering::SeqCst)
    }

    pub fn drains_completed(&self) -> u32 {
        self.drains_completed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Drainer for MockDrainer {
    async fn mark_drain(&self, node: &Node, condition: DrainCondition) -> Result<()> {
        self.mark_attempts.fetch_add(1, Ordering::SeqCst);

        if condition.finished_at.is_some() && self.fail_final_marks.load(Ordering::SeqCst) {
            return Err(anyhow!("condition write for {} rejected", node.name));
        }

        let remaining = self.mark_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            if remaining != u32::MAX {
                self.mark_failures.fetch_sub(1, Ordering::SeqCst);
            }
            return Err(anyhow!("conflict writing condition for {}", node.name));
        }

        self.marks
            .lock()
            .unwrap()
            .push((node.name.clone(), condition));
        Ok(())
    }

    async fn drain(&self, node: &Node) -> Result<()> {
        self.drains_started.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        self.drains_completed.fetch_add(1, Ordering::SeqCst);
        if self.fail_drain.load(Ordering::SeqCst) {
            return Err(anyhow!("eviction of pods on {} blocked", node.name));
        }
        Ok(())
    }
}
