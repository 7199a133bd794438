//! Engine construction and polling helpers

use controller::metrics::DrainMetrics;
use controller::scheduler::{DrainSchedules, ScheduleSettings, ScheduleState, ScheduleSummary};
use std::sync::Arc;
use std::time::Duration;

use super::{MockDrainer, RecordingEventRecorder};

/// Upper bound on polling, in virtual time for paused-clock tests
const WAIT_STEPS: u32 = 6_000;
const WAIT_STEP: Duration = Duration::from_millis(100);

pub struct TestEngine {
    pub scheduler: Arc<DrainSchedules>,
    pub drainer: Arc<MockDrainer>,
    pub recorder: Arc<RecordingEventRecorder>,
    pub metrics: Arc<DrainMetrics>,
}

impl TestEngine {
    pub fn new(drainer: MockDrainer, period: Duration) -> Self {
        Self::with_settings(drainer, ScheduleSettings::new(period))
    }

    pub fn with_settings(drainer: MockDrainer, settings: ScheduleSettings) -> Self {
        let drainer = Arc::new(drainer);
        let recorder = Arc::new(RecordingEventRecorder::new());
        let metrics = Arc::new(DrainMetrics::new());
        let scheduler = Arc::new(
            DrainSchedules::new(drainer.clone(), recorder.clone(), metrics.clone(), settings)
                .expect("valid settings"),
        );

        Self {
            scheduler,
            drainer,
            recorder,
            metrics,
        }
    }

    pub async fn summary(&self, node_name: &str) -> Option<ScheduleSummary> {
        self.scheduler
            .list_schedules()
            .await
            .into_iter()
            .find(|summary| summary.node_name == node_name)
    }

    /// Poll until the node's schedule reaches `state`
    pub async fn wait_for_state(&self, node_name: &str, state: ScheduleState) -> ScheduleSummary {
        for _ in 0..WAIT_STEPS {
            if let Some(summary) = self.summary(node_name).await {
                if summary.state == state {
                    return summary;
                }
            }
            tokio::time::sleep(WAIT_STEP).await;
        }
        panic!("schedule for {} never reached {:?}", node_name, state);
    }

    /// Poll until the drainer has recorded `count` successful condition writes
    pub async fn wait_for_marks(&self, count: usize) {
        for _ in 0..WAIT_STEPS {
            if self.drainer.marks().len() >= count {
                return;
            }
            tokio::time::sleep(WAIT_STEP).await;
        }
        panic!(
            "expected {} condition writes, saw {}",
            count,
            self.drainer.marks().len()
        );
    }

    /// Poll until `count` drains have completed
    pub async fn wait_for_drains(&self, count: u32) {
        for _ in 0..WAIT_STEPS {
            if self.drainer.drains_completed() >= count {
                return;
            }
            tokio::time::sleep(WAIT_STEP).await;
        }
        panic!(
            "expected {} completed drains, saw {}",
            count,
            self.drainer.drains_completed()
        );
    }
}
