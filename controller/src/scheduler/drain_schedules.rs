use anyhow::Result;
use chrono::{DateTime, TimeDelta, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

use super::{Schedule, ScheduleSettings, ScheduleSummary};
use crate::constants::{conditions, events};
use crate::drainer::{DrainCondition, Drainer, Node};
use crate::errors::{ConfigError, DrainError};
use crate::events::{EventKind, EventRecorder};
use crate::metrics::{DrainMetrics, DrainOutcome};
use crate::retry::retry_with_timeout;

struct ScheduleBook {
    schedules: HashMap<String, Arc<Schedule>>,
    last_drain_scheduled_for: Option<DateTime<Utc>>,
}

/// Everything a fired timer needs to run a drain and report on it
#[derive(Clone)]
struct DrainRunner {
    drainer: Arc<dyn Drainer>,
    recorder: Arc<dyn EventRecorder>,
    metrics: Arc<DrainMetrics>,
    settings: ScheduleSettings,
}

pub struct DrainSchedules {
    book: Mutex<ScheduleBook>,
    runner: DrainRunner,
    period: TimeDelta,
    earliest_offset: TimeDelta,
}

/// Pick the next drain start: at least `period` after the previous one, and
/// never sooner than `now + earliest_offset`.
pub fn next_drain_slot(
    last_drain_scheduled_for: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    period: TimeDelta,
    earliest_offset: TimeDelta,
) -> DateTime<Utc> {
    let sooner = now + earliest_offset;
    match last_drain_scheduled_for.and_then(|last| last.checked_add_signed(period)) {
        Some(candidate) if candidate > sooner => candidate,
        _ => sooner,
    }
}

impl DrainSchedules {
    pub fn new(
        drainer: Arc<dyn Drainer>,
        recorder: Arc<dyn EventRecorder>,
        metrics: Arc<DrainMetrics>,
        settings: ScheduleSettings,
    ) -> Result<Self, ConfigError> {
        let period = TimeDelta::from_std(settings.period).map_err(|e| ConfigError::InvalidValue {
            field: "period".to_string(),
            reason: e.to_string(),
        })?;
        let earliest_offset = TimeDelta::from_std(
            settings.condition_timeout + conditions::SCHEDULE_SLACK,
        )
        .map_err(|e| ConfigError::InvalidValue {
            field: "condition_timeout".to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            book: Mutex::new(ScheduleBook {
                schedules: HashMap::new(),
                last_drain_scheduled_for: None,
            }),
            runner: DrainRunner {
                drainer,
                recorder,
                metrics,
                settings,
            },
            period,
            earliest_offset,
        })
    }

    pub fn settings(&self) -> ScheduleSettings {
        self.runner.settings
    }

    /// Plan a drain for `node` and record the scheduled condition.
    ///
    /// A node that already has a schedule gets `AlreadyScheduled` carrying the
    /// existing start time; nothing is refreshed. If the condition cannot be
    /// recorded within the retry budget the schedule is rolled back.
    #[instrument(skip(self, node), fields(node = %node.name))]
    pub async fn schedule(&self, node: &Node) -> Result<DateTime<Utc>, DrainError> {
        if node.name.is_empty() {
            return Err(DrainError::InvalidNode {
                reason: "node name is empty".to_string(),
            });
        }

        let (when, schedule) = {
            let mut book = self.book.lock().await;
            if let Some(existing) = book.schedules.get(&node.name) {
                return Err(DrainError::AlreadyScheduled {
                    node_name: node.name.clone(),
                    when: existing.when(),
                });
            }

            let when = next_drain_slot(
                book.last_drain_scheduled_for,
                Utc::now(),
                self.period,
                self.earliest_offset,
            );
            book.last_drain_scheduled_for = Some(when);
            let schedule = self.new_schedule(node.clone(), when);
            book.schedules.insert(node.name.clone(), schedule.clone());
            (when, schedule)
        };

        if let Err(e) = self
            .runner
            .announce(node, DrainCondition::scheduled(when))
            .await
        {
            info!("Could not record drain condition for {}, removing schedule", node.name);
            self.remove_if_current(&node.name, &schedule).await;
            return Err(DrainError::Announcement {
                node_name: node.name.clone(),
                reason: format!("{:#}", e),
            });
        }

        info!("Drain of {} scheduled for {}", node.name, when.to_rfc3339());
        Ok(when)
    }

    /// Whether a schedule exists for the node, and whether its drain failed
    pub async fn has_schedule(&self, node_name: &str) -> (bool, bool) {
        let book = self.book.lock().await;
        match book.schedules.get(node_name) {
            Some(schedule) => {
                info!(
                    node = %node_name,
                    when = %schedule.when(),
                    finish = ?schedule.finish(),
                    failed = schedule.is_failed(),
                    "HasSchedule"
                );
                (true, schedule.is_failed())
            }
            None => (false, false),
        }
    }

    /// Stop the node's timer and forget the schedule. A missing schedule is a
    /// normal race and only logged.
    pub async fn delete_schedule(&self, node_name: &str) {
        let mut book = self.book.lock().await;
        match book.schedules.remove(node_name) {
            Some(schedule) => {
                if schedule.stop() {
                    info!("Cancelled pending drain of {}", node_name);
                } else {
                    info!("Removed drain schedule of {}", node_name);
                }
            }
            None => {
                warn!("Entry not found in deletion schedule: {}", node_name);
            }
        }
    }

    /// True if the node's schedule completed successfully and was planned
    /// before `transition_time`, i.e. its outcome predates that transition.
    pub async fn is_scheduled_by_old_event(
        &self,
        node_name: &str,
        transition_time: DateTime<Utc>,
    ) -> bool {
        let book = self.book.lock().await;
        match book.schedules.get(node_name) {
            Some(schedule) => {
                schedule.when() < transition_time
                    && !schedule.is_failed()
                    && schedule.is_finished()
            }
            None => false,
        }
    }

    /// The start time the next schedule would get if created now
    pub async fn when_next_schedule(&self) -> DateTime<Utc> {
        let book = self.book.lock().await;
        next_drain_slot(
            book.last_drain_scheduled_for,
            Utc::now(),
            self.period,
            self.earliest_offset,
        )
    }

    pub async fn list_schedules(&self) -> Vec<ScheduleSummary> {
        let book = self.book.lock().await;
        let mut summaries: Vec<ScheduleSummary> = book
            .schedules
            .iter()
            .map(|(node_name, schedule)| ScheduleSummary {
                node_name: node_name.clone(),
                when: schedule.when(),
                finish: schedule.finish(),
                failed: schedule.is_failed(),
                state: schedule.state(),
            })
            .collect();
        summaries.sort_by(|a, b| a.when.cmp(&b.when));
        summaries
    }

    pub async fn len(&self) -> usize {
        self.book.lock().await.schedules.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.book.lock().await.schedules.is_empty()
    }

    /// Roll back a schedule, unless it was already replaced by a newer one
    async fn remove_if_current(&self, node_name: &str, schedule: &Arc<Schedule>) {
        let mut book = self.book.lock().await;
        let is_current = book
            .schedules
            .get(node_name)
            .is_some_and(|current| Arc::ptr_eq(current, schedule));
        if is_current {
            book.schedules.remove(node_name);
        }
        schedule.stop();
    }

    fn new_schedule(&self, node: Node, when: DateTime<Utc>) -> Arc<Schedule> {
        let schedule = Arc::new(Schedule::new(when));
        let delay = (when - Utc::now()).to_std().unwrap_or_default();

        let runner = self.runner.clone();
        let fired = schedule.clone();
        let timer = tokio::spawn(async move {
            sleep(delay).await;
            fired.mark_started();
            // the drain runs detached so stopping the timer cannot interrupt it
            tokio::spawn(runner.run(node, fired));
        });
        schedule.arm(timer.abort_handle());

        schedule
    }
}

impl DrainRunner {
    async fn announce(&self, node: &Node, condition: DrainCondition) -> Result<()> {
        retry_with_timeout(
            || self.drainer.mark_drain(node, condition),
            self.settings.condition_retry_period,
            self.settings.condition_timeout,
        )
        .await
    }

    #[instrument(skip_all, fields(node = %node.name))]
    async fn run(self, node: Node, schedule: Arc<Schedule>) {
        let when = schedule.when();
        self.recorder.event(
            &node.name,
            EventKind::Warning,
            events::DRAIN_STARTING,
            "Draining node".to_string(),
        );

        if let Err(e) = self.drainer.drain(&node).await {
            let finish = Utc::now();
            schedule.set_finished(finish, true);

            let failure = DrainError::Drain {
                node_name: node.name.clone(),
                reason: format!("{:#}", e),
            };
            info!("{}", failure);

            self.metrics.record(DrainOutcome::Failed);
            self.recorder.event(
                &node.name,
                EventKind::Warning,
                events::DRAIN_FAILED,
                format!("Draining failed: {:#}", e),
            );

            if let Err(e) = self
                .announce(&node, DrainCondition::finished(when, finish, true))
                .await
            {
                error!("Failed to place condition following drain failure: {:#}", e);
            }
            return;
        }

        info!("Drained {}", node.name);
        let finish = Utc::now();
        schedule.set_finished(finish, false);

        self.metrics.record(DrainOutcome::Succeeded);
        self.recorder.event(
            &node.name,
            EventKind::Warning,
            events::DRAIN_SUCCEEDED,
            "Drained node".to_string(),
        );

        if let Err(e) = self
            .announce(&node, DrainCondition::finished(when, finish, false))
            .await
        {
            self.recorder.event(
                &node.name,
                EventKind::Warning,
                events::DRAIN_FAILED,
                format!("Failed to place drain condition: {:#}", e),
            );
            error!("Failed to place condition following drain success: {:#}", e);
        }
    }
}
