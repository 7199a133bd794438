//! Staggered, at-most-once-per-node drain scheduling
//!
//! [`DrainSchedules`] owns one [`Schedule`] per node. Each schedule carries a
//! timer that fires the drain at its start time; start times are spaced by a
//! configured period so that drains across the cluster are rate limited.
//!
//! # Lifecycle
//!
//! ```text
//! Pending --timer fires--> Running --drain ok--> Succeeded
//!                                  \--drain err--> Failed
//! ```
//!
//! `delete_schedule` removes a schedule from any state. Terminal states are
//! never left; a new request after deletion starts a fresh schedule.

pub mod drain_schedules;
pub mod schedule;

pub use drain_schedules::DrainSchedules;
pub use schedule::Schedule;

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

use crate::constants::{conditions, defaults};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScheduleState {
    Pending,
    Running,
    Succeeded,
    Failed,
}

/// Engine settings, fixed at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleSettings {
    /// Minimum spacing between successive scheduled drain starts
    pub period: Duration,
    /// Budget for recording a drain condition
    pub condition_timeout: Duration,
    /// Interval between condition recording attempts
    pub condition_retry_period: Duration,
}

impl ScheduleSettings {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            ..Self::default()
        }
    }
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            period: Duration::from_secs(defaults::DRAIN_PERIOD_SECONDS),
            condition_timeout: conditions::SET_CONDITION_TIMEOUT,
            condition_retry_period: conditions::SET_CONDITION_RETRY_PERIOD,
        }
    }
}

/// Point-in-time view of a schedule, for status reporting
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleSummary {
    pub node_name: String,
    pub when: DateTime<Utc>,
    pub finish: Option<DateTime<Utc>>,
    pub failed: bool,
    pub state: ScheduleState,
}
