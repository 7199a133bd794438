//! Central repository for timeouts, intervals, event reasons and metric names
//!
//! Constants are grouped by concern so the engine, the HTTP drainer and the web
//! layer share a single source of truth.

use std::time::Duration;

/// Drain condition announcement constants
pub mod conditions {
    use super::Duration;

    /// Total budget for recording a drain condition before giving up
    pub const SET_CONDITION_TIMEOUT: Duration = Duration::from_secs(10);

    /// Interval between attempts to record a drain condition
    pub const SET_CONDITION_RETRY_PERIOD: Duration = Duration::from_millis(50);

    /// Extra slack added on top of the announcement budget when picking the earliest start time
    pub const SCHEDULE_SLACK: Duration = Duration::from_secs(1);
}

/// Event reasons attached to node events
pub mod events {
    pub const DRAIN_STARTING: &str = "DrainStarting";
    pub const DRAIN_SUCCEEDED: &str = "DrainSucceeded";
    pub const DRAIN_FAILED: &str = "DrainFailed";
}

/// Metric names and label values
pub mod metrics {
    pub const NODES_DRAINED: &str = "drain_controller_nodes_drained_total";
    pub const ACTIVE_SCHEDULES: &str = "drain_controller_active_schedules";
    pub const RESULT_SUCCEEDED: &str = "succeeded";
    pub const RESULT_FAILED: &str = "failed";
}

/// HTTP client constants for talking to node agents
pub mod http {
    use super::Duration;

    /// Timeout for a single condition write to an agent
    pub const CONDITION_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

    /// Interval between polls of a running drain job
    pub const JOB_POLL_INTERVAL: Duration = Duration::from_secs(10);

    /// Poll failures in a row after which a drain job is considered lost
    pub const MAX_CONSECUTIVE_POLL_FAILURES: u32 = 5;

    /// Webhook request timeout for event delivery
    pub const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);
}

/// Default configuration values
pub mod defaults {
    /// Default minimum spacing between scheduled drain starts
    pub const DRAIN_PERIOD_SECONDS: u64 = 60;

    /// Default condition announcement budget
    pub const CONDITION_TIMEOUT_SECONDS: u64 = 10;

    /// Default interval between condition announcement attempts
    pub const CONDITION_RETRY_MILLIS: u64 = 50;

    /// Default HTTP API port
    pub const PORT: u16 = 8096;

    /// Default node agent port
    pub const AGENT_PORT: u16 = 8745;
}
