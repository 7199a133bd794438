pub mod config;
pub mod constants;
pub mod drainer;
pub mod errors;
pub mod events;
pub mod metrics;
pub mod retry;
pub mod scheduler;
pub mod web;

// Re-export commonly used types
pub use config::{Config, ConfigManager, NodeConfig, ServerConfig};
pub use drainer::{DrainCondition, Drainer, HttpDrainer, Node};
pub use errors::{ConfigError, DrainError};
pub use events::{EventKind, EventRecorder, LogEventRecorder, WebhookEventRecorder};
pub use metrics::{DrainMetrics, DrainOutcome};
pub use retry::retry_with_timeout;
pub use scheduler::{DrainSchedules, Schedule, ScheduleSettings, ScheduleState};
