//! Node events
//!
//! Events are human-readable breadcrumbs tied to a node. Recording one is
//! fire-and-forget: a recorder must never block or fail the caller.

pub mod webhook;
pub use webhook::WebhookEventRecorder;

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    Normal,
    Warning,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Normal => write!(f, "Normal"),
            EventKind::Warning => write!(f, "Warning"),
        }
    }
}

pub trait EventRecorder: Send + Sync {
    fn event(&self, node_name: &str, kind: EventKind, reason: &str, message: String);
}

/// Records events as structured log lines
#[derive(Debug, Clone, Default)]
pub struct LogEventRecorder;

impl EventRecorder for LogEventRecorder {
    fn event(&self, node_name: &str, kind: EventKind, reason: &str, message: String) {
        match kind {
            EventKind::Normal => info!(node = %node_name, reason = %reason, "{}", message),
            EventKind::Warning => warn!(node = %node_name, reason = %reason, "{}", message),
        }
    }
}
