//! Drain executor seam
//!
//! The engine never evicts workloads itself. It records the drain condition
//! and runs the drain through a [`Drainer`], which is free to block for as long
//! as the drain takes.

pub mod http;
pub use http::HttpDrainer;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Node identity plus what the executor needs to reach it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    pub server_host: String,
}

impl Node {
    pub fn new(name: impl Into<String>, server_host: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            server_host: server_host.into(),
        }
    }
}

/// Drain state recorded on a node: scheduled, succeeded or failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrainCondition {
    pub scheduled_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub failed: bool,
}

impl DrainCondition {
    pub fn scheduled(scheduled_at: DateTime<Utc>) -> Self {
        Self {
            scheduled_at,
            finished_at: None,
            failed: false,
        }
    }

    pub fn finished(scheduled_at: DateTime<Utc>, finished_at: DateTime<Utc>, failed: bool) -> Self {
        Self {
            scheduled_at,
            finished_at: Some(finished_at),
            failed,
        }
    }
}

#[async_trait]
pub trait Drainer: Send + Sync {
    /// Durably record the drain condition. Called repeatedly with the same
    /// arguments on retry, so it must be idempotent.
    async fn mark_drain(&self, node: &Node, condition: DrainCondition) -> Result<()>;

    /// Perform the drain. Any error counts as a failed drain.
    async fn drain(&self, node: &Node) -> Result<()>;
}
