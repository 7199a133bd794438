//! Custom error types for the drain controller
//!
//! Errors raised synchronously by the scheduling engine are typed so callers can
//! tell an expected race (a node that is already scheduled) apart from a real
//! failure. Errors inside a fired drain timer never leave the timer; they are
//! recorded on the schedule and logged.

use chrono::{DateTime, Utc};
use std::fmt;

/// Errors returned by the drain scheduling engine
#[derive(Debug)]
pub enum DrainError {
    /// A schedule is already planned for the node; carries the existing start time
    AlreadyScheduled {
        node_name: String,
        when: DateTime<Utc>,
    },

    /// The drain condition could not be recorded before the retry budget ran out
    Announcement { node_name: String, reason: String },

    /// The drain operation itself failed
    Drain { node_name: String, reason: String },

    /// The node handed to the engine is unusable
    InvalidNode { reason: String },
}

/// Configuration error variants
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to load configuration file
    LoadFailed { path: String, reason: String },

    /// Invalid configuration value
    InvalidValue { field: String, reason: String },

    /// Missing required configuration
    MissingRequired { field: String },

    /// Configuration parsing error
    ParseError { reason: String },
}

impl DrainError {
    /// True when the error only reports that the node already has a schedule
    pub fn is_already_scheduled(&self) -> bool {
        matches!(self, DrainError::AlreadyScheduled { .. })
    }

    /// Start time of the schedule that caused an `AlreadyScheduled` error
    pub fn scheduled_at(&self) -> Option<DateTime<Utc>> {
        match self {
            DrainError::AlreadyScheduled { when, .. } => Some(*when),
            _ => None,
        }
    }
}

impl fmt::Display for DrainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrainError::AlreadyScheduled { node_name, when } => {
                write!(
                    f,
                    "Drain schedule is already planned for node '{}' at {}",
                    node_name,
                    when.to_rfc3339()
                )
            }
            DrainError::Announcement { node_name, reason } => {
                write!(
                    f,
                    "Failed to record drain condition for '{}': {}",
                    node_name, reason
                )
            }
            DrainError::Drain { node_name, reason } => {
                write!(f, "Drain of '{}' failed: {}", node_name, reason)
            }
            DrainError::InvalidNode { reason } => {
                write!(f, "Invalid node: {}", reason)
            }
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::LoadFailed { path, reason } => {
                write!(f, "Failed to load config from '{}': {}", path, reason)
            }
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "Invalid value for '{}': {}", field, reason)
            }
            ConfigError::MissingRequired { field } => {
                write!(f, "Missing required field: {}", field)
            }
            ConfigError::ParseError { reason } => {
                write!(f, "Failed to parse config: {}", reason)
            }
        }
    }
}

impl std::error::Error for DrainError {}
impl std::error::Error for ConfigError {}
