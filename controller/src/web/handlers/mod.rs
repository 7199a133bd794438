//! HTTP request handlers for the controller API.
//!
//! - `common` - Shared response envelope and query structs
//! - `schedules` - Drain schedule creation, lookup and cancellation
//! - `status` - Liveness and metrics

pub mod common;
pub mod schedules;
pub mod status;

pub use schedules::*;
pub use status::*;
