pub mod handlers;
pub mod server;

pub use server::{create_router, start_web_server};

use std::sync::Arc;

use crate::config::Config;
use crate::metrics::DrainMetrics;
use crate::scheduler::DrainSchedules;

// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub scheduler: Arc<DrainSchedules>,
    pub metrics: Arc<DrainMetrics>,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        scheduler: Arc<DrainSchedules>,
        metrics: Arc<DrainMetrics>,
    ) -> Self {
        Self {
            config,
            scheduler,
            metrics,
        }
    }
}
