use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use controller::config::ConfigManager;
use controller::drainer::{Drainer, HttpDrainer};
use controller::events::{EventRecorder, LogEventRecorder, WebhookEventRecorder};
use controller::metrics::DrainMetrics;
use controller::scheduler::DrainSchedules;
use controller::web::{start_web_server, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = EnvFilter::from_default_env()
        .add_directive("controller=info".parse()?)
        .add_directive("tower_http=warn".parse()?)
        .add_directive("hyper=warn".parse()?)
        .add_directive("reqwest=warn".parse()?);

    fmt().with_env_filter(env_filter).init();

    info!("Starting drain controller");

    let config_dir = std::env::args().nth(1).unwrap_or_else(|| "config".to_string());
    let config_manager = ConfigManager::new(config_dir).await?;
    let config = config_manager.get_current_config();
    info!(
        "Configuration loaded: {} nodes on {} servers",
        config.nodes.len(),
        config.servers.len()
    );

    let drainer: Arc<dyn Drainer> = Arc::new(HttpDrainer::new(config.clone()));

    let recorder: Arc<dyn EventRecorder> = match config.event_webhook_url.as_deref() {
        Some(url) if !url.is_empty() => {
            let webhook = WebhookEventRecorder::new(url.to_string());
            info!("Forwarding node events to {}", webhook.get_webhook_url());
            Arc::new(webhook)
        }
        _ => {
            warn!("No event_webhook_url configured, node events are only logged");
            Arc::new(LogEventRecorder)
        }
    };

    let metrics = Arc::new(DrainMetrics::new());
    let settings = config.schedule_settings();
    let scheduler = Arc::new(DrainSchedules::new(
        drainer,
        recorder,
        metrics.clone(),
        settings,
    )?);
    info!(
        "Drain scheduler ready: period {}s, condition timeout {}ms, retry every {}ms",
        settings.period.as_secs(),
        settings.condition_timeout.as_millis(),
        settings.condition_retry_period.as_millis()
    );

    let state = AppState::new(config, scheduler, metrics);
    start_web_server(state, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Shutdown signal received");
    })
    .await?;

    Ok(())
}
