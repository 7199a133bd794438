use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use tokio::runtime::Handle;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::{EventKind, EventRecorder, LogEventRecorder};
use crate::constants::http;

#[derive(Debug, Clone, Serialize)]
pub struct EventPayload {
    pub timestamp: DateTime<Utc>,
    pub kind: EventKind,
    pub reason: String,
    pub node_name: String,
    pub message: String,
}

/// Logs every event and forwards it to a webhook in the background
#[derive(Clone)]
pub struct WebhookEventRecorder {
    webhook_url: String,
    client: Client,
    log: LogEventRecorder,
}

impl WebhookEventRecorder {
    pub fn new(webhook_url: String) -> Self {
        Self {
            webhook_url,
            client: Client::new(),
            log: LogEventRecorder,
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.webhook_url.is_empty()
    }

    pub fn get_webhook_url(&self) -> &str {
        &self.webhook_url
    }

    async fn send_webhook(client: Client, webhook_url: String, payload: EventPayload) {
        match timeout(
            http::WEBHOOK_TIMEOUT,
            client.post(&webhook_url).json(&payload).send(),
        )
        .await
        {
            Ok(Ok(response)) => {
                if response.status().is_success() {
                    debug!("Event {} delivered for {}", payload.reason, payload.node_name);
                } else {
                    warn!(
                        "Event webhook returned status: {} for {}",
                        response.status(),
                        payload.node_name
                    );
                }
            }
            Ok(Err(e)) => {
                warn!("Failed to deliver event for {}: {}", payload.node_name, e);
            }
            Err(_) => {
                warn!("Event webhook timeout for {}", payload.node_name);
            }
        }
    }
}

impl EventRecorder for WebhookEventRecorder {
    fn event(&self, node_name: &str, kind: EventKind, reason: &str, message: String) {
        self.log.event(node_name, kind, reason, message.clone());

        if !self.is_enabled() {
            return;
        }

        let payload = EventPayload {
            timestamp: Utc::now(),
            kind,
            reason: reason.to_string(),
            node_name: node_name.to_string(),
            message,
        };

        match Handle::try_current() {
            Ok(handle) => {
                handle.spawn(Self::send_webhook(
                    self.client.clone(),
                    self.webhook_url.clone(),
                    payload,
                ));
            }
            Err(_) => {
                info!("No async runtime available, event for {} not forwarded", node_name);
            }
        }
    }
}
