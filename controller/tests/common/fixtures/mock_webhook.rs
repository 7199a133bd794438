//! Mock webhook server for testing event delivery
//!
//! This simulates a webhook endpoint that receives node events,
//! allowing tests to verify events are forwarded correctly.

use serde_json::Value;
use std::time::Duration;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

/// Captured webhook request
#[derive(Debug, Clone)]
pub struct WebhookRequest {
    pub body: Value,
}

/// Mock webhook server that captures event requests
pub struct MockWebhookServer {
    pub server: MockServer,
    pub base_url: String,
}

impl MockWebhookServer {
    /// Create a new mock webhook server
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let base_url = server.uri();
        Self { server, base_url }
    }

    /// Mock successful webhook delivery
    pub async fn mock_success(&self) {
        Mock::given(method("POST"))
            .and(path("/webhook"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&self.server)
            .await;
    }

    /// Mock webhook failure
    pub async fn mock_failure(&self, status_code: u16) {
        Mock::given(method("POST"))
            .and(path("/webhook"))
            .respond_with(ResponseTemplate::new(status_code))
            .mount(&self.server)
            .await;
    }

    /// Get all captured webhook requests
    pub async fn get_captured_requests(&self) -> Vec<WebhookRequest> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|req| req.url.path() == "/webhook")
            .filter_map(|req| req.body_json::<Value>().ok())
            .map(|body| WebhookRequest { body })
            .collect()
    }

    /// Wait until at least `count` requests were captured
    pub async fn wait_for_requests(&self, count: usize) -> Vec<WebhookRequest> {
        for _ in 0..100 {
            let requests = self.get_captured_requests().await;
            if requests.len() >= count {
                return requests;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        self.get_captured_requests().await
    }

    /// Get the webhook URL
    pub fn webhook_url(&self) -> String {
        format!("{}/webhook", self.base_url)
    }
}
