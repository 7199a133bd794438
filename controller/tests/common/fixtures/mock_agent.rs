//! Mock node agent for testing the HTTP drainer
//!
//! This provides a fake agent that answers the drain endpoints without
//! requiring a real agent running on a node.

use serde_json::json;
use wiremock::{
    matchers::{header, method, path, path_regex},
    Mock, MockServer, ResponseTemplate,
};

/// Mock agent server that simulates agent HTTP responses
pub struct MockAgentServer {
    pub server: MockServer,
    pub base_url: String,
}

impl MockAgentServer {
    /// Create a new mock agent server
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let base_url = server.uri();
        Self { server, base_url }
    }

    pub fn port(&self) -> u16 {
        self.server.address().port()
    }

    /// Accept condition writes carrying the expected API key
    pub async fn mock_condition_success(&self, api_key: &str) {
        Mock::given(method("POST"))
            .and(path("/drain/condition"))
            .and(header("Authorization", format!("Bearer {}", api_key).as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true
            })))
            .mount(&self.server)
            .await;
    }

    /// Reject condition writes with an HTTP error
    pub async fn mock_condition_failure(&self, status_code: u16) {
        Mock::given(method("POST"))
            .and(path("/drain/condition"))
            .respond_with(ResponseTemplate::new(status_code).set_body_string("write conflict"))
            .mount(&self.server)
            .await;
    }

    /// Start a drain job with the given id
    pub async fn mock_drain_started(&self, job_id: &str) {
        Mock::given(method("POST"))
            .and(path("/drain/execute"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "job_id": job_id,
                "status": "started"
            })))
            .mount(&self.server)
            .await;
    }

    /// Refuse to start a drain
    pub async fn mock_drain_rejected(&self, error: &str) {
        Mock::given(method("POST"))
            .and(path("/drain/execute"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "error": error
            })))
            .mount(&self.server)
            .await;
    }

    /// Report the job as running for the first `running_polls` polls
    pub async fn mock_job_running(&self, job_id: &str, running_polls: u64) {
        Mock::given(method("GET"))
            .and(path(format!("/operation/status/{}", job_id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "job_status": "Running"
            })))
            .up_to_n_times(running_polls)
            .with_priority(1)
            .mount(&self.server)
            .await;
    }

    pub async fn mock_job_completed(&self, job_id: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/operation/status/{}", job_id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "job_status": "Completed",
                "output": "{}"
            })))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_job_failed(&self, job_id: &str, error: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/operation/status/{}", job_id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "job_status": "Failed",
                "error": error
            })))
            .mount(&self.server)
            .await;
    }

    /// Status endpoint that always errors
    pub async fn mock_status_unavailable(&self) {
        Mock::given(method("GET"))
            .and(path_regex(r"^/operation/status/.*$"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&self.server)
            .await;
    }
}
