use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

use super::{DrainCondition, Drainer, Node};
use crate::config::{Config, ServerConfig};
use crate::constants::http;

/// Drains nodes through the agent running on each node's server
pub struct HttpDrainer {
    config: Arc<Config>,
    client: Client,
    poll_interval: Duration,
}

impl HttpDrainer {
    pub fn new(config: Arc<Config>) -> Self {
        // No client-wide timeout: drains may legitimately run for hours
        let client = Client::new();

        Self {
            config,
            client,
            poll_interval: http::JOB_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    fn server_for(&self, node: &Node) -> Result<&ServerConfig> {
        self.config
            .servers
            .get(&node.server_host)
            .ok_or_else(|| anyhow!("Server {} not found for node {}", node.server_host, node.name))
    }

    fn agent_url(server: &ServerConfig, endpoint: &str) -> String {
        format!("http://{}:{}{}", server.host, server.agent_port, endpoint)
    }

    async fn post(
        &self,
        server: &ServerConfig,
        endpoint: &str,
        payload: Value,
        timeout: Option<Duration>,
    ) -> Result<Value> {
        let url = Self::agent_url(server, endpoint);

        let mut request = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", server.api_key))
            .json(&payload);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| anyhow!("HTTP request to {} failed: {}", url, e))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!(
                "Agent at {} returned status {}: {}",
                server.host,
                status,
                error_text
            ));
        }

        let result: Value = response
            .json()
            .await
            .map_err(|e| anyhow!("Failed to parse response from {}: {}", server.host, e))?;

        if !result.get("success").and_then(|v| v.as_bool()).unwrap_or(false) {
            let error_msg = result
                .get("error")
                .and_then(|v| v.as_str())
                .unwrap_or("Unknown error");
            return Err(anyhow!("Agent at {} rejected {}: {}", server.host, endpoint, error_msg));
        }

        Ok(result)
    }

    /// Poll the agent until the drain job reaches a terminal state
    async fn poll_for_completion(&self, server: &ServerConfig, node: &Node, job_id: &str) -> Result<()> {
        let status_url = Self::agent_url(server, &format!("/operation/status/{}", job_id));
        let mut consecutive_failures = 0;

        loop {
            sleep(self.poll_interval).await;

            let failure = match self
                .client
                .get(&status_url)
                .header("Authorization", format!("Bearer {}", server.api_key))
                .send()
                .await
            {
                Ok(response) if response.status().is_success() => {
                    match response.json::<Value>().await {
                        Ok(status) => {
                            match status.get("job_status").and_then(|v| v.as_str()) {
                                Some("Completed") => {
                                    info!("Drain job {} completed for {}", job_id, node.name);
                                    return Ok(());
                                }
                                Some("Failed") => {
                                    let error_msg = status
                                        .get("error")
                                        .and_then(|v| v.as_str())
                                        .unwrap_or("Job failed with unknown error");
                                    return Err(anyhow!(
                                        "Drain job {} failed for {}: {}",
                                        job_id,
                                        node.name,
                                        error_msg
                                    ));
                                }
                                Some(other) => {
                                    debug!("Drain job {} for {} is {}", job_id, node.name, other);
                                    consecutive_failures = 0;
                                    None
                                }
                                None => Some(format!("no job_status in response: {}", status)),
                            }
                        }
                        Err(e) => Some(format!("unreadable status response: {}", e)),
                    }
                }
                Ok(response) => Some(format!("status endpoint returned {}", response.status())),
                Err(e) => Some(format!("status request failed: {}", e)),
            };

            if let Some(reason) = failure {
                consecutive_failures += 1;
                warn!(
                    "Polling drain job {} for {} failed ({}/{}): {}",
                    job_id,
                    node.name,
                    consecutive_failures,
                    http::MAX_CONSECUTIVE_POLL_FAILURES,
                    reason
                );
                if consecutive_failures >= http::MAX_CONSECUTIVE_POLL_FAILURES {
                    return Err(anyhow!(
                        "Lost track of drain job {} for {}: {}",
                        job_id,
                        node.name,
                        reason
                    ));
                }
            }
        }
    }
}

#[async_trait]
impl Drainer for HttpDrainer {
    #[instrument(skip(self, node), fields(node = %node.name))]
    async fn mark_drain(&self, node: &Node, condition: DrainCondition) -> Result<()> {
        let server = self.server_for(node)?;
        let payload = json!({
            "node_name": node.name,
            "scheduled_at": condition.scheduled_at,
            "finished_at": condition.finished_at,
            "failed": condition.failed,
        });

        self.post(
            server,
            "/drain/condition",
            payload,
            Some(http::CONDITION_REQUEST_TIMEOUT),
        )
        .await?;
        Ok(())
    }

    #[instrument(skip(self, node), fields(node = %node.name))]
    async fn drain(&self, node: &Node) -> Result<()> {
        let server = self.server_for(node)?;

        info!("Requesting drain of {} on {}", node.name, server.host);
        let result = self
            .post(server, "/drain/execute", json!({ "node_name": node.name }), None)
            .await?;

        match result.get("job_id").and_then(|v| v.as_str()) {
            Some(job_id) => {
                info!("Drain of {} running as job {}", node.name, job_id);
                self.poll_for_completion(server, node, job_id).await
            }
            None => {
                warn!("Agent returned no job_id for drain of {}, treating as synchronous", node.name);
                Ok(())
            }
        }
    }
}
