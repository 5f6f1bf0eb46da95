// src/backend/http.rs

use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};

use crate::backend::{BackendResponse, ExecutionBackend, RunRequest};
use crate::config::BackendConfig;
use crate::errors::{Result, RunpadError};

/// Talks to the execution service's `run` endpoint over HTTP.
pub struct HttpBackend {
    client: Client,
    endpoint: String,
    deadline: Duration,
}

impl HttpBackend {
    /// Builds a backend whose client gives up after the configured transport deadline.
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let deadline = Duration::from_millis(config.transport_deadline_ms);
        let client = Client::builder().timeout(deadline).build()?;
        Ok(Self::with_client(client, config.run_url(), deadline))
    }

    /// Uses an existing client. `deadline` is only used for reporting; the client's own
    /// timeout is what enforces it.
    pub fn with_client(client: Client, endpoint: String, deadline: Duration) -> Self {
        Self { client, endpoint, deadline }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn transport_error(&self, err: reqwest::Error) -> RunpadError {
        if err.is_timeout() {
            RunpadError::DeadlineExceeded {
                deadline_ms: self.deadline.as_millis() as u64,
            }
        } else {
            RunpadError::Request(err)
        }
    }
}

#[async_trait]
impl ExecutionBackend for HttpBackend {
    async fn execute(&self, request: &RunRequest) -> Result<BackendResponse> {
        log::info!(
            "Submitting {} program ({} bytes, {} bytes stdin) to {}",
            request.language,
            request.code.len(),
            request.stdin.len(),
            self.endpoint
        );

        let start = Instant::now();

        let resp = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = resp.status();
        let latency_ms = start.elapsed().as_millis() as u64;

        log::info!("Execution service responded {} ({}ms)", status, latency_ms);

        if !status.is_success() {
            let error_body = resp
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error body".to_string());
            return Err(RunpadError::BackendStatus {
                status: status.as_u16(),
                body: error_body,
            });
        }

        let body = resp.text().await.map_err(|e| self.transport_error(e))?;

        serde_json::from_str::<BackendResponse>(&body)
            .map_err(|e| RunpadError::MalformedResponse(e.to_string()))
    }
}
