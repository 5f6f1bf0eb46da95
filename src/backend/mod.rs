// src/backend/mod.rs

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::language::Language;

pub mod http;

pub use http::HttpBackend;

/// Snapshot of one submission, built when the user presses run and never mutated after.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunRequest {
    pub language: Language,
    pub code: String,
    pub stdin: String,
    pub timeout_seconds: u32,
}

/// Response body of the execution service. Every field may be absent on the wire;
/// [`crate::session::RunResult::from_response`] fills in the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BackendResponse {
    #[serde(default)]
    pub stdout: Option<String>,
    #[serde(default)]
    pub stderr: Option<String>,
    #[serde(default)]
    pub timed_out: Option<bool>,
    #[serde(default)]
    pub exit_code: Option<i64>,
}

/// A service that runs a [`RunRequest`] in a sandbox and reports what happened.
///
/// Implementations return `Err` only for transport-level failures: the request never
/// reached the service, the service answered with a non-success status, the body could not
/// be parsed, or the client gave up waiting. A program that crashed or ran too long is
/// still `Ok`, described by the response fields.
#[async_trait]
pub trait ExecutionBackend: Send + Sync {
    async fn execute(&self, request: &RunRequest) -> Result<BackendResponse>;
}
