// src/session.rs
use serde::Serialize;

use crate::backend::{BackendResponse, ExecutionBackend, RunRequest};
use crate::errors::{Result, RunpadError};
use crate::language::Language;

/// Mime type handed to the file-save collaborator for exported sources.
pub const EXPORT_MIME_TYPE: &str = "text/plain;charset=utf-8";

/// Lifecycle of the most recent run attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    #[default]
    Idle,
    Pending,
    Completed,
}

/// Outcome of one run. `exit_code` is `None` when the exit status is unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunResult {
    pub stdout: String,
    pub stderr: String,
    pub timed_out: bool,
    pub exit_code: Option<i64>,
}

impl RunResult {
    /// Fills in defaults for every field the service left out.
    pub fn from_response(resp: BackendResponse) -> Self {
        Self {
            stdout: resp.stdout.unwrap_or_default(),
            stderr: resp.stderr.unwrap_or_default(),
            timed_out: resp.timed_out.unwrap_or(false),
            exit_code: resp.exit_code,
        }
    }

    /// The request itself failed. Never reports `timed_out`: that flag belongs to the
    /// sandboxed program, not to the network.
    pub fn transport_failure(err: &RunpadError) -> Self {
        let message = err.to_string();
        Self {
            stdout: String::new(),
            stderr: if message.is_empty() { "Error".to_string() } else { message },
            timed_out: false,
            exit_code: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A file ready to be handed to the local save action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportFile {
    pub filename: String,
    pub content: String,
    pub mime_type: &'static str,
}

/// Everything one user is editing plus the latest run outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    language: Language,
    source: String,
    input: String,
    status: RunStatus,
    result: RunResult,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Language::default())
    }
}

impl Session {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            source: language.template().to_string(),
            input: String::new(),
            status: RunStatus::Idle,
            result: RunResult::default(),
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn result(&self) -> &RunResult {
        &self.result
    }

    pub fn is_pending(&self) -> bool {
        self.status == RunStatus::Pending
    }

    /// Owned copy of the current state for rendering.
    pub fn snapshot(&self) -> Session {
        self.clone()
    }

    /// Switches language, replacing the source with that language's template and clearing
    /// the last result. Program input is kept. An unsupported id leaves the session as is.
    ///
    /// A run already in flight stays pending and its settlement still lands.
    pub fn select_language(&mut self, id: &str) -> Result<()> {
        let language: Language = id.parse()?;

        self.language = language;
        self.source = language.template().to_string();
        self.result = RunResult::default();
        if self.status == RunStatus::Completed {
            self.status = RunStatus::Idle;
        }

        log::debug!("Language switched to {}", language);
        Ok(())
    }

    pub fn set_source(&mut self, text: impl Into<String>) {
        self.source = text.into();
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// First half of a run: clears the last result, enters `Pending` and snapshots the
    /// request. Returns `None` if a run is already pending.
    pub fn begin_run(&mut self, timeout_seconds: u32) -> Option<RunRequest> {
        if self.is_pending() {
            log::debug!("Run ignored, a run is already pending");
            return None;
        }

        self.result = RunResult::default();
        self.status = RunStatus::Pending;

        Some(RunRequest {
            language: self.language,
            code: self.source.clone(),
            stdin: self.input.clone(),
            timeout_seconds,
        })
    }

    /// Second half of a run: records the outcome and leaves `Pending`.
    pub fn settle(&mut self, outcome: Result<BackendResponse>) {
        if !self.is_pending() {
            log::warn!("Discarding run outcome, no run is pending");
            return;
        }

        self.result = match outcome {
            Ok(resp) => {
                let result = RunResult::from_response(resp);
                if result.timed_out {
                    log::info!("Run finished: execution timed out");
                } else {
                    log::info!("Run finished with exit code {:?}", result.exit_code);
                }
                result
            }
            Err(e) => {
                log::warn!("Run failed before producing a result: {}", e);
                RunResult::transport_failure(&e)
            }
        };
        self.status = RunStatus::Completed;
    }

    /// Runs the current program to completion. Returns `false` without contacting the
    /// backend when a run is already pending.
    pub async fn run(&mut self, backend: &dyn ExecutionBackend, timeout_seconds: u32) -> bool {
        let Some(request) = self.begin_run(timeout_seconds) else {
            return false;
        };
        let outcome = backend.execute(&request).await;
        self.settle(outcome);
        true
    }

    /// The current buffer as a file named after the language's canonical filename.
    pub fn export_source(&self) -> ExportFile {
        ExportFile {
            filename: self.language.export_mapping().filename.to_string(),
            content: self.source.clone(),
            mime_type: EXPORT_MIME_TYPE,
        }
    }
}
