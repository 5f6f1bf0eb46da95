// src/errors.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunpadError {
    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Request to execution service failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Execution service responded with status {status}: {body}")]
    BackendStatus { status: u16, body: String },

    #[error("Malformed response from execution service: {0}")]
    MalformedResponse(String),

    #[error("Request to execution service timed out after {deadline_ms}ms")]
    DeadlineExceeded { deadline_ms: u64 },

    #[error("Unsupported language '{0}'")]
    UnsupportedLanguage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Session '{0}' not found")]
    SessionNotFound(String),
}

pub type Result<T> = std::result::Result<T, RunpadError>;
