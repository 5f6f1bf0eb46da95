// src/config.rs
use serde::Deserialize;
use std::path::Path;

use crate::errors::{Result, RunpadError};
use crate::language::Language;

/// Execution budget sent with every run, in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: u32 = 10;

/// How long the client waits for the execution service before giving up.
pub const DEFAULT_TRANSPORT_DEADLINE_MS: u64 = 20_000;

/// Largest JSON body accepted from the browser, in bytes.
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

/// Sessions untouched for this long are dropped.
pub const DEFAULT_SESSION_IDLE_TTL_SECS: u64 = 60 * 60;

/// Where the HTTP server listens and how it bounds what browsers leave behind.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_bytes: usize,
    pub session_idle_ttl_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            session_idle_ttl_secs: DEFAULT_SESSION_IDLE_TTL_SECS,
        }
    }
}

/// How to reach the execution service and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,
    pub run_path: String,
    pub timeout_seconds: u32,
    pub transport_deadline_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            run_path: "/run".to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            transport_deadline_ms: DEFAULT_TRANSPORT_DEADLINE_MS,
        }
    }
}

impl BackendConfig {
    /// Full URL of the `run` endpoint.
    pub fn run_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.run_path.trim_start_matches('/')
        )
    }
}

/// High-level application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub default_language: Language,
}

impl AppConfig {
    /// Load configuration from an optional TOML file (`RUNPAD_CONFIG`) and then apply
    /// environment overrides.
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var("RUNPAD_CONFIG") {
            Ok(path) => Self::load(&path)?,
            Err(_) => Self::default(),
        };

        if let Ok(host) = std::env::var("RUNPAD_HOST") {
            config.server.host = host;
        }
        if let Ok(port) = std::env::var("RUNPAD_PORT") {
            config.server.port = parse_env("RUNPAD_PORT", &port)?;
        }
        if let Ok(bytes) = std::env::var("RUNPAD_MAX_BODY_BYTES") {
            config.server.max_body_bytes = parse_env("RUNPAD_MAX_BODY_BYTES", &bytes)?;
        }
        if let Ok(secs) = std::env::var("RUNPAD_SESSION_IDLE_TTL_SECS") {
            config.server.session_idle_ttl_secs = parse_env("RUNPAD_SESSION_IDLE_TTL_SECS", &secs)?;
        }
        if let Ok(url) = std::env::var("EXECUTION_BACKEND_URL") {
            config.backend.base_url = url;
        }
        if let Ok(secs) = std::env::var("RUNPAD_TIMEOUT_SECONDS") {
            config.backend.timeout_seconds = parse_env("RUNPAD_TIMEOUT_SECONDS", &secs)?;
        }
        if let Ok(ms) = std::env::var("RUNPAD_TRANSPORT_DEADLINE_MS") {
            config.backend.transport_deadline_ms = parse_env("RUNPAD_TRANSPORT_DEADLINE_MS", &ms)?;
        }
        if let Ok(lang) = std::env::var("RUNPAD_DEFAULT_LANGUAGE") {
            config.default_language = lang.parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Read and validate a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects zero limits. The client deadline must outlast the execution budget,
    /// otherwise the client would give up before the service can report its own timeout.
    pub fn validate(&self) -> Result<()> {
        if self.server.max_body_bytes == 0 {
            return Err(RunpadError::Config("server.max_body_bytes must be at least 1".to_string()));
        }
        if self.server.session_idle_ttl_secs == 0 {
            return Err(RunpadError::Config(
                "server.session_idle_ttl_secs must be at least 1".to_string(),
            ));
        }

        let backend = &self.backend;

        if backend.base_url.trim().is_empty() {
            return Err(RunpadError::Config("backend.base_url must not be empty".to_string()));
        }
        if backend.timeout_seconds == 0 {
            return Err(RunpadError::Config(
                "backend.timeout_seconds must be at least 1".to_string(),
            ));
        }
        let budget_ms = u64::from(backend.timeout_seconds) * 1000;
        if backend.transport_deadline_ms <= budget_ms {
            return Err(RunpadError::Config(format!(
                "backend.transport_deadline_ms ({}) must be greater than timeout_seconds * 1000 ({})",
                backend.transport_deadline_ms, budget_ms
            )));
        }

        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| RunpadError::Config(format!("{} has an invalid value: '{}'", name, value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_run_contract() {
        let config = AppConfig::default();

        assert_eq!(config.backend.timeout_seconds, 10);
        assert_eq!(config.backend.transport_deadline_ms, 20_000);
        assert_eq!(config.default_language, Language::Python);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_run_url_joins_slashes() {
        let backend = BackendConfig {
            base_url: "http://runner:8000/".to_string(),
            run_path: "/run".to_string(),
            ..BackendConfig::default()
        };
        assert_eq!(backend.run_url(), "http://runner:8000/run");

        let backend = BackendConfig {
            base_url: "http://runner:8000".to_string(),
            run_path: "run".to_string(),
            ..BackendConfig::default()
        };
        assert_eq!(backend.run_url(), "http://runner:8000/run");
    }

    #[test]
    fn test_from_toml_partial_file() {
        let config = AppConfig::from_toml_str(
            r#"
            default_language = "java"

            [server]
            port = 9090

            [backend]
            base_url = "http://sandbox.internal:5000"
            "#,
        )
        .unwrap();

        assert_eq!(config.default_language, Language::Java);
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.backend.run_url(), "http://sandbox.internal:5000/run");
        assert_eq!(config.backend.timeout_seconds, 10);
    }

    #[test]
    fn test_deadline_must_exceed_budget() {
        let mut config = AppConfig::default();
        config.backend.transport_deadline_ms = 10_000;

        let err = config.validate().unwrap_err();
        assert!(matches!(err, RunpadError::Config(_)));

        config.backend.transport_deadline_ms = 10_001;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_unknown_default_language() {
        let err = AppConfig::from_toml_str(r#"default_language = "cobol""#).unwrap_err();
        assert!(matches!(err, RunpadError::TomlParse(_)));
    }

    #[test]
    fn test_server_limits() {
        let config = AppConfig::default();
        assert_eq!(config.server.max_body_bytes, DEFAULT_MAX_BODY_BYTES);
        assert_eq!(config.server.session_idle_ttl_secs, 3600);

        let config =
            AppConfig::from_toml_str("[server]\nmax_body_bytes = 1024\nsession_idle_ttl_secs = 60")
                .unwrap();
        assert_eq!(config.server.max_body_bytes, 1024);
        assert_eq!(config.server.session_idle_ttl_secs, 60);

        let err = AppConfig::from_toml_str("[server]\nsession_idle_ttl_secs = 0").unwrap_err();
        assert!(matches!(err, RunpadError::Config(_)));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let err = AppConfig::from_toml_str("[backend]\ntimeout_seconds = 0").unwrap_err();
        assert!(matches!(err, RunpadError::Config(_)));
    }
}
