// src/api/state.rs
use crate::backend::{ExecutionBackend, HttpBackend};
use crate::config::AppConfig;
use crate::errors::Result;
use crate::store::SessionStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub backend: Arc<dyn ExecutionBackend>,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self> {
        let backend = HttpBackend::new(&config.backend)?;
        log::info!("Execution service endpoint: {}", backend.endpoint());
        Ok(Self::with_backend(config, Arc::new(backend)))
    }

    pub fn with_backend(config: AppConfig, backend: Arc<dyn ExecutionBackend>) -> Self {
        Self {
            config: Arc::new(config),
            backend,
            sessions: SessionStore::new(),
        }
    }
}
