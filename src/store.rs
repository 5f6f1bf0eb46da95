// src/store.rs
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::backend::{ExecutionBackend, RunRequest};
use crate::errors::{Result, RunpadError};
use crate::language::Language;
use crate::session::Session;

const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

pub type SharedSession = Arc<Mutex<Session>>;

struct Entry {
    session: SharedSession,
    last_access: Instant,
}

/// In-memory sessions, one per open browser page. Nothing survives a restart.
///
/// Pages remove their session when they go away; sessions whose page vanished without
/// saying so are dropped by [`SessionStore::sweep_idle`].
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Entry>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self, language: Language) -> (Uuid, SharedSession) {
        let id = Uuid::new_v4();
        let session = Arc::new(Mutex::new(Session::new(language)));
        let entry = Entry {
            session: session.clone(),
            last_access: Instant::now(),
        };
        self.sessions.write().await.insert(id, entry);
        log::info!("Created session {} ({})", id, language);
        (id, session)
    }

    /// Looks up a session and marks it as recently used.
    pub async fn get(&self, id: &Uuid) -> Result<SharedSession> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions
            .get_mut(id)
            .ok_or_else(|| RunpadError::SessionNotFound(id.to_string()))?;
        entry.last_access = Instant::now();
        Ok(entry.session.clone())
    }

    pub async fn remove(&self, id: &Uuid) -> Result<()> {
        match self.sessions.write().await.remove(id) {
            Some(_) => {
                log::info!("Removed session {}", id);
                Ok(())
            }
            None => Err(RunpadError::SessionNotFound(id.to_string())),
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drops sessions not accessed within `max_idle`. Returns how many were dropped.
    pub async fn sweep_idle(&self, max_idle: Duration) -> usize {
        self.sweep_idle_at(Instant::now(), max_idle).await
    }

    /// Sessions with a run in flight, or locked by a handler, are kept regardless of age.
    pub async fn sweep_idle_at(&self, now: Instant, max_idle: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();

        sessions.retain(|id, entry| {
            if now.saturating_duration_since(entry.last_access) < max_idle {
                return true;
            }
            let busy = match entry.session.try_lock() {
                Ok(session) => session.is_pending(),
                Err(_) => true,
            };
            if !busy {
                log::debug!("Dropping idle session {}", id);
            }
            busy
        });

        let dropped = before - sessions.len();
        if dropped > 0 {
            log::info!("Dropped {} idle session(s), {} remain", dropped, sessions.len());
        }
        dropped
    }
}

/// Sweeps idle sessions for as long as the server runs.
pub async fn sweep_forever(store: SessionStore, max_idle: Duration) {
    let mut ticker = tokio::time::interval(max_idle.min(SWEEP_INTERVAL));
    loop {
        ticker.tick().await;
        store.sweep_idle(max_idle).await;
    }
}

/// Runs a session that other handlers may touch concurrently.
///
/// The lock is released while the request is in flight so edits and view reads are not
/// blocked; the pending guard keeps a second run from starting meanwhile.
pub async fn run_shared(
    session: &Mutex<Session>,
    backend: &dyn ExecutionBackend,
    timeout_seconds: u32,
) -> bool {
    let request = session.lock().await.begin_run(timeout_seconds);
    match request {
        Some(request) => {
            execute_and_settle(session, backend, &request).await;
            true
        }
        None => false,
    }
}

/// Sends a request obtained from [`Session::begin_run`] and records its outcome.
pub async fn execute_and_settle(
    session: &Mutex<Session>,
    backend: &dyn ExecutionBackend,
    request: &RunRequest,
) {
    let outcome = backend.execute(request).await;
    session.lock().await.settle(outcome);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendResponse;
    use crate::session::RunStatus;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct SlowBackend {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ExecutionBackend for SlowBackend {
        async fn execute(&self, _request: &RunRequest) -> Result<BackendResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok(BackendResponse {
                stdout: Some("done\n".to_string()),
                exit_code: Some(0),
                ..BackendResponse::default()
            })
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let store = SessionStore::new();
        let (id, _) = store.create(Language::Cpp).await;

        let session = store.get(&id).await.unwrap();
        assert_eq!(session.lock().await.language(), Language::Cpp);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_get_unknown_session() {
        let store = SessionStore::new();
        let err = store.get(&Uuid::new_v4()).await.err().unwrap();
        assert!(matches!(err, RunpadError::SessionNotFound(_)));
    }

    #[tokio::test]
    async fn test_remove_session() {
        let store = SessionStore::new();
        let (id, _) = store.create(Language::Python).await;

        store.remove(&id).await.unwrap();

        assert_eq!(store.len().await, 0);
        assert!(matches!(
            store.get(&id).await.err().unwrap(),
            RunpadError::SessionNotFound(_)
        ));
        assert!(matches!(
            store.remove(&id).await.unwrap_err(),
            RunpadError::SessionNotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_sweep_drops_only_idle_sessions() {
        let ttl = Duration::from_secs(3600);
        let store = SessionStore::new();
        store.create(Language::Python).await;
        store.create(Language::Java).await;

        let soon = Instant::now() + Duration::from_secs(60);
        assert_eq!(store.sweep_idle_at(soon, ttl).await, 0);
        assert_eq!(store.len().await, 2);

        let later = Instant::now() + ttl + Duration::from_secs(1);
        assert_eq!(store.sweep_idle_at(later, ttl).await, 2);
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_sweep_keeps_session_with_run_in_flight() {
        let ttl = Duration::from_secs(3600);
        let store = SessionStore::new();
        let (busy, session) = store.create(Language::Python).await;
        let (idle, _) = store.create(Language::Python).await;
        session.lock().await.begin_run(10).unwrap();

        let later = Instant::now() + ttl * 2;
        assert_eq!(store.sweep_idle_at(later, ttl).await, 1);

        assert!(store.get(&busy).await.is_ok());
        assert!(store.get(&idle).await.is_err());
    }

    #[tokio::test]
    async fn test_get_refreshes_last_access() {
        let ttl = Duration::from_secs(3600);
        let store = SessionStore::new();
        let (id, _) = store.create(Language::Python).await;
        let created = Instant::now();

        tokio::time::sleep(Duration::from_millis(20)).await;
        store.get(&id).await.unwrap();

        // Idle for exactly the TTL as measured from creation, but not from the last get.
        let at = created + ttl;
        assert_eq!(store.sweep_idle_at(at, ttl).await, 0);
        assert!(store.get(&id).await.is_ok());
    }

    #[tokio::test]
    async fn test_concurrent_runs_issue_one_request() {
        let backend = SlowBackend { calls: AtomicUsize::new(0) };
        let store = SessionStore::new();
        let (_, session) = store.create(Language::Python).await;

        let (first, second) = tokio::join!(
            run_shared(&session, &backend, 10),
            run_shared(&session, &backend, 10)
        );

        assert!(first ^ second);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
        let session = session.lock().await;
        assert_eq!(session.status(), RunStatus::Completed);
        assert_eq!(session.result().stdout, "done\n");
    }

    #[tokio::test]
    async fn test_edits_allowed_while_pending() {
        let backend = SlowBackend { calls: AtomicUsize::new(0) };
        let store = SessionStore::new();
        let (_, session) = store.create(Language::Python).await;

        let edit = async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            let mut guard = session.lock().await;
            assert!(guard.is_pending());
            guard.set_input("typed during run");
        };

        tokio::join!(run_shared(&session, &backend, 10), edit);

        let session = session.lock().await;
        assert_eq!(session.input(), "typed during run");
        assert_eq!(session.status(), RunStatus::Completed);
    }
}
