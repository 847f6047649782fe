//! Process-local session storage.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::domain::session::ReviewSession;
use crate::domain::types::SessionId;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{SessionReader, SessionWriter};

/// Idle time after which an untouched session is dropped.
pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(2 * 60 * 60);
/// Upper bound on live sessions; the least recently used one is evicted.
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

#[derive(Debug)]
struct StoredSession {
    session: ReviewSession,
    touched: Instant,
    /// Store-wide access counter; orders entries for eviction.
    tick: u64,
}

type SessionMap = HashMap<SessionId, StoredSession>;

/// Mutex-guarded map of live review sessions, one per browser.
///
/// Sessions idle for longer than the configured TTL are pruned on every save.
#[derive(Debug)]
pub struct InMemorySessionStore {
    sessions: Mutex<SessionMap>,
    idle_ttl: Duration,
    max_sessions: usize,
    ticks: AtomicU64,
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::with_limits(DEFAULT_IDLE_TTL, DEFAULT_MAX_SESSIONS)
    }
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(idle_ttl: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            idle_ttl,
            max_sessions: max_sessions.max(1),
            ticks: AtomicU64::new(0),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().map(|sessions| sessions.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, SessionMap>> {
        self.sessions
            .lock()
            .map_err(|err| RepositoryError::Unexpected(format!("session store poisoned: {err}")))
    }

    fn next_tick(&self) -> u64 {
        self.ticks.fetch_add(1, Ordering::Relaxed)
    }

    /// Drops expired sessions, then the least recently used ones until a new
    /// entry fits. `keep` is never evicted.
    fn prune(&self, sessions: &mut SessionMap, keep: SessionId, now: Instant) {
        let before = sessions.len();
        sessions.retain(|id, stored| {
            *id == keep || now.saturating_duration_since(stored.touched) < self.idle_ttl
        });

        while sessions.len() >= self.max_sessions && !sessions.contains_key(&keep) {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, stored)| stored.tick)
                .map(|(id, _)| *id);
            match oldest {
                Some(id) => {
                    sessions.remove(&id);
                }
                None => break,
            }
        }

        let evicted = before - sessions.len();
        if evicted > 0 {
            log::debug!("Evicted {evicted} idle review sessions");
        }
    }
}

impl SessionReader for InMemorySessionStore {
    fn get_session(&self, id: SessionId) -> RepositoryResult<Option<ReviewSession>> {
        let mut sessions = self.lock()?;
        let now = Instant::now();
        let expired = match sessions.get(&id) {
            Some(stored) => now.saturating_duration_since(stored.touched) >= self.idle_ttl,
            None => return Ok(None),
        };
        if expired {
            sessions.remove(&id);
            return Ok(None);
        }
        let tick = self.next_tick();
        Ok(sessions.get_mut(&id).map(|stored| {
            stored.touched = now;
            stored.tick = tick;
            stored.session.clone()
        }))
    }
}

impl SessionWriter for InMemorySessionStore {
    fn save_session(
        &self,
        id: SessionId,
        session: &ReviewSession,
        expected_version: Option<u64>,
    ) -> RepositoryResult<()> {
        let mut sessions = self.lock()?;
        let now = Instant::now();
        if let Some(expected) = expected_version {
            match sessions.get(&id) {
                Some(stored) if stored.session.version() == expected => {}
                Some(stored) => {
                    return Err(RepositoryError::Conflict(format!(
                        "session {id} is at version {}, expected {expected}",
                        stored.session.version()
                    )));
                }
                None => return Err(RepositoryError::NotFound),
            }
        }
        self.prune(&mut sessions, id, now);
        sessions.insert(
            id,
            StoredSession {
                session: session.clone(),
                touched: now,
                tick: self.next_tick(),
            },
        );
        Ok(())
    }

    fn remove_session(&self, id: SessionId) -> RepositoryResult<bool> {
        Ok(self.lock()?.remove(&id).is_some())
    }
}
