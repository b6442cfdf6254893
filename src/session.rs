//! Registry of logged-in client handles, keyed by session id.
//!
//! Bounded: once `capacity` handles are registered the least recently used one
//! is dropped to make room. Handles idle for longer than the configured
//! timeout are refused and removed when next looked up.
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use lru::LruCache;

use crate::config::schema::SessionsConfig;
use crate::error::DispatchError;
use crate::transport::sdk::ClientHandle;

/// A handle shared between the registry and the request using it.
pub type SharedHandle = Arc<Mutex<Box<dyn ClientHandle>>>;

struct Entry {
    handle: SharedHandle,
    genesis_id: String,
    last_used: Instant,
}

/// What a lookup hands back.
pub struct Session {
    pub handle: SharedHandle,
    pub genesis_id: String,
}

pub struct SessionRegistry {
    entries: LruCache<String, Entry>,
    idle_timeout: Duration,
}

impl SessionRegistry {
    /// A zero capacity is raised to one. A zero timeout disables expiry.
    pub fn new(capacity: usize, idle_timeout: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            idle_timeout,
        }
    }

    pub fn from_config(sessions: &SessionsConfig) -> Self {
        Self::new(
            sessions.capacity,
            Duration::from_secs(sessions.idle_timeout_secs),
        )
    }

    /// Register `handle` under `session_id`, replacing any previous handle
    /// with the same id.
    pub fn register(&mut self, session_id: &str, genesis_id: &str, handle: SharedHandle) {
        self.register_at(session_id, genesis_id, handle, Instant::now());
    }

    pub fn register_at(
        &mut self,
        session_id: &str,
        genesis_id: &str,
        handle: SharedHandle,
        now: Instant,
    ) {
        let entry = Entry {
            handle,
            genesis_id: genesis_id.to_string(),
            last_used: now,
        };
        if let Some((old, _)) = self.entries.push(session_id.to_string(), entry) {
            if old == session_id {
                log::debug!("replaced handle for session {session_id}");
            } else {
                log::debug!("session registry full, evicted {old}");
            }
        }
    }

    /// Look up the handle for `session_id` and mark it used.
    pub fn resolve(&mut self, session_id: &str) -> Result<Session, DispatchError> {
        self.resolve_at(session_id, Instant::now())
    }

    pub fn resolve_at(&mut self, session_id: &str, now: Instant) -> Result<Session, DispatchError> {
        let last_used = self
            .entries
            .peek(session_id)
            .map(|entry| entry.last_used)
            .ok_or_else(|| DispatchError::UnknownSession(session_id.to_string()))?;

        if self.is_expired(last_used, now) {
            self.entries.pop(session_id);
            log::info!("session {session_id} expired");
            return Err(DispatchError::ExpiredSession(session_id.to_string()));
        }

        let entry = self
            .entries
            .get_mut(session_id)
            .ok_or_else(|| DispatchError::UnknownSession(session_id.to_string()))?;
        entry.last_used = now;
        Ok(Session {
            handle: Arc::clone(&entry.handle),
            genesis_id: entry.genesis_id.clone(),
        })
    }

    fn is_expired(&self, last_used: Instant, now: Instant) -> bool {
        !self.idle_timeout.is_zero() && now.saturating_duration_since(last_used) > self.idle_timeout
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.entries.contains(session_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    struct Dummy;

    impl ClientHandle for Dummy {
        fn call(&mut self, _method: &str, _args: &[&str]) -> Value {
            json!({ "result": null })
        }
        fn session_id(&self) -> &str {
            ""
        }
        fn genesis_id(&self) -> &str {
            ""
        }
    }

    fn handle() -> SharedHandle {
        Arc::new(Mutex::new(Box::new(Dummy)))
    }

    #[test]
    fn unknown_session_is_refused() {
        let mut reg = SessionRegistry::new(4, Duration::ZERO);
        let err = reg.resolve("nope").err().unwrap();
        assert_eq!(err, DispatchError::UnknownSession("nope".to_string()));
    }

    #[test]
    fn registered_session_resolves_with_genesis() {
        let mut reg = SessionRegistry::new(4, Duration::ZERO);
        reg.register("S1", "G1", handle());
        let session = reg.resolve("S1").unwrap();
        assert_eq!(session.genesis_id, "G1");
        assert!(reg.contains("S1"));
    }

    #[test]
    fn same_id_overwrites() {
        let mut reg = SessionRegistry::new(4, Duration::ZERO);
        reg.register("S1", "G1", handle());
        reg.register("S1", "G2", handle());
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.resolve("S1").unwrap().genesis_id, "G2");
    }

    #[test]
    fn least_recently_used_is_evicted() {
        let mut reg = SessionRegistry::new(2, Duration::ZERO);
        reg.register("A", "", handle());
        reg.register("B", "", handle());
        reg.resolve("A").unwrap();
        reg.register("C", "", handle());
        assert!(reg.contains("A"));
        assert!(!reg.contains("B"));
        assert!(reg.contains("C"));
    }

    #[test]
    fn zero_capacity_still_holds_one() {
        let mut reg = SessionRegistry::new(0, Duration::ZERO);
        reg.register("A", "", handle());
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn idle_session_expires_and_is_removed() {
        let mut reg = SessionRegistry::new(4, Duration::from_secs(60));
        let start = Instant::now();
        reg.register_at("S1", "G1", handle(), start);

        assert!(reg.resolve_at("S1", start + Duration::from_secs(30)).is_ok());
        // the lookup above refreshed the idle clock
        assert!(reg.resolve_at("S1", start + Duration::from_secs(80)).is_ok());

        let err = reg
            .resolve_at("S1", start + Duration::from_secs(200))
            .err()
            .unwrap();
        assert_eq!(err, DispatchError::ExpiredSession("S1".to_string()));
        assert!(reg.is_empty());
    }
}
