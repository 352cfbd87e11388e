use crate::error::SessionResult;
use crate::model::{CustomerId, SessionRecord};
use crate::store::SessionStore;
use dashmap::DashMap;
use parking_lot::Mutex;
use time::{Duration, OffsetDateTime};

struct Entry {
    record: SessionRecord,
    expires_at: Option<OffsetDateTime>,
}

impl Entry {
    fn new(record: SessionRecord) -> Self {
        let expires_at = record.expires_at();
        Self { record, expires_at }
    }

    fn is_expired(&self, now: OffsetDateTime) -> bool {
        match self.expires_at {
            Some(exp) => now >= exp,
            None => false,
        }
    }
}

/// In-memory implementation backed by a concurrent hash map.
pub struct InMemorySessionStore {
    entries: DashMap<CustomerId, Entry>,
    cleanup_hint: Mutex<OffsetDateTime>,
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self {
            entries: DashMap::new(),
            cleanup_hint: Mutex::new(OffsetDateTime::now_utc()),
        }
    }
}

impl InMemorySessionStore {
    /// Constructs a store with no background maintenance. Expiration is
    /// handled lazily on access.
    pub fn new() -> Self {
        Self::default()
    }

    fn now() -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }

    fn maybe_cleanup(&self, now: OffsetDateTime) {
        let mut guard = self.cleanup_hint.lock();
        if now - *guard < Duration::seconds(60) {
            return;
        }

        let stale_keys: Vec<_> = self
            .entries
            .iter()
            .filter_map(|entry| {
                if entry.value().is_expired(now) {
                    Some(entry.key().clone())
                } else {
                    None
                }
            })
            .collect();

        for key in stale_keys {
            self.entries.remove(&key);
        }

        *guard = now;
    }
}

impl SessionStore for InMemorySessionStore {
    fn load(&self, id: &CustomerId) -> SessionResult<Option<SessionRecord>> {
        let now = Self::now();
        self.maybe_cleanup(now);
        if let Some(entry) = self.entries.get(id) {
            if entry.is_expired(now) {
                drop(entry);
                self.entries.remove(id);
                return Ok(None);
            }
            return Ok(Some(entry.record.clone()));
        }
        Ok(None)
    }

    fn save(&self, mut record: SessionRecord) -> SessionResult<()> {
        let now = Self::now();
        self.maybe_cleanup(now);
        record.updated_at = now;
        let id = record.customer_id.clone();
        self.entries.insert(id, Entry::new(record));
        Ok(())
    }

    fn delete(&self, id: &CustomerId) -> SessionResult<bool> {
        Ok(self.entries.remove(id).is_some())
    }

    fn touch(&self, id: &CustomerId, ttl_secs: Option<u32>) -> SessionResult<bool> {
        let now = Self::now();
        self.maybe_cleanup(now);
        if let Some(mut guard) = self.entries.get_mut(id) {
            if guard.is_expired(now) {
                drop(guard);
                self.entries.remove(id);
                return Ok(false);
            }

            if let Some(ttl) = ttl_secs {
                guard.record.ttl_secs = ttl;
            }
            guard.record.updated_at = now;
            guard.expires_at = guard.record.expires_at();
            return Ok(true);
        }
        Ok(false)
    }
}
