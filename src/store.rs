use crate::error::SessionResult;
use crate::model::{CustomerId, SessionRecord};
use std::sync::Arc;

/// Persistent session storage keyed by customer id.
///
/// The transfer handler rehydrates a `SessionRecord` from this store on each
/// request and writes it back on mutation. Writes are last-writer-wins; the
/// correlation token the protocol stores is short-lived and self-correcting,
/// so no compare-and-set channel is offered.
pub trait SessionStore: Send + Sync + 'static {
    /// Fetches the record for the given customer, if present and unexpired.
    fn load(&self, id: &CustomerId) -> SessionResult<Option<SessionRecord>>;

    /// Writes the record back, refreshing its `updated_at` stamp.
    fn save(&self, record: SessionRecord) -> SessionResult<()>;

    /// Removes the record. Returns whether anything was deleted.
    fn delete(&self, id: &CustomerId) -> SessionResult<bool>;

    /// Refreshes `updated_at`, optionally replacing the TTL. Returns `false`
    /// when the record is absent or already expired.
    fn touch(&self, id: &CustomerId, ttl_secs: Option<u32>) -> SessionResult<bool>;
}

/// Backend selection for [`create_session_store`].
#[derive(Clone, Debug)]
pub enum SessionBackendConfig {
    InMemory,
    #[cfg(feature = "redis")]
    Redis {
        url: String,
        namespace: Option<String>,
    },
}

/// Builds a session store from configuration.
pub fn create_session_store(config: SessionBackendConfig) -> SessionResult<Arc<dyn SessionStore>> {
    match config {
        SessionBackendConfig::InMemory => Ok(Arc::new(crate::inmemory::InMemorySessionStore::new())),
        #[cfg(feature = "redis")]
        SessionBackendConfig::Redis { url, namespace } => {
            if url.is_empty() {
                return Err(crate::error::SessionError::InvalidArgument(
                    "redis url must not be empty".to_owned(),
                ));
            }
            let store = match namespace {
                Some(ns) => crate::redis_store::RedisSessionStore::from_url_with_namespace(url, ns)?,
                None => crate::redis_store::RedisSessionStore::from_url(url)?,
            };
            Ok(Arc::new(store))
        }
    }
}
