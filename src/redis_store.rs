use crate::error::{redis_error, serde_error, SessionResult};
use crate::model::{CustomerId, SessionRecord};
use crate::store::SessionStore;
use redis::{Client, Commands, Connection};
use time::OffsetDateTime;

const DEFAULT_NAMESPACE: &str = "storefront:session";

/// Redis-backed session store that mirrors the in-memory semantics.
///
/// Record lifetimes map onto Redis key TTLs, so expiry needs no sweep.
/// Constructors accept connection URLs only; no Redis client types appear in
/// the public API.
pub struct RedisSessionStore {
    client: Client,
    namespace: String,
}

impl RedisSessionStore {
    /// Creates a store using a Redis URL and the default namespace prefix.
    pub fn from_url(url: impl AsRef<str>) -> SessionResult<Self> {
        Self::from_url_with_namespace(url, DEFAULT_NAMESPACE)
    }

    /// Creates a store using a Redis URL and a custom namespace prefix.
    pub fn from_url_with_namespace(
        url: impl AsRef<str>,
        namespace: impl Into<String>,
    ) -> SessionResult<Self> {
        let client = Client::open(url.as_ref()).map_err(redis_error)?;
        Ok(Self {
            client,
            namespace: namespace.into(),
        })
    }

    fn conn(&self) -> SessionResult<Connection> {
        self.client.get_connection().map_err(redis_error)
    }

    fn entry_key(&self, id: &CustomerId) -> String {
        format!("{}:{}", self.namespace, id.as_str())
    }

    fn write(&self, conn: &mut Connection, record: &SessionRecord) -> SessionResult<()> {
        let key = self.entry_key(&record.customer_id);
        let payload = serde_json::to_string(record).map_err(serde_error)?;
        if record.ttl_secs > 0 {
            conn.set_ex(key, payload, record.ttl_secs as u64)
                .map_err(redis_error)
        } else {
            conn.set(key, payload).map_err(redis_error)
        }
    }
}

impl SessionStore for RedisSessionStore {
    fn load(&self, id: &CustomerId) -> SessionResult<Option<SessionRecord>> {
        let mut conn = self.conn()?;
        let payload: Option<String> = conn.get(self.entry_key(id)).map_err(redis_error)?;
        match payload {
            Some(raw) => {
                let record: SessionRecord = serde_json::from_str(&raw).map_err(serde_error)?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    fn save(&self, mut record: SessionRecord) -> SessionResult<()> {
        let mut conn = self.conn()?;
        record.updated_at = OffsetDateTime::now_utc();
        self.write(&mut conn, &record)
    }

    fn delete(&self, id: &CustomerId) -> SessionResult<bool> {
        let mut conn = self.conn()?;
        let removed: i64 = conn.del(self.entry_key(id)).map_err(redis_error)?;
        Ok(removed > 0)
    }

    fn touch(&self, id: &CustomerId, ttl_secs: Option<u32>) -> SessionResult<bool> {
        let mut conn = self.conn()?;
        let payload: Option<String> = conn.get(self.entry_key(id)).map_err(redis_error)?;
        let Some(raw) = payload else {
            return Ok(false);
        };
        let mut record: SessionRecord = serde_json::from_str(&raw).map_err(serde_error)?;
        if let Some(ttl) = ttl_secs {
            record.ttl_secs = ttl;
        }
        record.updated_at = OffsetDateTime::now_utc();
        self.write(&mut conn, &record)?;
        Ok(true)
    }
}
