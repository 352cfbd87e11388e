use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

/// Record key holding the client-side correlation token.
pub const CLIENT_SESSION_ID: &str = "client_session_id";
/// Record key holding the token's unix-timestamp expiration.
pub const CLIENT_SESSION_ID_EXPIRATION: &str = "client_session_id_expiration";

/// Request parameter carrying a candidate customer identifier.
pub const SESSION_ID_PARAM: &str = "session_id";

/// Default record lifetime, matching the host platform's 48-hour cart session.
pub const DEFAULT_SESSION_TTL_SECS: u32 = 172_800;

/// Identifier a session record is keyed by.
///
/// Bound sessions carry the caller-supplied `session_id` verbatim; anonymous
/// sessions get a freshly generated UUID.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct CustomerId(pub String);

impl CustomerId {
    /// Generates a fresh anonymous identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Borrows the underlying id as `&str`.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CustomerId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// Persisted per-customer key-value record.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct SessionRecord {
    pub customer_id: CustomerId,
    pub data: serde_json::Map<String, Value>,
    #[cfg_attr(feature = "schema", schemars(with = "String"))]
    pub updated_at: OffsetDateTime,
    pub ttl_secs: u32,
}

impl SessionRecord {
    /// Creates an empty record with the default lifetime.
    pub fn new(customer_id: CustomerId) -> Self {
        Self {
            customer_id,
            data: serde_json::Map::new(),
            updated_at: OffsetDateTime::now_utc(),
            ttl_secs: DEFAULT_SESSION_TTL_SECS,
        }
    }

    /// Stores an arbitrary key/value pair.
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.data.insert(key.into(), value);
    }

    /// Reads back a stored value, if any.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Returns the computed expiry deadline based on `updated_at` + `ttl_secs`.
    /// A zero TTL means the record never expires.
    pub fn expires_at(&self) -> Option<OffsetDateTime> {
        if self.ttl_secs == 0 {
            return None;
        }
        Some(self.updated_at + Duration::seconds(self.ttl_secs as i64))
    }

    /// The stored correlation token, honored only while its expiration
    /// timestamp is strictly in the future. An expired or absent token reads
    /// as `None` even when a value is still stored.
    pub fn client_session_id(&self, now: OffsetDateTime) -> Option<&str> {
        let token = self.get(CLIENT_SESSION_ID)?.as_str()?;
        let expiration = self.expiration_timestamp()?;
        if now.unix_timestamp() >= expiration {
            return None;
        }
        Some(token)
    }

    /// The token expiration as a unix timestamp. The value travels through
    /// the generic `set` channel, so both JSON numbers and numeric strings
    /// are accepted.
    pub fn expiration_timestamp(&self) -> Option<i64> {
        match self.get(CLIENT_SESSION_ID_EXPIRATION)? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }
}

/// Immutable snapshot of the query parameters of one incoming request.
#[derive(Clone, Debug, Default)]
pub struct TransferRequest {
    params: HashMap<String, String>,
}

impl TransferRequest {
    /// Builds a snapshot from decoded query pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            params: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// The candidate customer identifier, when present and non-empty.
    pub fn session_id(&self) -> Option<&str> {
        self.params
            .get(SESSION_ID_PARAM)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Whether a flow marker parameter is present. Marker values are not
    /// inspected; presence alone counts.
    pub fn has_marker(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    /// Raw parameter access for collaborators outside the protocol core.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}
