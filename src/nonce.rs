use sha2::{Digest, Sha256};
use time::OffsetDateTime;

const TOKEN_LEN: usize = 10;
const DEFAULT_LIFETIME_SECS: u64 = 3600;

/// Deterministic, time-windowed nonce tokens for transfer URLs.
///
/// Tokens are the leading hex of `sha256(secret:tick:action)` where the tick
/// advances every half lifetime. Verification accepts the current and the
/// previous tick, so a token stays valid for at least half its lifetime and
/// at most the full one. Actions are built by callers as
/// `<nonce_prefix><client_session_id>`.
pub struct NonceFactory {
    secret: String,
    lifetime_secs: u64,
}

impl NonceFactory {
    /// Creates a factory with the default one-hour lifetime.
    pub fn new(secret: impl Into<String>) -> Self {
        Self::with_lifetime(secret, DEFAULT_LIFETIME_SECS)
    }

    /// Creates a factory with a custom lifetime in seconds. A zero lifetime
    /// is clamped to one second so the tick never divides by zero.
    pub fn with_lifetime(secret: impl Into<String>, lifetime_secs: u64) -> Self {
        Self {
            secret: secret.into(),
            lifetime_secs: lifetime_secs.max(1),
        }
    }

    fn tick(&self, now: OffsetDateTime) -> u64 {
        let half = (self.lifetime_secs / 2).max(1);
        (now.unix_timestamp().max(0) as u64) / half
    }

    fn token_at(&self, action: &str, tick: u64) -> String {
        let mut hasher = Sha256::new();
        hasher.update(format!("{}:{}:{}", self.secret, tick, action).as_bytes());
        let mut token = hex::encode(hasher.finalize());
        token.truncate(TOKEN_LEN);
        token
    }

    /// Produces the token for `action` in the current window.
    pub fn create(&self, action: &str) -> String {
        self.token_at(action, self.tick(OffsetDateTime::now_utc()))
    }

    /// Checks a token against the current and previous window.
    pub fn verify(&self, token: &str, action: &str) -> bool {
        let tick = self.tick(OffsetDateTime::now_utc());
        if self.token_at(action, tick) == token {
            return true;
        }
        tick > 0 && self.token_at(action, tick - 1) == token
    }
}
