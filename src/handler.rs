use crate::model::{CustomerId, SessionRecord, TransferRequest, CLIENT_SESSION_ID};
use crate::router::TargetRegistry;
use crate::store::SessionStore;
use serde_json::Value;
use std::sync::Arc;
use time::OffsetDateTime;

enum Identity {
    Uninitialized,
    /// Request carried a session id together with a registered flow marker;
    /// the supplied id is honored verbatim.
    Bound(CustomerId),
    /// Credentials were absent or incomplete; a fresh id was generated.
    Anonymous(CustomerId),
}

/// Mediates identity continuity across the redirect boundary.
///
/// One handler is constructed per incoming request. Every operation is
/// total: invalid credentials, expired tokens, and store failures all
/// degrade to the anonymous/empty path rather than raising.
pub struct TransferSessionHandler {
    store: Arc<dyn SessionStore>,
    registry: TargetRegistry,
    request: TransferRequest,
    identity: Identity,
    record: Option<SessionRecord>,
}

impl TransferSessionHandler {
    pub fn new(
        store: Arc<dyn SessionStore>,
        registry: TargetRegistry,
        request: TransferRequest,
    ) -> Self {
        Self {
            store,
            registry,
            request,
            identity: Identity::Uninitialized,
            record: None,
        }
    }

    /// Establishes the request's session state, re-evaluating credentials on
    /// every call. A `session_id` is honored only when accompanied by at
    /// least one registered flow marker; anything less falls back to a
    /// freshly generated anonymous identity.
    pub fn init_session_cookie(&mut self) {
        let bound_id = self
            .request
            .session_id()
            .filter(|_| self.registry.contains_marker(&self.request))
            .map(CustomerId::from);

        match bound_id {
            Some(id) => {
                let record = match self.store.load(&id) {
                    Ok(Some(record)) => record,
                    Ok(None) => SessionRecord::new(id.clone()),
                    Err(err) => {
                        tracing::warn!(error = %err, "session load failed, starting empty record");
                        SessionRecord::new(id.clone())
                    }
                };
                self.identity = Identity::Bound(id);
                self.record = Some(record);
            }
            None => {
                let partial = self.request.session_id().is_some()
                    || self.registry.contains_marker(&self.request);
                if partial {
                    tracing::debug!("incomplete transfer credentials, falling back to anonymous");
                }
                let id = CustomerId::generate();
                self.record = Some(SessionRecord::new(id.clone()));
                self.identity = Identity::Anonymous(id);
            }
        }
    }

    fn ensure_initialized(&mut self) {
        if matches!(self.identity, Identity::Uninitialized) {
            self.init_session_cookie();
        }
    }

    /// The identifier resolved by the last credential evaluation.
    pub fn get_customer_id(&mut self) -> CustomerId {
        self.ensure_initialized();
        match &self.identity {
            Identity::Bound(id) | Identity::Anonymous(id) => id.clone(),
            Identity::Uninitialized => unreachable!("ensure_initialized establishes identity"),
        }
    }

    /// Stores a key/value pair in the session record and writes it through.
    /// Writes are last-writer-wins; a store failure is logged, not raised.
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.ensure_initialized();
        if let Some(record) = self.record.as_mut() {
            record.set(key, value);
            if let Err(err) = self.store.save(record.clone()) {
                tracing::warn!(error = %err, "session save failed, record not persisted");
            }
        }
    }

    /// The client correlation token, non-empty only for a bound session
    /// holding an unexpired token. Absence and expiry both read as `""`.
    pub fn get_client_session_id(&mut self) -> String {
        self.ensure_initialized();
        if !matches!(self.identity, Identity::Bound(_)) {
            return String::new();
        }
        let Some(record) = self.record.as_ref() else {
            return String::new();
        };
        let now = OffsetDateTime::now_utc();
        match record.client_session_id(now) {
            Some(token) => token.to_owned(),
            None => {
                if record.get(CLIENT_SESSION_ID).is_some() {
                    tracing::debug!("stored correlation token expired or malformed");
                }
                String::new()
            }
        }
    }
}
