#![forbid(unsafe_code)]

pub mod error;
pub mod handler;
pub mod inmemory;
pub mod model;
pub mod nonce;
#[cfg(feature = "redis")]
pub mod redis_store;
pub mod router;
pub mod store;

pub use error::{SessionError, SessionResult};
pub use handler::TransferSessionHandler;
pub use model::{CustomerId, SessionRecord, TransferRequest};
pub use nonce::NonceFactory;
pub use router::{EndpointConfig, ProtectedRouter, RouteRegistry, TargetRegistry, TargetResolver};
pub use store::{create_session_store, SessionBackendConfig, SessionStore};
