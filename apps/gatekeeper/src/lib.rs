#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod adapters;
pub mod auth;
pub mod config;
pub mod entities;
pub mod error;
pub mod errors;
pub mod extractors;
pub mod infra;
pub mod logging;
pub mod middleware;
pub mod repos;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;
pub mod trace_ctx;

#[cfg(test)]
pub mod test_bootstrap;

pub use auth::{AuthGate, Claims, CredentialVerifier, GatePolicy, TokenCodec, TokenError};
pub use config::{AppConfig, KeyStoreConfig};
pub use error::AppError;
pub use extractors::{form_config, AuthClaims, ValidatedJson};
pub use infra::db::{bootstrap_db, connect_db};
pub use infra::state::{key_source, StateBuilder};
pub use middleware::{cors_middleware, AuthGateMiddleware, RequestTrace, StructuredLogger, TraceSpan};
pub use state::{AppState, SecurityConfig};
pub use storage::{FetchError, KeySource, ObjectLocation};

#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
