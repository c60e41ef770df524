use std::sync::Arc;

use crate::auth::gate::{AuthGate, GatePolicy};
use crate::auth::password::CredentialVerifier;
use crate::auth::token::TokenCodec;
use crate::repos::users::UserStore;
use crate::storage::KeySource;

use super::security_config::SecurityConfig;

/// Shared, immutable application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub tokens: Arc<TokenCodec>,
    pub credentials: CredentialVerifier,
    pub gate: Arc<AuthGate>,
    pub security: SecurityConfig,
}

impl AppState {
    /// Wire the codec, verifier and gate from one security config.
    pub fn new(
        users: Arc<dyn UserStore>,
        keys: Arc<dyn KeySource>,
        security: SecurityConfig,
    ) -> Self {
        let tokens = Arc::new(TokenCodec::new(keys, &security));
        let gate = Arc::new(AuthGate::new(
            GatePolicy::new(security.privileged_role),
            Arc::clone(&tokens),
        ));
        Self {
            users,
            credentials: CredentialVerifier::from_config(&security),
            tokens,
            gate,
            security,
        }
    }
}
