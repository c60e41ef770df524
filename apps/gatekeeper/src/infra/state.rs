use std::sync::Arc;

use tracing::info;

use crate::adapters::users_sea::SeaUserStore;
use crate::config::KeyStoreConfig;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::infra::db::bootstrap_db;
use crate::repos::users::UserStore;
use crate::state::app_state::AppState;
use crate::state::security_config::SecurityConfig;
use crate::storage::{FsKeySource, HttpKeySource, KeySource};

/// Key source selected by configuration.
pub fn key_source(config: &KeyStoreConfig) -> Result<Arc<dyn KeySource>, AppError> {
    match config {
        KeyStoreConfig::Filesystem { root } => {
            info!(root = %root.display(), "Using filesystem key store");
            Ok(Arc::new(FsKeySource::new(root.clone())))
        }
        KeyStoreConfig::Http {
            endpoint,
            access_token,
        } => {
            info!(%endpoint, "Using HTTP object store for keys");
            let source = HttpKeySource::new(endpoint.clone(), access_token.clone())
                .map_err(|e| AppError::config(format!("HTTP client setup failed: {e}")))?;
            Ok(Arc::new(source))
        }
    }
}

/// Builder for [`AppState`], shared by `main` and tests.
pub struct StateBuilder {
    security: SecurityConfig,
    database_url: Option<String>,
    users: Option<Arc<dyn UserStore>>,
    keys: Option<Arc<dyn KeySource>>,
    probe_keys: bool,
}

impl StateBuilder {
    pub fn new(security: SecurityConfig) -> Self {
        Self {
            security,
            database_url: None,
            users: None,
            keys: None,
            probe_keys: true,
        }
    }

    /// Connect and migrate this database for the user store.
    pub fn with_database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    pub fn with_user_store(mut self, users: Arc<dyn UserStore>) -> Self {
        self.users = Some(users);
        self
    }

    pub fn with_key_source(mut self, keys: Arc<dyn KeySource>) -> Self {
        self.keys = Some(keys);
        self
    }

    /// Skip the startup key check. Only tests that exercise missing keys want this.
    pub fn without_key_probe(mut self) -> Self {
        self.probe_keys = false;
        self
    }

    /// Any failure here is fatal to startup, a missing or mismatched key pair included.
    pub async fn build(self) -> Result<AppState, AppError> {
        let keys = self
            .keys
            .ok_or_else(|| AppError::config("no key source configured"))?;

        let users: Arc<dyn UserStore> = match (self.users, self.database_url) {
            (Some(users), _) => users,
            (None, Some(url)) => Arc::new(SeaUserStore::new(bootstrap_db(&url).await?)),
            (None, None) => return Err(AppError::config("no user store configured")),
        };

        let state = AppState::new(users, keys, self.security);

        if self.probe_keys {
            state.tokens.probe().await.map_err(|e| {
                AppError::unavailable(
                    ErrorCode::KeyMaterialUnavailable,
                    format!("key material check failed: {e}"),
                )
            })?;
        }

        Ok(state)
    }
}
