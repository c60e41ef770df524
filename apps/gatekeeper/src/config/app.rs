//! Process configuration, read once from the environment at startup.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::AppError;
use crate::state::security_config::SecurityConfig;

pub const DEFAULT_KEY_STORE_ENDPOINT: &str = "https://storage.googleapis.com";

/// Where key objects are fetched from.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyStoreConfig {
    /// `<root>/<bucket>/<object>` on local disk
    Filesystem { root: PathBuf },
    /// Object-store HTTP API
    Http {
        endpoint: String,
        access_token: Option<String>,
    },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub key_store: KeyStoreConfig,
    pub security: SecurityConfig,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source; `from_env` is the production entry.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(&lookup);

        let mut security = SecurityConfig::new(vars.must("DEFAULT_BUCKET")?);
        if let Some(object) = vars.get("SIGNING_KEY_OBJECT") {
            security.signing_key_object = object;
        }
        if let Some(object) = vars.get("VERIFYING_KEY_OBJECT") {
            security.verifying_key_object = object;
        }
        if let Some(issuer) = vars.get("TOKEN_ISSUER") {
            security.issuer = issuer;
        }
        if let Some(secs) = vars.parsed::<u64>("TOKEN_TTL_SECS")? {
            if secs == 0 {
                return Err(AppError::config("TOKEN_TTL_SECS must be greater than zero"));
            }
            security.token_ttl = Duration::from_secs(secs);
        }
        if let Some(role) = vars.parsed::<i32>("PRIVILEGED_ROLE")? {
            security.privileged_role = role;
        }
        if let Some(cost) = vars.parsed::<u32>("BCRYPT_COST")? {
            if !(4..=31).contains(&cost) {
                return Err(AppError::config(format!(
                    "BCRYPT_COST must be between 4 and 31, got {cost}"
                )));
            }
            security.bcrypt_cost = cost;
        }
        if let Some(ms) = vars.parsed::<u64>("KEY_FETCH_TIMEOUT_MS")? {
            security.key_fetch_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = vars.parsed::<u64>("HASH_TIMEOUT_MS")? {
            security.hash_timeout = Duration::from_millis(ms);
        }

        let key_store = match vars.get("KEY_STORE_ROOT") {
            Some(root) => KeyStoreConfig::Filesystem { root: root.into() },
            None => KeyStoreConfig::Http {
                endpoint: vars
                    .get("KEY_STORE_ENDPOINT")
                    .unwrap_or_else(|| DEFAULT_KEY_STORE_ENDPOINT.to_string()),
                access_token: vars.get("KEY_STORE_ACCESS_TOKEN"),
            },
        };

        let cors_origins = vars
            .get("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty() && *s != "null")
            .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
            .map(str::to_string)
            .collect();

        Ok(Self {
            host: vars.get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: vars.parsed::<u16>("PORT")?.unwrap_or(3000),
            database_url: vars.must("DATABASE_URL")?,
            key_store,
            security,
            cors_origins,
        })
    }
}

struct Vars<'a, F>(&'a F);

impl<F> Vars<'_, F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Unset and blank are the same thing.
    fn get(&self, name: &str) -> Option<String> {
        (self.0)(name).filter(|v| !v.trim().is_empty())
    }

    fn must(&self, name: &str) -> Result<String, AppError> {
        self.get(name).ok_or_else(|| {
            AppError::config(format!("Required environment variable '{name}' is not set"))
        })
    }

    fn parsed<T: FromStr>(&self, name: &str) -> Result<Option<T>, AppError> {
        self.get(name)
            .map(|raw| {
                raw.trim().parse::<T>().map_err(|_| {
                    AppError::config(format!("Environment variable '{name}' has invalid value '{raw}'"))
                })
            })
            .transpose()
    }
}
