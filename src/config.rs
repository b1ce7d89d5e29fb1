use std::sync::Arc;

use thiserror::Error;

use crate::database::{DocumentStore, MongoDB};
use crate::utils::AppError;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_DATABASE_NAME: &str = "agency_leads";
const DEFAULT_JWT_ISSUER: &str = "agency-leads-api";
const DEFAULT_JWT_EXPIRATION_HOURS: i64 = 24;
/// One year.
const MAX_JWT_EXPIRATION_HOURS: i64 = 8760;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} must be {expected}, got {value:?}")]
    Invalid {
        key: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone, Default)]
pub struct DatabaseSettings {
    pub url: Option<String>,
    pub name: Option<String>,
}

impl DatabaseSettings {
    /// `DATABASE_NAME`, else the database in the URI path, else the default.
    pub fn resolved_name(&self) -> String {
        self.name
            .clone()
            .or_else(|| self.url.as_deref().and_then(MongoDB::database_name_from_uri))
            .unwrap_or_else(|| DEFAULT_DATABASE_NAME.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub issuer: String,
    pub expiration_hours: i64,
}

/// How session tokens are issued and resolved.
#[derive(Debug, Clone)]
pub enum TokenMode {
    /// The token is the hex identifier of the authenticated record.
    RecordId,
    /// HS256 JWT whose `sub` is the record identifier.
    Signed(JwtSettings),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: DatabaseSettings,
    pub token_mode: TokenMode,
    /// Empty means any origin.
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = match get("PORT") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                key: "PORT",
                expected: "a port number",
                value,
            })?,
            None => DEFAULT_PORT,
        };

        let token_mode = match get("JWT_SECRET") {
            Some(secret) => {
                let expiration_hours = match get("JWT_EXPIRATION_HOURS") {
                    Some(value) => match value.parse::<i64>() {
                        Ok(hours) if (1..=MAX_JWT_EXPIRATION_HOURS).contains(&hours) => hours,
                        _ => {
                            return Err(ConfigError::Invalid {
                                key: "JWT_EXPIRATION_HOURS",
                                expected: "a number of hours between 1 and 8760",
                                value,
                            })
                        }
                    },
                    None => DEFAULT_JWT_EXPIRATION_HOURS,
                };
                TokenMode::Signed(JwtSettings {
                    secret,
                    issuer: get("JWT_ISSUER").unwrap_or_else(|| DEFAULT_JWT_ISSUER.to_string()),
                    expiration_hours,
                })
            }
            None => TokenMode::RecordId,
        };

        let cors_allowed_origins = get("CORS_ALLOWED_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty() && *o != "*")
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            database: DatabaseSettings {
                url: get("DATABASE_URL"),
                name: get("DATABASE_NAME"),
            },
            token_mode,
            cors_allowed_origins,
        })
    }
}

/// Shared handler state, injected through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    store: Option<Arc<dyn DocumentStore>>,
    pub token_mode: TokenMode,
    pub database: DatabaseSettings,
}

impl AppState {
    pub fn new(
        store: Option<Arc<dyn DocumentStore>>,
        token_mode: TokenMode,
        database: DatabaseSettings,
    ) -> Self {
        Self {
            store,
            token_mode,
            database,
        }
    }

    /// The configured store, or `ServiceUnavailable` when the service runs without one.
    pub fn store(&self) -> Result<&dyn DocumentStore, AppError> {
        self.store.as_deref().ok_or(AppError::ServiceUnavailable)
    }
}
