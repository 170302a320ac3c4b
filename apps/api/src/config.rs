//! Server configuration.
//!
//! Layered with the `config` crate, later sources win:
//!
//! ```text
//! built-in defaults ──► motomarket.toml (optional) ──► MOTO_* env vars
//! ```
//!
//! The file path can be moved with `MOTO_CONFIG`. List values in the
//! environment are comma separated, e.g. `MOTO_ADMIN_EMAILS=a@x.co,b@y.co`.

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use axum::http::{header, HeaderValue, Method};
use config::{Config, Environment, File, FileFormat, Map};
use moto_core::AdminPolicy;
use moto_db::DbConfig;
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Secret used when none is configured. Rejected in production.
pub const DEV_JWT_SECRET: &str = "motomarket-dev-secret-change-me";

const MIN_SECRET_LEN: usize = 16;

/// Deployment mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    Development,
    Production,
}

/// API server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Deployment mode (`MOTO_ENV`)
    pub env: RunMode,

    /// Interface to bind
    pub bind_address: String,

    /// HTTP port
    pub port: u16,

    /// SQLite database file
    pub database_path: String,

    /// Pool size
    pub max_connections: u32,

    /// How long a writer waits for the SQLite lock, in milliseconds
    pub db_busy_timeout_ms: u64,

    /// HS256 signing secret
    pub jwt_secret: String,

    /// Token lifetime in seconds
    pub jwt_lifetime_secs: i64,

    /// Emails promoted to admin on login
    pub admin_emails: Vec<String>,

    /// Origins allowed to call the API from a browser
    pub cors_origins: Vec<String>,
}

impl ApiConfig {
    /// Load configuration from the file named by `MOTO_CONFIG` (default
    /// `motomarket.toml`) and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("MOTO_CONFIG").unwrap_or_else(|_| "motomarket.toml".to_string());
        Self::from_sources(Some(Path::new(&path)), None)
    }

    /// Load from an optional file and an explicit environment map.
    ///
    /// `env = None` reads the process environment.
    pub fn from_sources(
        file: Option<&Path>,
        env: Option<Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("env", "development")?
            .set_default("bind_address", "0.0.0.0")?
            .set_default("port", 8080_i64)?
            .set_default("database_path", "./motomarket.db")?
            .set_default("max_connections", 8_i64)?
            .set_default("db_busy_timeout_ms", 5_000_i64)?
            .set_default("jwt_secret", DEV_JWT_SECRET)?
            .set_default("jwt_lifetime_secs", 86_400_i64)?
            .set_default("admin_emails", Vec::<String>::new())?
            .set_default("cors_origins", vec!["http://localhost:5173".to_string()])?;

        if let Some(path) = file {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
        }

        let config: ApiConfig = builder
            .add_source(
                Environment::with_prefix("MOTO")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("admin_emails")
                    .with_list_parse_key("cors_origins")
                    .source(env),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidValue("port".to_string()));
        }
        if self.max_connections == 0 {
            return Err(ConfigError::InvalidValue("max_connections".to_string()));
        }
        if self.db_busy_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue("db_busy_timeout_ms".to_string()));
        }
        if self.jwt_lifetime_secs <= 0 {
            return Err(ConfigError::InvalidValue("jwt_lifetime_secs".to_string()));
        }
        if self.jwt_secret.is_empty() {
            return Err(ConfigError::MissingRequired("jwt_secret".to_string()));
        }
        if self.env == RunMode::Production
            && (self.jwt_secret.len() < MIN_SECRET_LEN || self.jwt_secret == DEV_JWT_SECRET)
        {
            return Err(ConfigError::WeakSecret(MIN_SECRET_LEN));
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_address, self.port)
            .parse()
            .map_err(|_| ConfigError::InvalidValue("bind_address".to_string()))
    }

    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database_path)
            .max_connections(self.max_connections)
            .busy_timeout(Duration::from_millis(self.db_busy_timeout_ms))
    }

    pub fn admin_policy(&self) -> AdminPolicy {
        AdminPolicy::new(&self.admin_emails)
    }

    /// CORS layer admitting only the configured origins.
    pub fn cors_layer(&self) -> Result<CorsLayer, ConfigError> {
        let origins = self
            .cors_origins
            .iter()
            .map(|o| {
                HeaderValue::from_str(o.trim())
                    .map_err(|_| ConfigError::InvalidValue(format!("cors_origins: {o}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]))
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("jwt_secret must be set to at least {0} bytes in production")]
    WeakSecret(usize),

    #[error("Failed to read configuration: {0}")]
    Load(#[from] config::ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> Option<Map<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_defaults() {
        let config = ApiConfig::from_sources(None, env(&[])).unwrap();
        assert_eq!(config.env, RunMode::Development);
        assert_eq!(config.port, 8080);
        assert_eq!(config.jwt_secret, DEV_JWT_SECRET);
        assert!(config.admin_emails.is_empty());
        assert_eq!(config.socket_addr().unwrap().port(), 8080);
    }

    #[test]
    fn test_env_overrides_and_lists() {
        let config = ApiConfig::from_sources(
            None,
            env(&[
                ("MOTO_PORT", "9090"),
                ("MOTO_DATABASE_PATH", "/tmp/moto.db"),
                ("MOTO_ADMIN_EMAILS", "Admin@Moto.co, b@y.co"),
            ]),
        )
        .unwrap();

        assert_eq!(config.port, 9090);
        assert_eq!(config.database_path, "/tmp/moto.db");

        let db = config.db_config();
        assert_eq!(db.max_connections, 8);
        assert_eq!(db.busy_timeout, Duration::from_secs(5));
        assert_eq!(config.admin_emails.len(), 2);

        let policy = config.admin_policy();
        assert!(policy.is_admin_email("admin@moto.co"));
        assert!(policy.is_admin_email("b@y.co"));
    }

    #[test]
    fn test_toml_file_layer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("motomarket.toml");
        std::fs::write(&path, "port = 7000\njwt_lifetime_secs = 600\n").unwrap();

        let config = ApiConfig::from_sources(Some(&path), env(&[("MOTO_PORT", "7001")])).unwrap();
        assert_eq!(config.jwt_lifetime_secs, 600);
        // Environment wins over the file.
        assert_eq!(config.port, 7001);
    }

    #[test]
    fn test_missing_file_is_fine() {
        let config =
            ApiConfig::from_sources(Some(Path::new("/nonexistent/motomarket.toml")), env(&[]))
                .unwrap();
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_production_requires_real_secret() {
        let err = ApiConfig::from_sources(None, env(&[("MOTO_ENV", "production")])).unwrap_err();
        assert!(matches!(err, ConfigError::WeakSecret(_)));

        let err = ApiConfig::from_sources(
            None,
            env(&[("MOTO_ENV", "production"), ("MOTO_JWT_SECRET", "short")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::WeakSecret(_)));

        let config = ApiConfig::from_sources(
            None,
            env(&[
                ("MOTO_ENV", "production"),
                ("MOTO_JWT_SECRET", "a-long-enough-production-secret"),
            ]),
        )
        .unwrap();
        assert_eq!(config.env, RunMode::Production);
    }

    #[test]
    fn test_busy_timeout_reaches_db_config() {
        let config =
            ApiConfig::from_sources(None, env(&[("MOTO_DB_BUSY_TIMEOUT_MS", "250")])).unwrap();
        assert_eq!(
            config.db_config().busy_timeout,
            Duration::from_millis(250)
        );

        let err =
            ApiConfig::from_sources(None, env(&[("MOTO_DB_BUSY_TIMEOUT_MS", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref k) if k == "db_busy_timeout_ms"));
    }

    #[test]
    fn test_zero_port_rejected() {
        let err = ApiConfig::from_sources(None, env(&[("MOTO_PORT", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref k) if k == "port"));
    }

    #[test]
    fn test_cors_layer_rejects_bad_origin() {
        let mut config = ApiConfig::from_sources(None, env(&[])).unwrap();
        assert!(config.cors_layer().is_ok());

        config.cors_origins = vec!["http://bad\norigin".to_string()];
        assert!(config.cors_layer().is_err());
    }
}
