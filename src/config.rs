//! Application configuration.
//!
//! Loaded from a TOML file, by default `~/.config/freight-quote/config.toml`.
//! A missing file yields the defaults; every section and key is optional.
//!
//! ```toml
//! [server]
//! api_host = "0.0.0.0"
//! api_port = 8080
//!
//! [database]
//! url = "sqlite://./freight_quote.db?mode=rwc"
//!
//! [security]
//! jwt_secret = "a long random string"
//!
//! [freight]
//! volumetric_factor = "167"
//!
//! [entry_points]
//! extra_countries = ["Curacao"]
//!
//! [entry_points.air]
//! Colombia = "BOG"
//!
//! [entry_points.aliases]
//! CO = "Colombia"
//! ```

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::location::EntryPointTable;
use crate::infrastructure::crypto::jwt::{JwtConfig, DEFAULT_JWT_SECRET};
use crate::infrastructure::crypto::password::MIN_PASSWORD_LEN;
use crate::infrastructure::DatabaseConfig;

pub const DEFAULT_ADMIN_PASSWORD: &str = "admin12345";
const MIN_JWT_SECRET_LEN: usize = 32;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid TOML in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// `~/.config/freight-quote/config.toml`, or `./config.toml` when the
/// platform has no config directory.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .map(|dir| dir.join("freight-quote").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("config.toml"))
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSettings,
    pub security: SecurityConfig,
    pub admin: AdminConfig,
    pub logging: LoggingConfig,
    pub freight: FreightConfig,
    pub entry_points: EntryPointTable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub api_host: String,
    pub api_port: u16,
    /// Seconds to wait for in-flight requests on shutdown
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_host: "0.0.0.0".to_string(),
            api_port: 8080,
            shutdown_timeout: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        let db = DatabaseConfig::default();
        Self {
            url: db.url,
            max_connections: db.max_connections,
        }
    }
}

impl DatabaseSettings {
    pub fn to_database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.url.clone(),
            max_connections: self.max_connections,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            jwt_expiration_hours: 24,
        }
    }
}

impl SecurityConfig {
    pub fn to_jwt_config(&self) -> JwtConfig {
        JwtConfig {
            secret: self.jwt_secret.clone(),
            expiration_hours: self.jwt_expiration_hours,
            ..JwtConfig::default()
        }
    }
}

/// Bootstrap account created when the user table is empty
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            email: "admin@example.com".to_string(),
            password: DEFAULT_ADMIN_PASSWORD.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive; `RUST_LOG` takes precedence
    pub level: String,
    /// `text` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FreightConfig {
    /// kg per m³ used to compare weight and volume
    pub volumetric_factor: Decimal,
    /// Label shown next to amounts; rates and charges are always USD
    pub currency: String,
}

impl Default for FreightConfig {
    fn default() -> Self {
        Self {
            volumetric_factor: Decimal::from(167),
            currency: "USD".to_string(),
        }
    }
}

/// Outcome of [`AppConfig::validate`]
#[derive(Debug, Default)]
pub struct ConfigReport {
    /// The service cannot run with these
    pub errors: Vec<String>,
    /// Unsafe for a deployment but usable locally
    pub warnings: Vec<String>,
}

impl ConfigReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    pub fn validate(&self) -> ConfigReport {
        let mut report = ConfigReport::default();
        let errors = &mut report.errors;

        if self.server.api_port == 0 {
            errors.push("server.api_port must be between 1 and 65535".into());
        }
        if self.database.url.trim().is_empty() {
            errors.push("database.url must not be empty".into());
        }
        if self.database.max_connections == 0 {
            errors.push("database.max_connections must be at least 1".into());
        }
        if self.security.jwt_secret.is_empty() {
            errors.push("security.jwt_secret must not be empty".into());
        }
        if self.security.jwt_expiration_hours <= 0 {
            errors.push("security.jwt_expiration_hours must be positive".into());
        }
        if self.admin.username.trim().is_empty() {
            errors.push("admin.username must not be empty".into());
        }
        if self.freight.volumetric_factor <= Decimal::ZERO {
            errors.push("freight.volumetric_factor must be greater than 0".into());
        }
        if !matches!(self.logging.format.to_lowercase().as_str(), "text" | "json") {
            errors.push(format!(
                "logging.format must be 'text' or 'json', got '{}'",
                self.logging.format
            ));
        }
        if tracing_subscriber::EnvFilter::try_new(&self.logging.level).is_err() {
            errors.push(format!("logging.level '{}' is not a valid filter", self.logging.level));
        }
        for (section, table) in [("air", &self.entry_points.air), ("sea", &self.entry_points.sea)] {
            for (country, code) in table {
                if code.trim().is_empty() {
                    errors.push(format!("entry_points.{}.{} has an empty code", section, country));
                }
            }
        }

        let warnings = &mut report.warnings;
        if self.security.jwt_secret == DEFAULT_JWT_SECRET {
            warnings.push("security.jwt_secret is the built-in default".into());
        } else if self.security.jwt_secret.len() < MIN_JWT_SECRET_LEN {
            warnings.push(format!(
                "security.jwt_secret is shorter than {} characters",
                MIN_JWT_SECRET_LEN
            ));
        }
        if self.admin.password == DEFAULT_ADMIN_PASSWORD {
            warnings.push("admin.password is the built-in default".into());
        } else if self.admin.password.len() < MIN_PASSWORD_LEN {
            warnings.push(format!(
                "admin.password is shorter than {} characters",
                MIN_PASSWORD_LEN
            ));
        }
        if self.database.url.contains(":memory:") {
            warnings.push("database.url points at an in-memory database; data is lost on restart".into());
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid_but_not_deployable() {
        let report = AppConfig::default().validate();
        assert!(report.is_ok(), "{:?}", report.errors);
        assert_eq!(report.warnings.len(), 2);
    }

    #[test]
    fn parses_partial_file() {
        let cfg = AppConfig::from_toml(
            r#"
            [server]
            api_port = 9090

            [freight]
            volumetric_factor = "1000"

            [entry_points]
            extra_countries = ["Curacao"]

            [entry_points.sea]
            Colombia = "CTG"

            [entry_points.aliases]
            CO = "Colombia"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.server.api_port, 9090);
        assert_eq!(cfg.server.api_host, "0.0.0.0");
        assert_eq!(cfg.freight.volumetric_factor, Decimal::from(1000));
        assert_eq!(cfg.entry_points.sea.get("Colombia").map(String::as_str), Some("CTG"));
        assert!(cfg.entry_points.is_known_country("Curacao"));
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn rejects_non_positive_factor_and_unknown_format() {
        let mut cfg = AppConfig::default();
        cfg.freight.volumetric_factor = Decimal::ZERO;
        cfg.logging.format = "xml".into();
        let report = cfg.validate();
        assert_eq!(report.errors.len(), 2);
    }

    #[test]
    fn strong_secrets_clear_warnings() {
        let mut cfg = AppConfig::default();
        cfg.security.jwt_secret = "x".repeat(48);
        cfg.admin.password = "correct horse battery".into();
        assert!(cfg.validate().warnings.is_empty());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let cfg = AppConfig::load(Path::new("/nonexistent/freight-quote/config.toml")).unwrap();
        assert_eq!(cfg.server.api_port, 8080);
    }
}
