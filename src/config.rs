use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::services::token::TTL_CEILING_HOURS;

/// Environment variable that overrides `security.token_secret`.
pub const TOKEN_SECRET_ENV: &str = "MARQUEE_TOKEN_SECRET";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub security: SecurityConfig,

    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// "pretty" or "json"
    pub log_format: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    /// Maximum database connections (default: 5)
    pub max_db_connections: u32,

    /// Minimum database connections (default: 1)
    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/marquee.db".to_string(),
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,

    pub port: u16,

    pub cors_allowed_origins: Vec<String>,

    /// Whether to set the Secure flag on session cookies.
    /// Default: true for production safety. Set to false for local development without HTTPS.
    pub secure_cookies: bool,

    /// Sessions expire after this many minutes without a request.
    pub session_inactivity_minutes: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            cors_allowed_origins: vec![
                "http://localhost:5000".to_string(),
                "http://127.0.0.1:5000".to_string(),
            ],
            secure_cookies: true,
            session_inactivity_minutes: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Argon2 memory cost in KiB (default: 8192 = 8MB)
    pub argon2_memory_cost_kib: u32,

    /// Argon2 time cost (iterations)
    pub argon2_time_cost: u32,

    /// Argon2 parallelism (default: 1)
    pub argon2_parallelism: u32,

    /// HMAC secret used to sign API tokens. Overridden by `MARQUEE_TOKEN_SECRET`.
    /// Never written back to disk.
    #[serde(skip_serializing)]
    pub token_secret: String,

    /// Lifetime applied when a token request omits `expiration_hours`.
    pub default_token_ttl_hours: f64,

    /// Upper bound accepted for `expiration_hours`.
    pub max_token_ttl_hours: f64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            argon2_memory_cost_kib: 8192,
            argon2_time_cost: 3,
            argon2_parallelism: 1,
            token_secret: String::new(),
            default_token_ttl_hours: 24.0,
            max_token_ttl_hours: 24.0 * 365.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            server: ServerConfig::default(),
            security: SecurityConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl Config {
    /// Loads the first config file found, then applies environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_file()?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn load_file() -> Result<Self> {
        for path in &Self::config_paths() {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(secret) = std::env::var(TOKEN_SECRET_ENV)
            && !secret.is_empty()
        {
            self.security.token_secret = secret;
        }
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("marquee").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".marquee").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            Self::default().save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.security.token_secret.trim().is_empty() {
            anyhow::bail!(
                "Token signing secret is not configured; set security.token_secret or {TOKEN_SECRET_ENV}"
            );
        }

        if self.server.port == 0 {
            anyhow::bail!("Server port must be > 0");
        }

        let security = &self.security;
        if !security.max_token_ttl_hours.is_finite() || security.max_token_ttl_hours <= 0.0 {
            anyhow::bail!("security.max_token_ttl_hours must be a positive number");
        }
        if security.max_token_ttl_hours > TTL_CEILING_HOURS {
            anyhow::bail!("security.max_token_ttl_hours must not exceed {TTL_CEILING_HOURS} hours");
        }

        if !security.default_token_ttl_hours.is_finite()
            || security.default_token_ttl_hours <= 0.0
            || security.default_token_ttl_hours > security.max_token_ttl_hours
        {
            anyhow::bail!(
                "security.default_token_ttl_hours must be positive and at most max_token_ttl_hours"
            );
        }

        if self.server.session_inactivity_minutes <= 0 {
            anyhow::bail!("server.session_inactivity_minutes must be > 0");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_secret() -> Config {
        let mut config = Config::default();
        config.security.token_secret = "test-secret".to_string();
        config
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.general.log_level, "info");
        assert!((config.security.default_token_ttl_hours - 24.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_config_serialization_skips_secret() {
        let config = with_secret();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[security]"));
        assert!(!toml_str.contains("test-secret"));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            log_level = "debug"

            [security]
            token_secret = "from-file"
            default_token_ttl_hours = 2.5
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.security.token_secret, "from-file");
        assert!((config.security.default_token_ttl_hours - 2.5).abs() < f64::EPSILON);
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_validate_requires_secret() {
        assert!(Config::default().validate().is_err());
        assert!(with_secret().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_ttl() {
        let mut config = with_secret();
        config.security.default_token_ttl_hours = 0.0;
        assert!(config.validate().is_err());

        let mut config = with_secret();
        config.security.default_token_ttl_hours = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = with_secret();
        config.security.default_token_ttl_hours = 10.0;
        config.security.max_token_ttl_hours = 5.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_caps_max_ttl() {
        let mut config = with_secret();
        config.security.max_token_ttl_hours = 1e12;
        assert!(config.validate().is_err());

        let mut config = with_secret();
        config.security.max_token_ttl_hours = TTL_CEILING_HOURS;
        assert!(config.validate().is_ok());
    }
}
