use config::{Config, ConfigError, File};
use serde::Deserialize;
use std::path::Path;

/// Shortest secret accepted for HMAC token signing
pub const MIN_SECRET_LEN: usize = 32;

/// Longest accepted token lifetime (365 days)
pub const MAX_TOKEN_DURATION_SECONDS: i64 = 365 * 24 * 60 * 60;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub payment: PaymentConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub access_token_secret: String,
    pub refresh_token_secret: String,
    #[serde(default = "default_access_token_duration")]
    pub access_token_duration_seconds: i64,
    #[serde(default = "default_refresh_token_duration")]
    pub refresh_token_duration_seconds: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct PaymentConfig {
    #[serde(default)]
    pub midtrans_server_key: String,
    #[serde(default)]
    pub is_production: bool,
    #[serde(default)]
    pub gopay_callback_url: Option<String>,
}

fn default_database_url() -> String {
    "sqlite://orderin.db?mode=rwc".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_access_token_duration() -> i64 {
    900 // 15 minutes
}

fn default_refresh_token_duration() -> i64 {
    86_400 // 1 day
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl AuthConfig {
    /// Reject secrets and lifetimes the token layer cannot work safely with
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, secret) in [
            ("auth.access_token_secret", &self.access_token_secret),
            ("auth.refresh_token_secret", &self.refresh_token_secret),
        ] {
            if secret.len() < MIN_SECRET_LEN {
                return Err(ConfigError::Message(format!(
                    "{name} must be at least {MIN_SECRET_LEN} characters"
                )));
            }
        }

        if self.access_token_secret == self.refresh_token_secret {
            return Err(ConfigError::Message(
                "access and refresh token secrets must differ".to_string(),
            ));
        }

        if self.access_token_duration_seconds <= 0 || self.refresh_token_duration_seconds <= 0 {
            return Err(ConfigError::Message("token durations must be positive".to_string()));
        }

        if self.access_token_duration_seconds > MAX_TOKEN_DURATION_SECONDS
            || self.refresh_token_duration_seconds > MAX_TOKEN_DURATION_SECONDS
        {
            return Err(ConfigError::Message(format!(
                "token durations must not exceed {MAX_TOKEN_DURATION_SECONDS} seconds"
            )));
        }

        if self.access_token_duration_seconds >= self.refresh_token_duration_seconds {
            return Err(ConfigError::Message(
                "access token duration must be shorter than refresh token duration".to_string(),
            ));
        }

        Ok(())
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()?;

        let app_config: Self = config.try_deserialize()?;
        app_config.validate()?;
        Ok(app_config)
    }

    /// Load configuration from orderin.toml in the current directory
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_file("orderin.toml")
    }

    /// Load configuration with environment variable overrides
    /// Environment variables are prefixed with ORDERIN_ and use `__` between sections
    /// Example: ORDERIN_DATABASE__URL, ORDERIN_AUTH__ACCESS_TOKEN_SECRET
    ///
    /// Returns the config and a list of environment variable overrides
    pub fn load_with_env() -> Result<(Self, Vec<String>), ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name("orderin").required(false))
            .add_source(
                config::Environment::with_prefix("ORDERIN")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        // Detect which values were overridden by environment
        let mut overrides = Vec::new();

        let env_vars = [
            ("ORDERIN_DATABASE__URL", "database.url"),
            ("ORDERIN_DATABASE__MAX_CONNECTIONS", "database.max_connections"),
            ("ORDERIN_AUTH__ACCESS_TOKEN_SECRET", "auth.access_token_secret"),
            ("ORDERIN_AUTH__REFRESH_TOKEN_SECRET", "auth.refresh_token_secret"),
            ("ORDERIN_AUTH__ACCESS_TOKEN_DURATION_SECONDS", "auth.access_token_duration_seconds"),
            ("ORDERIN_AUTH__REFRESH_TOKEN_DURATION_SECONDS", "auth.refresh_token_duration_seconds"),
            ("ORDERIN_SERVER__HOST", "server.host"),
            ("ORDERIN_SERVER__PORT", "server.port"),
            ("ORDERIN_PAYMENT__MIDTRANS_SERVER_KEY", "payment.midtrans_server_key"),
            ("ORDERIN_PAYMENT__IS_PRODUCTION", "payment.is_production"),
            ("ORDERIN_PAYMENT__GOPAY_CALLBACK_URL", "payment.gopay_callback_url"),
        ];

        for (env_var, config_key) in env_vars {
            if std::env::var(env_var).is_ok() {
                overrides.push(config_key.to_string());
            }
        }

        let app_config: Self = config.try_deserialize()?;
        app_config.validate()?;
        Ok((app_config, overrides))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.auth.validate()
    }
}
