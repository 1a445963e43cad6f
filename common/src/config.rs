// common/src/config.rs
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use config::{Config as ConfigFile, File, Environment};

/// Signing secret shipped for local development only.
pub const INSECURE_DEFAULT_SECRET: &str = "dev_secret_key_change_in_production";

/// Central configuration for the gateway
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub salt_api: SaltApiConfig,
    pub auth: AuthConfig,
    pub cors: CorsConfig,
    pub rate_limit: RateLimitConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub workers: Option<usize>,
    /// Take the client address from `Forwarded`/`X-Forwarded-For`.
    /// Only enable behind a reverse proxy that overwrites those headers.
    pub trust_forwarded_headers: bool,
}

/// Connection settings for the upstream salt-api
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SaltApiConfig {
    pub url: String,
    pub user: String,
    pub password: String,
    pub eauth: String,
    pub timeout_secs: u64,
    /// Serve canned sample data when salt-api is unreachable.
    /// Development only, never enable in production.
    pub demo_mode: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub secret_key: String,
    pub algorithm: String,
    pub access_token_expire_minutes: i64,
    pub bcrypt_cost: u32,
    /// Password of the administrator seeded at start-up
    pub admin_password: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub allow_credentials: bool,
    pub allow_methods: Vec<String>,
    pub allow_headers: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub login_max_attempts: usize,
    pub window_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".to_string(),
            workers: None,
            trust_forwarded_headers: false,
        }
    }
}

impl Default for SaltApiConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8000".to_string(),
            user: "saltapi".to_string(),
            password: "saltapi".to_string(),
            eauth: "pam".to_string(),
            timeout_secs: 30,
            demo_mode: false,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret_key: INSECURE_DEFAULT_SECRET.to_string(),
            algorithm: "HS256".to_string(),
            access_token_expire_minutes: 30,
            bcrypt_cost: 10,
            admin_password: "admin123".to_string(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origins: vec!["*".to_string()],
            allow_credentials: true,
            allow_methods: vec!["*".to_string()],
            allow_headers: vec!["*".to_string()],
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            login_max_attempts: 10,
            window_secs: 60,
        }
    }
}

impl AuthConfig {
    pub fn uses_insecure_secret(&self) -> bool {
        self.secret_key == INSECURE_DEFAULT_SECRET
    }
}

impl Config {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self, config::ConfigError> {
        // Get the run mode, defaulting to "development"
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config_dir = env::var("CONFIG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                // Check if we're in the project root or a subcrate
                let mut path = PathBuf::from("./config");
                if !path.exists() {
                    path = PathBuf::from("../config");
                }
                path
            });

        tracing::info!("Loading configuration from {}", config_dir.display());
        tracing::info!("Using run mode: {}", run_mode);

        let config = ConfigFile::builder()
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            .add_source(File::from(config_dir.join(format!("{}.toml", run_mode))).required(false))
            .add_source(File::from(config_dir.join("local.toml")).required(false))
            // APP__SALT_API__URL, APP__AUTH__SECRET_KEY, ...
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.allow_origins")
                    .with_list_parse_key("cors.allow_methods")
                    .with_list_parse_key("cors.allow_headers")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Load from files and `APP__` variables, falling back to plain
    /// environment variables when that fails
    pub fn from_env() -> Self {
        let config = match Self::load() {
            Ok(config) => {
                tracing::info!("Configuration loaded from files and environment");
                config
            },
            Err(e) => {
                tracing::warn!("Failed to load configuration from files: {}", e);
                tracing::info!("Falling back to environment variables only");
                Self::from_plain_env()
            }
        };

        if config.auth.uses_insecure_secret() {
            tracing::warn!("auth.secret_key is the insecure development default; override it before deploying");
        }
        if config.salt_api.demo_mode {
            tracing::warn!("salt_api.demo_mode is ON: upstream failures will be answered with sample data");
        }

        config
    }

    fn from_plain_env() -> Self {
        let defaults = Self::default();

        let server = ServerConfig {
            bind_addr: env_or("BIND_ADDR", defaults.server.bind_addr),
            workers: env::var("WORKERS").ok().and_then(|v| v.parse().ok()),
            trust_forwarded_headers: env::var("TRUST_FORWARDED_HEADERS")
                .map(|v| v.to_lowercase() == "true")
                .unwrap_or(false),
        };

        let salt_api = SaltApiConfig {
            url: env_or("SALT_API_URL", defaults.salt_api.url),
            user: env_or("SALT_API_USER", defaults.salt_api.user),
            password: env_or("SALT_API_PASSWORD", defaults.salt_api.password),
            eauth: env_or("SALT_API_EAUTH", defaults.salt_api.eauth),
            timeout_secs: env_parse("SALT_API_TIMEOUT", defaults.salt_api.timeout_secs),
            demo_mode: env::var("SALT_DEMO_MODE")
                .map(|v| v.to_lowercase() == "true")
                .unwrap_or(false),
        };

        let auth = AuthConfig {
            secret_key: env_or("SECRET_KEY", defaults.auth.secret_key),
            algorithm: env_or("ALGORITHM", defaults.auth.algorithm),
            access_token_expire_minutes: env_parse(
                "ACCESS_TOKEN_EXPIRE_MINUTES",
                defaults.auth.access_token_expire_minutes,
            ),
            bcrypt_cost: env_parse("BCRYPT_COST", defaults.auth.bcrypt_cost),
            admin_password: env_or("ADMIN_PASSWORD", defaults.auth.admin_password),
        };

        let cors = CorsConfig {
            allow_origins: env::var("CORS_ORIGINS")
                .map(|v| split_list(&v))
                .unwrap_or(defaults.cors.allow_origins),
            ..defaults.cors
        };

        Self {
            server,
            salt_api,
            auth,
            cors,
            rate_limit: defaults.rate_limit,
        }
    }
}

fn env_or(key: &str, default: String) -> String {
    env::var(key).unwrap_or(default)
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.salt_api.timeout_secs, 30);
        assert_eq!(config.auth.access_token_expire_minutes, 30);
        assert_eq!(config.auth.algorithm, "HS256");
        assert!(!config.salt_api.demo_mode);
        assert!(!config.server.trust_forwarded_headers);
        assert!(config.auth.uses_insecure_secret());
        assert_eq!(config.cors.allow_origins, vec!["*".to_string()]);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = ConfigFile::builder()
            .add_source(config::File::from_str(
                "[salt_api]\nurl = \"https://salt.internal:8000\"\ndemo_mode = true\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.salt_api.url, "https://salt.internal:8000");
        assert!(config.salt_api.demo_mode);
        assert_eq!(config.salt_api.user, "saltapi");
        assert_eq!(config.auth.bcrypt_cost, 10);
    }

    #[test]
    fn test_split_list() {
        assert_eq!(
            split_list("http://localhost:3000, http://localhost:3001,,"),
            vec!["http://localhost:3000".to_string(), "http://localhost:3001".to_string()]
        );
    }
}
