//! Application configuration loaded from environment variables.

use std::env;

/// HTTP header carrying the base64-encoded caller identity.
pub const IDENTITY_HEADER: &str = "x-rh-identity";

/// Path prefix every report route is mounted under.
pub const API_SCOPE: &str = "/api/xavier";

/// Development default values - NEVER use in production.
pub mod defaults {
    pub const DEV_HOST: &str = "127.0.0.1";
    pub const DEV_PORT: u16 = 8080;
    pub const DEV_ADMIN_USERS: &str = "admin1@redhat.com,admin2@redhat.com";
    pub const DEV_PAYLOAD_LINK_EXPIRY_SECS: u64 = 300;

    // S3/MinIO defaults for development
    pub const DEV_S3_ENDPOINT: &str = "http://localhost:9100";
    pub const DEV_S3_BUCKET: &str = "payloads";
    pub const DEV_S3_REGION: &str = "us-east-1";
    pub const DEV_S3_ACCESS_KEY: &str = "minioadmin";
    pub const DEV_S3_SECRET_KEY: &str = "minioadmin";
}

/// Runtime environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Parse environment from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }

    /// Check if this is a development environment.
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    /// Check if this is a production environment.
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// S3 storage configuration for uploaded payloads.
#[derive(Debug, Clone)]
pub struct S3Config {
    /// S3 endpoint URL (for MinIO or custom S3-compatible services)
    pub endpoint: Option<String>,
    /// S3 bucket name
    pub bucket: String,
    /// S3 region
    pub region: String,
    /// S3 access key ID
    pub access_key: String,
    /// S3 secret access key
    pub secret_key: String,
}

/// Usernames allowed to call the administration routes.
#[derive(Debug, Clone, Default)]
pub struct AdminUsers(Vec<String>);

impl AdminUsers {
    /// Parse a comma separated list, ignoring blanks.
    pub fn parse(list: &str) -> Self {
        Self(
            list.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn contains(&self, username: &str) -> bool {
        self.0.iter().any(|u| u == username)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Runtime environment
    pub environment: Environment,
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Callers allowed on /administration routes
    pub admin_users: AdminUsers,
    /// Validity of generated payload download links
    pub payload_link_expiry_secs: u64,
    /// S3 storage configuration
    pub s3: S3Config,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In development mode (RUST_ENV=development) every variable has a default.
    /// In production mode the S3 credentials must be set explicitly and at
    /// least one admin user must be configured.
    ///
    /// Environment variables:
    /// - `RUST_ENV`: Environment (development/production) - REQUIRED
    /// - `XAV_HOST`: Server host (default: 127.0.0.1)
    /// - `XAV_PORT`: Server port (default: 8080)
    /// - `XAV_ADMIN_USERS`: Comma separated admin usernames
    /// - `XAV_PAYLOAD_LINK_EXPIRY_SECS`: Download link validity (default: 300)
    /// - `S3_ENDPOINT`, `S3_BUCKET`, `S3_REGION`, `S3_ACCESS_KEY`, `S3_SECRET_KEY`
    pub fn from_env() -> Result<Self, ConfigError> {
        let env_str = env::var("RUST_ENV").map_err(|_| ConfigError::MissingEnvVar("RUST_ENV"))?;

        let environment = Environment::parse(&env_str).ok_or(ConfigError::InvalidValue(
            "RUST_ENV must be 'development' or 'production'",
        ))?;

        let host = env::var("XAV_HOST").unwrap_or_else(|_| defaults::DEV_HOST.to_string());

        let port = env::var("XAV_PORT")
            .unwrap_or_else(|_| defaults::DEV_PORT.to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidValue("XAV_PORT must be a valid port number"))?;

        let admin_users = if environment.is_development() {
            AdminUsers::parse(
                &env::var("XAV_ADMIN_USERS")
                    .unwrap_or_else(|_| defaults::DEV_ADMIN_USERS.to_string()),
            )
        } else {
            AdminUsers::parse(&env::var("XAV_ADMIN_USERS").unwrap_or_default())
        };

        let payload_link_expiry_secs = env::var("XAV_PAYLOAD_LINK_EXPIRY_SECS")
            .unwrap_or_else(|_| defaults::DEV_PAYLOAD_LINK_EXPIRY_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| {
                ConfigError::InvalidValue("XAV_PAYLOAD_LINK_EXPIRY_SECS must be a valid number")
            })?;

        let s3 = S3Config {
            endpoint: env::var("S3_ENDPOINT").ok().or_else(|| {
                if environment.is_development() {
                    Some(defaults::DEV_S3_ENDPOINT.to_string())
                } else {
                    None
                }
            }),
            bucket: env::var("S3_BUCKET").unwrap_or_else(|_| defaults::DEV_S3_BUCKET.to_string()),
            region: env::var("S3_REGION").unwrap_or_else(|_| defaults::DEV_S3_REGION.to_string()),
            access_key: env::var("S3_ACCESS_KEY")
                .unwrap_or_else(|_| defaults::DEV_S3_ACCESS_KEY.to_string()),
            secret_key: env::var("S3_SECRET_KEY")
                .unwrap_or_else(|_| defaults::DEV_S3_SECRET_KEY.to_string()),
        };

        let config = Config {
            environment,
            host,
            port,
            admin_users,
            payload_link_expiry_secs,
            s3,
        };

        if environment.is_production() {
            config.validate_production()?;
        }

        Ok(config)
    }

    /// Validate that production configuration does not use development defaults.
    fn validate_production(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.s3.access_key == defaults::DEV_S3_ACCESS_KEY
            || self.s3.secret_key == defaults::DEV_S3_SECRET_KEY
        {
            errors.push(
                "S3_ACCESS_KEY/S3_SECRET_KEY are using development defaults. Set production S3 credentials."
                    .to_string(),
            );
        }

        if self.admin_users.is_empty() {
            errors.push(
                "XAV_ADMIN_USERS is empty. Configure at least one administrator.".to_string(),
            );
        }

        if self.payload_link_expiry_secs == 0 {
            errors.push("XAV_PAYLOAD_LINK_EXPIRY_SECS must be greater than zero.".to_string());
        }

        if !errors.is_empty() {
            return Err(ConfigError::ProductionValidation(errors));
        }

        Ok(())
    }

    /// Get the server bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if running in development mode.
    pub fn is_development(&self) -> bool {
        self.environment.is_development()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(&'static str),

    #[error("Production configuration validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    ProductionValidation(Vec<String>),
}
