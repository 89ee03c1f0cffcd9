//! AAM Configuration System
//!
//! TOML-based configuration with environment variable overrides. The result is
//! an immutable [`AppConfig`] built once at process start and handed to each
//! client component.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

mod loader;

pub use loader::ConfigLoader;

/// STS accepts session durations between 15 minutes and 12 hours.
pub const MIN_SESSION_DURATION_SECS: i32 = 900;
pub const MAX_SESSION_DURATION_SECS: i32 = 43_200;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Root application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub sentinel: SentinelConfig,
    pub iam: IamConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 7000,
            cors_origins: vec!["*".to_string()],
        }
    }
}

/// Upstream identity provider (Sentinel) settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SentinelConfig {
    /// Base URL, without trailing slash
    pub url: String,
    pub client_id: String,
    pub client_secret: String,
    /// Static service token used for user listing and lookup
    pub token: String,
    pub redirect_uri: String,
}

/// AWS role federation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IamConfig {
    /// Role assumed by inner-circle members
    pub admin_role_arn: String,
    /// Role assumed by everyone else
    pub member_role_arn: String,
    /// Issuer shown on the AWS console sign-in page
    pub issuer: String,
    pub region: String,
    pub session_duration_secs: i32,
    pub federation_url: String,
    pub console_destination: String,
    /// Upper bound for the sign-in token request
    pub federation_timeout_secs: u64,
    /// Optional STS endpoint override (localstack, tests)
    pub sts_endpoint: Option<String>,
}

impl Default for IamConfig {
    fn default() -> Self {
        Self {
            admin_role_arn: String::new(),
            member_role_arn: String::new(),
            issuer: "GauchoRacing".to_string(),
            region: "us-west-2".to_string(),
            session_duration_secs: 3600,
            federation_url: "https://signin.aws.amazon.com/federation".to_string(),
            console_destination: "https://us-west-2.console.aws.amazon.com".to_string(),
            federation_timeout_secs: 30,
            sts_endpoint: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration with environment variable override
    pub fn load() -> Result<Self, ConfigError> {
        ConfigLoader::new().load()
    }

    /// Check the settings the gateway cannot run without.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sentinel.url.trim().is_empty() {
            return Err(ConfigError::ValidationError("sentinel.url is required".to_string()));
        }
        if self.sentinel.client_id.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "sentinel.client_id is required".to_string(),
            ));
        }
        if self.sentinel.token.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "sentinel.token is required for user lookups".to_string(),
            ));
        }
        if self.iam.admin_role_arn.trim().is_empty() || self.iam.member_role_arn.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "iam.admin_role_arn and iam.member_role_arn are required".to_string(),
            ));
        }
        if !(MIN_SESSION_DURATION_SECS..=MAX_SESSION_DURATION_SECS)
            .contains(&self.iam.session_duration_secs)
        {
            return Err(ConfigError::ValidationError(format!(
                "iam.session_duration_secs must be between {} and {}",
                MIN_SESSION_DURATION_SECS, MAX_SESSION_DURATION_SECS
            )));
        }
        Ok(())
    }

    /// Generate an example TOML configuration
    pub fn example_toml() -> String {
        r#"# AAM Configuration
# Environment variables (AAM_*) override these settings

[http]
host = "0.0.0.0"
port = 7000
cors_origins = ["*"]

[sentinel]
url = "https://sentinel-api.gauchoracing.com"
client_id = ""
client_secret = ""
token = ""
redirect_uri = "https://aam.gauchoracing.com/auth/login"

[iam]
admin_role_arn = "arn:aws:iam::123456789012:role/SentinelAdmin"
member_role_arn = "arn:aws:iam::123456789012:role/SentinelMember"
issuer = "GauchoRacing"
region = "us-west-2"
session_duration_secs = 3600
federation_url = "https://signin.aws.amazon.com/federation"
console_destination = "https://us-west-2.console.aws.amazon.com"
federation_timeout_secs = 30
"#
        .to_string()
    }
}
