//! Configuration loader with file and environment variable support

use crate::{AppConfig, ConfigError};
use std::env;
use std::path::PathBuf;
use tracing::info;

/// Standard config file search paths
const CONFIG_PATHS: &[&str] = &[
    "config.toml",
    "aam.toml",
    "./config/config.toml",
    "/etc/aam/config.toml",
];

/// Configuration loader
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self { config_path: None }
    }

    /// Create a loader with a specific config file path
    pub fn with_path<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            config_path: Some(path.into()),
        }
    }

    /// Load configuration from file (if found) with environment variable overrides
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        let mut config = AppConfig::default();

        if let Some(path) = self.find_config_file() {
            info!(?path, "Loading configuration from file");
            config = AppConfig::from_file(&path)?;
        }

        apply_overrides(&mut config, |key| env::var(key).ok());

        Ok(config)
    }

    fn find_config_file(&self) -> Option<PathBuf> {
        if let Some(path) = &self.config_path {
            if path.exists() {
                return Some(path.clone());
            }
        }

        if let Ok(path) = env::var("AAM_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        CONFIG_PATHS
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }
}

/// Apply `AAM_*` overrides using `lookup` to read variables.
pub(crate) fn apply_overrides<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    // HTTP
    if let Some(port) = lookup("AAM_HTTP_PORT").and_then(|v| v.parse().ok()) {
        config.http.port = port;
    }
    if let Some(val) = lookup("AAM_HTTP_HOST") {
        config.http.host = val;
    }
    if let Some(val) = lookup("AAM_CORS_ORIGINS") {
        config.http.cors_origins = val.split(',').map(|s| s.trim().to_string()).collect();
    }

    // Sentinel
    if let Some(val) = lookup("AAM_SENTINEL_URL") {
        config.sentinel.url = val.trim_end_matches('/').to_string();
    }
    if let Some(val) = lookup("AAM_SENTINEL_CLIENT_ID") {
        config.sentinel.client_id = val;
    }
    if let Some(val) = lookup("AAM_SENTINEL_CLIENT_SECRET") {
        config.sentinel.client_secret = val;
    }
    if let Some(val) = lookup("AAM_SENTINEL_TOKEN") {
        config.sentinel.token = val;
    }
    if let Some(val) = lookup("AAM_SENTINEL_REDIRECT_URI") {
        config.sentinel.redirect_uri = val;
    }

    // IAM
    if let Some(val) = lookup("AAM_ADMIN_ROLE_ARN") {
        config.iam.admin_role_arn = val;
    }
    if let Some(val) = lookup("AAM_MEMBER_ROLE_ARN") {
        config.iam.member_role_arn = val;
    }
    if let Some(val) = lookup("AAM_FEDERATION_ISSUER") {
        config.iam.issuer = val;
    }
    if let Some(val) = lookup("AAM_AWS_REGION") {
        config.iam.region = val;
    }
    if let Some(secs) = lookup("AAM_SESSION_DURATION_SECS").and_then(|v| v.parse().ok()) {
        config.iam.session_duration_secs = secs;
    }
    if let Some(val) = lookup("AAM_FEDERATION_URL") {
        config.iam.federation_url = val;
    }
    if let Some(val) = lookup("AAM_CONSOLE_DESTINATION") {
        config.iam.console_destination = val;
    }
    if let Some(secs) = lookup("AAM_FEDERATION_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
        config.iam.federation_timeout_secs = secs;
    }
    if let Some(val) = lookup("AAM_STS_ENDPOINT") {
        config.iam.sts_endpoint = Some(val).filter(|v| !v.is_empty());
    }
}
