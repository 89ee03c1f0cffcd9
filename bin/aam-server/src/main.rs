//! AAM Server
//!
//! Authentication gateway for Gaucho Racing:
//! - OAuth code exchange and refresh proxied to Sentinel
//! - User lookup proxied to Sentinel
//! - AWS console federation via `AssumeRoleWithWebIdentity`
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `AAM_CONFIG` | - | Path to TOML config file |
//! | `AAM_HTTP_HOST` | `0.0.0.0` | Bind address |
//! | `AAM_HTTP_PORT` | `7000` | HTTP API port |
//! | `AAM_CORS_ORIGINS` | `*` | Comma-separated allowed origins |
//! | `AAM_SENTINEL_URL` | - | Sentinel base URL |
//! | `AAM_SENTINEL_CLIENT_ID` | - | OAuth client id |
//! | `AAM_SENTINEL_CLIENT_SECRET` | - | OAuth client secret |
//! | `AAM_SENTINEL_TOKEN` | - | Service token for user lookups |
//! | `AAM_SENTINEL_REDIRECT_URI` | - | OAuth redirect URI |
//! | `AAM_ADMIN_ROLE_ARN` | - | Role for inner-circle members |
//! | `AAM_MEMBER_ROLE_ARN` | - | Role for everyone else |
//! | `AAM_FEDERATION_ISSUER` | `GauchoRacing` | Console sign-in issuer |
//! | `AAM_AWS_REGION` | `us-west-2` | STS region |
//! | `AAM_SESSION_DURATION_SECS` | `3600` | Assumed role session length |
//! | `AAM_FEDERATION_URL` | `https://signin.aws.amazon.com/federation` | Federation endpoint |
//! | `AAM_CONSOLE_DESTINATION` | `https://us-west-2.console.aws.amazon.com` | Console landing page |
//! | `AAM_FEDERATION_TIMEOUT_SECS` | `30` | Sign-in token request timeout |
//! | `AAM_STS_ENDPOINT` | - | STS endpoint override |
//! | `RUST_LOG` | `info` | Log level |
//! | `LOG_FORMAT` | `text` | `json` for structured logs |

use std::sync::Arc;

use anyhow::{bail, Result};
use tokio::{net::TcpListener, signal};
use tracing::{error, info};

use aam_config::AppConfig;
use aam_platform::{app_router, AppState, AwsFederationClient, IdentityProvider, RolePolicy, SentinelClient};

#[tokio::main]
async fn main() -> Result<()> {
    aam_common::logging::init_logging("aam-server");

    info!("Starting {} Server", aam_common::SERVICE_NAME);

    let config = AppConfig::load()?;
    config.validate()?;

    let sentinel = SentinelClient::new(config.sentinel.clone());
    if !sentinel.ping().await {
        error!(url = %config.sentinel.url, "Sentinel ping failed");
        bail!("Can't reach Sentinel API!");
    }
    info!(url = %config.sentinel.url, "Sentinel API is reachable");

    let federation = AwsFederationClient::from_config(&config.iam).await;
    let policy = RolePolicy::from_config(&config.iam);

    let state = AppState::new(
        Arc::new(sentinel),
        Arc::new(federation),
        policy,
        env!("CARGO_PKG_VERSION"),
    );
    let app = app_router(state, &config.http.cors_origins);

    let addr = format!("{}:{}", config.http.host, config.http.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("API server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("{} Server shutdown complete", aam_common::SERVICE_NAME);
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received...");
}
