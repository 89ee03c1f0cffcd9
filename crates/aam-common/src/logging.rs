//! Structured Logging
//!
//! One subscriber per process, configured from the environment:
//!
//! - `LOG_FORMAT=json` emits one flattened JSON object per event (production)
//! - anything else emits compact text, coloured when stdout is a terminal
//! - `RUST_LOG` filters as usual (default `info`), e.g.
//!   `RUST_LOG=aam_platform=debug,tower_http=info`
//!
//! # Fields
//!
//! Gateway events carry structured fields rather than interpolated text, so
//! JSON output can be filtered directly:
//!
//! | Field | Emitted by |
//! |-------|------------|
//! | `operation` | Sentinel calls (`exchange_code_for_token`, `current_identity`, ...) |
//! | `status` | upstream non-200 replies, 5xx gateway responses |
//! | `user_id`, `role`, `role_arn` | IAM login role selection |
//! | `assumed_role_arn`, `session_name`, `expiration` | successful STS exchange |
//! | `code` | STS error code on a failed `AssumeRoleWithWebIdentity` |
//!
//! ```rust,ignore
//! aam_common::logging::init_logging("aam-server");
//! tracing::info!(user_id = %identity.id, role = "member", "Selected federation role");
//! ```

use std::io::IsTerminal;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset or unparsable.
const DEFAULT_FILTER: &str = "info";

/// Output format selected by `LOG_FORMAT`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Text,
}

impl LogFormat {
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }

    pub fn from_env() -> Self {
        Self::parse(&std::env::var("LOG_FORMAT").unwrap_or_default())
    }
}

/// Install the global subscriber for `service_name`.
///
/// Must be called once, before any other tracing call.
pub fn init_logging(service_name: &str) {
    let format = LogFormat::from_env();
    let registry = tracing_subscriber::registry().with(build_filter());

    match format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .init(),
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .compact()
                    .with_target(true)
                    .with_ansi(std::io::stdout().is_terminal()),
            )
            .init(),
    }

    tracing::info!(service = service_name, ?format, "Logging initialized");
}

fn build_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}
