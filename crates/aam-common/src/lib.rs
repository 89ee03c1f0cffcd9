//! Shared utilities for the AAM gateway binaries.

pub mod logging;

/// Service name used in the server's startup and shutdown log lines.
pub const SERVICE_NAME: &str = "AAM";
