//! Configuration loading and resolution.
//!
//! Only ambient settings are resolved here. The endpoint, connection name
//! and output path are fixed by `ExportConfig::default()`.

use std::time::Duration;

use metadata_pack::{ExportConfig, DEFAULT_TIMEOUT_SECS};

/// Environment variable consulted when `--timeout-secs` is absent.
pub const TIMEOUT_ENV: &str = "METADATA_PACK_TIMEOUT_SECS";

/// Resolve the request timeout: flag, then environment, then default.
pub fn resolve_timeout(explicit: Option<u64>) -> Duration {
    resolve_timeout_from(explicit, std::env::var(TIMEOUT_ENV).ok().as_deref())
}

/// Timeout resolution over an already-read environment value.
pub fn resolve_timeout_from(explicit: Option<u64>, env_value: Option<&str>) -> Duration {
    match explicit {
        Some(secs) if secs > 0 => return Duration::from_secs(secs),
        Some(_) => tracing::warn!("Ignoring a zero request timeout"),
        None => {}
    }

    if let Some(raw) = env_value {
        match parse_timeout(raw) {
            Some(timeout) => return timeout,
            None => tracing::warn!("Ignoring invalid {TIMEOUT_ENV}={raw:?}"),
        }
    }

    Duration::from_secs(DEFAULT_TIMEOUT_SECS)
}

/// Parse a positive whole number of seconds.
pub fn parse_timeout(raw: &str) -> Option<Duration> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
        _ => None,
    }
}

/// The production export setup with the resolved timeout applied.
pub fn build_export_config(timeout: Duration) -> ExportConfig {
    ExportConfig {
        timeout,
        ..ExportConfig::default()
    }
}
