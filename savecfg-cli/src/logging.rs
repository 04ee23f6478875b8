//! Logging initialization for the `savecfg` binary.
//!
//! Configures `tracing-subscriber` from the `-v` level and `--log-format`.
//! Logs go to stderr so that stdout carries only reports.

use anyhow::Result;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::cli::LogFormat;

/// Crates whose events are raised to the verbosity level.
const OWN_TARGETS: [&str; 4] = [
    "savecfg_core",
    "savecfg_api",
    "savecfg_queries",
    "savecfg_cli",
];

/// Level for a `-v` value.
///
/// | `-v`  | level   |
/// |-------|---------|
/// | 0     | `warn`  |
/// | 1-4   | `info`  |
/// | 5-8   | `debug` |
/// | 9+    | `trace` |
pub fn level_for_verbosity(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1..=4 => "info",
        5..=8 => "debug",
        _ => "trace",
    }
}

/// Filter directive for a `-v` value.
///
/// Dependencies stay at `warn`; only this workspace's crates follow the
/// verbosity level.
pub fn filter_directive(verbosity: u8) -> String {
    let level = level_for_verbosity(verbosity);
    std::iter::once("warn".to_owned())
        .chain(OWN_TARGETS.iter().map(|t| format!("{t}={level}")))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initialize the global tracing subscriber.
///
/// Must be called exactly once, before any tracing macros are used.
/// `RUST_LOG`, when set, replaces the verbosity-derived filter.
pub fn init_tracing(verbosity: u8, format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(verbosity)));

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .try_init()
                .map_err(|e| {
                    anyhow::anyhow!("failed to initialize JSON tracing subscriber: {}", e)
                })?;
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_writer(std::io::stderr),
                )
                .try_init()
                .map_err(|e| {
                    anyhow::anyhow!("failed to initialize pretty tracing subscriber: {}", e)
                })?;
        }
    }

    Ok(())
}
