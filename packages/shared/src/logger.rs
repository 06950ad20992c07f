//! Logging setup utilities for Parlor binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// The default directive enables `default_log_level` for the library crate
/// `crate_name` and for the binary `binary_name`. The `RUST_LOG` environment
/// variable overrides both.
///
/// # Arguments
///
/// * `crate_name` - The library crate to enable (e.g., "parlor-server")
/// * `binary_name` - The name of the binary (e.g., "parlor-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use parlor_shared::logger::setup_logger;
///
/// setup_logger("parlor-server", "parlor-server", "debug");
/// ```
pub fn setup_logger(crate_name: &str, binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directive(crate_name, binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build the filter directive used when `RUST_LOG` is not set.
///
/// Target names use underscores, so hyphens in package names are replaced.
/// `tower_http` is included so request traces appear at the same level.
pub fn default_directive(crate_name: &str, binary_name: &str, default_log_level: &str) -> String {
    let crate_target = crate_name.replace('-', "_");
    let binary_target = binary_name.replace('-', "_");

    if crate_target == binary_target {
        format!("{crate_target}={default_log_level},tower_http={default_log_level}")
    } else {
        format!(
            "{crate_target}={default_log_level},{binary_target}={default_log_level},tower_http={default_log_level}"
        )
    }
}
