//! Tracing subscriber setup
//!
//! The library only emits `tracing` events. Binaries and test harnesses that
//! want to see them call [`init_logging`] once at start-up.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding the filter directives
pub const LOG_ENV: &str = "PROVMAP_LOG";

/// Install a global fmt subscriber
///
/// The filter comes from `PROVMAP_LOG`, falling back to `default_directive`
/// (e.g. `"provmap_mapper=debug"`). With `json`, lines are newline-delimited
/// JSON.
///
/// # Errors
/// Returns an error if a global subscriber is already installed.
pub fn try_init_logging(
    default_directive: &str,
    json: bool,
) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .try_init()
    }
}

/// [`try_init_logging`], ignoring an already installed subscriber
pub fn init_logging(default_directive: &str) {
    if try_init_logging(default_directive, false).is_err() {
        tracing::debug!("global subscriber already installed");
    }
}
