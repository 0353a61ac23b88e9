//! Tracing subscriber setup for binaries and tests embedding the board.
//!
//! The library itself only emits `tracing` events; installing a subscriber is
//! left to the application. These helpers install an `EnvFilter` driven
//! formatter, honouring `RUST_LOG` when set.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber with an `info` default level.
pub fn init_logging() {
    init_logging_with("info");
}

/// Install the global subscriber, falling back to `default_directive` when
/// `RUST_LOG` is unset or invalid.
///
/// Calling this more than once is harmless; later calls leave the existing
/// subscriber in place.
pub fn init_logging_with(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    if tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_err()
    {
        tracing::debug!("global tracing subscriber already installed");
    }
}
