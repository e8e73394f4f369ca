//! Logging utilities for the Planicare crates.
//!
//! All crates log through `tracing`; the embedding binary calls one of the
//! init functions exactly once at startup.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber with the default log level (INFO).
pub fn init() {
    init_with_level(Level::INFO);
}

/// Initialize the tracing subscriber with a specific log level.
///
/// Environment directives (`RUST_LOG`) still apply on top of the given
/// level. Uses `try_init` so calling twice (e.g. from tests) is harmless.
pub fn init_with_level(level: Level) {
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("planicare={}", level).parse().unwrap());

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_file(true).with_line_number(true))
        .with(filter)
        .try_init();
}
