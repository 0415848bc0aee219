//! Observability for the certification pipeline
//!
//! Events are emitted through `tracing`; the library never installs a
//! subscriber. Binaries call `init_logging` once at startup.
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on certification results
//! 3. Logs go to stderr; stdout belongs to command output

mod events;

pub use events::Event;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Installs a stderr `fmt` subscriber filtered by `RUST_LOG`.
///
/// Defaults to `warn` when `RUST_LOG` is unset. Calling this more than once
/// is a no-op.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .try_init();
}
