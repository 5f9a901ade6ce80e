//! Tracing initialization.
//!
//! Usage:
//! ```no_run
//! pippin::logging::init();
//! tracing::info!("pippin starting");
//! ```

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the global tracing subscriber.
///
/// Reads `RUST_LOG` for filter directives, falling back to `pippin=info`.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pippin=info"));

    fmt().with_env_filter(filter).init();
}
