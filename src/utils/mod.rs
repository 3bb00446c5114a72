pub mod build_info;

use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

static TRACING_INIT: Once = Once::new();

/// Installs the global `fmt` subscriber. `RUST_LOG` takes precedence over
/// `default_filter`; an unparseable directive falls back to `info`.
pub fn init_tracing(default_filter: &str) {
    TRACING_INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(default_filter))
            .unwrap_or_else(|_| EnvFilter::new("info"));

        if let Err(err) = fmt().with_env_filter(filter).try_init() {
            // keeps logging through the subscriber that is already installed
            tracing::debug!(error = %err, "tracing subscriber already set");
        }
    });
}
