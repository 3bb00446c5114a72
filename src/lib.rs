#![doc(test(attr(deny(warnings))))]

//! Tally serves cash-flow forecasts for small businesses: monthly
//! income/expense projections, per-category spend trends and upcoming
//! recurring expenses, exposed over HTTP.

pub mod errors;
pub mod server;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing with `default_filter` unless `RUST_LOG` is set.
pub fn init(default_filter: &str) {
    INIT_TRACING.call_once(|| {
        utils::init_tracing(default_filter);
        tracing::info!(
            version = utils::build_info::current().version,
            "tally tracing initialized"
        );
    });
}
