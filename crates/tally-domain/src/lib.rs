//! tally-domain
//!
//! Input records and forecast rows exchanged with the forecasting engine.
//! No I/O, no HTTP, no storage. Only data types, tolerant decoding and
//! calendar helpers.

pub mod category;
pub mod common;
pub mod forecast;
mod lenient;
pub mod recurring;
pub mod settings;
pub mod transaction;

pub use category::*;
pub use common::*;
pub use forecast::*;
pub use recurring::*;
pub use settings::*;
pub use transaction::*;
