//! tally-core
//!
//! Forecast engine services for Tally.
//! Depends on tally-domain. No HTTP, no terminal I/O, no direct storage interactions.

pub mod category_forecast_service;
pub mod error;
pub mod forecast_service;
pub mod monthly_series_service;
pub mod recurrence_service;
pub mod source;
pub mod time;

pub use category_forecast_service::*;
pub use error::CoreError;
pub use forecast_service::*;
pub use monthly_series_service::*;
pub use recurrence_service::*;
pub use source::*;
pub use time::*;

#[cfg(test)]
mod tests;
