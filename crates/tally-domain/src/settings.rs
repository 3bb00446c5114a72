//! Company settings consulted by the forecasting engine.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::lenient;

pub const DEFAULT_CURRENCY: &str = "USD";
pub const DEFAULT_FISCAL_YEAR_START: &str = "01";

/// Subset of the company settings record used for forecasting.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompanySettings {
    #[serde(
        default,
        alias = "userId",
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub user_id: Option<String>,
    #[serde(
        default,
        alias = "defaultCurrency",
        deserialize_with = "lenient::string",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_currency: Option<String>,
    /// Month number `01`..`12`.
    #[serde(
        default,
        alias = "fiscalYearStart",
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub fiscal_year_start: Option<String>,
}

impl CompanySettings {
    pub fn new(currency: impl Into<String>, fiscal_year_start: impl Into<String>) -> Self {
        Self {
            user_id: None,
            default_currency: Some(currency.into()),
            fiscal_year_start: Some(fiscal_year_start.into()),
        }
    }

    /// Currency tag for output rows, or `fallback` when unset.
    pub fn currency_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.default_currency.as_deref().unwrap_or(fallback)
    }

    /// Fiscal year start month; malformed values fall back to January.
    pub fn fiscal_start_month(&self) -> u32 {
        self.fiscal_year_start
            .as_deref()
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .filter(|month| (1..=12).contains(month))
            .unwrap_or(1)
    }

    /// First day of the fiscal year containing `today`.
    pub fn fiscal_year_start_on(&self, today: NaiveDate) -> NaiveDate {
        let month = self.fiscal_start_month();
        let year = if today.month() >= month {
            today.year()
        } else {
            today.year() - 1
        };
        NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(today)
    }

    /// Earliest date of history loaded when the caller supplies no
    /// transactions: the start of the previous fiscal year.
    pub fn history_window_start(&self, today: NaiveDate) -> NaiveDate {
        let current = self.fiscal_year_start_on(today);
        NaiveDate::from_ymd_opt(current.year() - 1, current.month(), 1).unwrap_or(current)
    }
}
