//! Shared enums, rounding policies and calendar helpers for forecasting.

use std::{fmt, str::FromStr};

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

pub use crate::lenient::parse_date;

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Forecast horizon requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "3months")]
    ThreeMonths,
    #[serde(rename = "6months")]
    SixMonths,
    #[serde(rename = "12months")]
    TwelveMonths,
}

impl Timeframe {
    /// Number of calendar months the horizon extends past today.
    pub fn months(self) -> u32 {
        match self {
            Timeframe::ThreeMonths => 3,
            Timeframe::SixMonths => 6,
            Timeframe::TwelveMonths => 12,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Timeframe::ThreeMonths => "3months",
            Timeframe::SixMonths => "6months",
            Timeframe::TwelveMonths => "12months",
        }
    }

    /// Last day covered by the horizon. Clamped to the end of the target
    /// month when `today` falls on a day the target month lacks.
    pub fn horizon_end(self, today: NaiveDate) -> Option<NaiveDate> {
        today.checked_add_months(Months::new(self.months()))
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a timeframe token is not one of the supported horizons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTimeframeError(pub String);

impl fmt::Display for ParseTimeframeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unsupported timeframe `{}` (expected 3months, 6months or 12months)",
            self.0
        )
    }
}

impl std::error::Error for ParseTimeframeError {}

impl FromStr for Timeframe {
    type Err = ParseTimeframeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "3months" => Ok(Timeframe::ThreeMonths),
            "6months" => Ok(Timeframe::SixMonths),
            "12months" => Ok(Timeframe::TwelveMonths),
            other => Err(ParseTimeframeError(other.to_string())),
        }
    }
}

/// Calendar month used as the grouping key of the monthly series.
///
/// Ordering is chronological, matching the lexicographic order of the
/// `YYYY-MM` rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The following calendar month, wrapping December into January.
    pub fn next(self) -> Self {
        if self.month >= 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Display label such as `Jan 2024`.
    pub fn label(self) -> String {
        let index = (self.month.clamp(1, 12) - 1) as usize;
        format!("{} {}", MONTH_ABBREVIATIONS[index], self.year)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Number of calendar month boundaries between `from` and `to`, ignoring days.
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i32 {
    (to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32
}

/// Rounds to two decimal places.
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Rounding applied to projected monthly values.
///
/// Historical rows are always rounded to cents. `WholeUnits` keeps projected
/// rows on integer amounts, which is what existing dashboards expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionRounding {
    #[default]
    WholeUnits,
    Cents,
}

impl ProjectionRounding {
    pub fn apply(self, value: f64) -> f64 {
        match self {
            ProjectionRounding::WholeUnits => value.round(),
            ProjectionRounding::Cents => round_to_cents(value),
        }
    }
}
