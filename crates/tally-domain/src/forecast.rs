//! Rows produced by the forecasting engine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{category::Category, CategoryLabel, Frequency};

/// Trend percentage beyond which a category is considered moving.
pub const TREND_THRESHOLD_PERCENT: f64 = 5.0;

/// One month of the income/expense series, historical or projected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyForecast {
    /// Label such as `Jan 2024`.
    pub month: String,
    pub income: f64,
    pub expenses: f64,
    pub savings: f64,
    pub prediction: bool,
    pub currency: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

impl TrendDirection {
    /// Strictly above +5% is up, strictly below -5% is down.
    pub fn classify(trend_percent: f64) -> Self {
        if trend_percent > TREND_THRESHOLD_PERCENT {
            TrendDirection::Up
        } else if trend_percent < -TREND_THRESHOLD_PERCENT {
            TrendDirection::Down
        } else {
            TrendDirection::Stable
        }
    }
}

/// Spend projection for one expense category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryForecast {
    pub category: Category,
    /// Average transaction amount.
    pub current: f64,
    pub forecast: f64,
    pub trend: TrendDirection,
    /// Trend percentage rounded to a whole number.
    pub change: i64,
    pub confidence: f64,
    pub currency: String,
}

/// A concrete dated occurrence of a recurring definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpcomingExpense {
    /// `<recurring id>-<YYYY-MM-DD>`.
    pub id: String,
    pub description: String,
    pub amount: f64,
    pub date: NaiveDate,
    pub category: CategoryLabel,
    pub frequency: Frequency,
    pub currency: String,
}

/// The three collections returned for a forecast request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastReport {
    pub monthly_forecasts: Vec<MonthlyForecast>,
    pub category_forecasts: Vec<CategoryForecast>,
    pub upcoming_expenses: Vec<UpcomingExpense>,
}

impl ForecastReport {
    /// Whether at least one historical month was available to project from.
    pub fn has_history(&self) -> bool {
        self.monthly_forecasts.iter().any(|row| !row.prediction)
    }
}
