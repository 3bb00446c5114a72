//! Assembles the full forecast report from the individual generators.

use chrono::NaiveDate;
use tally_domain::{
    CompanySettings, ForecastReport, ProjectionRounding, RecurringTransaction, Timeframe,
    Transaction, DEFAULT_CURRENCY,
};

use crate::{
    category_forecast_service::CategoryForecastService,
    monthly_series_service::MonthlySeriesService, recurrence_service::RecurrenceService,
    CoreError,
};

/// Service-wide knobs that are not part of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastOptions {
    /// Currency used when the company settings carry none.
    pub default_currency: String,
    pub projection_rounding: ProjectionRounding,
}

impl Default for ForecastOptions {
    fn default() -> Self {
        Self {
            default_currency: DEFAULT_CURRENCY.into(),
            projection_rounding: ProjectionRounding::default(),
        }
    }
}

/// Everything one forecast is computed from.
#[derive(Debug, Clone, Copy)]
pub struct ForecastInput<'a> {
    pub transactions: &'a [Transaction],
    pub recurring: &'a [RecurringTransaction],
    pub settings: &'a CompanySettings,
    pub timeframe: Timeframe,
    pub today: NaiveDate,
}

pub struct ForecastService;

impl ForecastService {
    /// Builds the report. Failures of the monthly series or the recurring
    /// expansion abort the forecast; category forecasts are best effort.
    pub fn build(
        input: &ForecastInput<'_>,
        options: &ForecastOptions,
    ) -> Result<ForecastReport, CoreError> {
        let currency = input.settings.currency_or(&options.default_currency);

        let monthly_forecasts = MonthlySeriesService::generate(
            input.transactions,
            currency,
            options.projection_rounding,
        )?;

        let categories =
            CategoryForecastService::generate(input.transactions, input.timeframe, currency);
        if categories.skipped > 0 {
            tracing::warn!(
                skipped = categories.skipped,
                produced = categories.forecasts.len(),
                "some category forecasts could not be computed"
            );
        }

        let upcoming_expenses =
            RecurrenceService::upcoming(input.recurring, input.today, input.timeframe, currency)?;

        tracing::debug!(
            months = monthly_forecasts.len(),
            categories = categories.forecasts.len(),
            upcoming = upcoming_expenses.len(),
            "forecast assembled"
        );

        Ok(ForecastReport {
            monthly_forecasts,
            category_forecasts: categories.forecasts,
            upcoming_expenses,
        })
    }
}
