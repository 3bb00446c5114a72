//! Per-category spend projections.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tally_domain::{
    round_to_cents, Category, CategoryForecast, Timeframe, Transaction, TransactionKind,
    TrendDirection,
};

use crate::CoreError;

/// Expense transactions grouped under one normalized category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBucket {
    pub category: Category,
    pub entries: Vec<(NaiveDate, f64)>,
    pub total: f64,
}

impl CategoryBucket {
    /// Empty bucket for a category seen for the first time.
    pub fn new(category: Category) -> Self {
        Self {
            category,
            entries: Vec::new(),
            total: 0.0,
        }
    }

    fn push(&mut self, date: NaiveDate, amount: f64) {
        self.entries.push((date, amount));
        self.total += amount;
    }
}

/// Best-effort result: categories that could not be computed are counted
/// in `skipped` instead of failing the request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryForecastOutcome {
    pub forecasts: Vec<CategoryForecast>,
    pub skipped: usize,
}

pub struct CategoryForecastService;

impl CategoryForecastService {
    /// Groups usable expense transactions by normalized category id. The
    /// first occurrence of an id decides its display name and color.
    pub fn group_expenses(transactions: &[Transaction]) -> BTreeMap<String, CategoryBucket> {
        let mut buckets: BTreeMap<String, CategoryBucket> = BTreeMap::new();
        for txn in transactions
            .iter()
            .filter(|txn| txn.kind == TransactionKind::Expense)
        {
            let Some((date, amount)) = txn.dated_amount() else {
                continue;
            };
            let category = txn.category.normalize();
            buckets
                .entry(category.id.clone())
                .or_insert_with(|| CategoryBucket::new(category))
                .push(date, amount);
        }
        buckets
    }

    /// Projection for a single category.
    pub fn forecast_bucket(
        bucket: &CategoryBucket,
        currency: &str,
    ) -> Result<CategoryForecast, CoreError> {
        let count = bucket.entries.len();
        if count == 0 {
            return Err(CoreError::Forecast(format!(
                "category {} has no transactions",
                bucket.category.id
            )));
        }
        let average = bucket.total / count as f64;

        let mut ordered = bucket.entries.clone();
        ordered.sort_by_key(|(date, _)| *date);
        let amounts: Vec<f64> = ordered.into_iter().map(|(_, amount)| amount).collect();
        let trend = trend_percent(&amounts);
        let forecast = average * (1.0 + trend / 100.0);

        if !average.is_finite() || !forecast.is_finite() {
            return Err(CoreError::Forecast(format!(
                "category {} produced non-finite values",
                bucket.category.id
            )));
        }

        Ok(CategoryForecast {
            category: bucket.category.clone(),
            current: round_to_cents(average),
            forecast: round_to_cents(forecast),
            trend: TrendDirection::classify(trend),
            change: trend.round() as i64,
            confidence: confidence_for(count),
            currency: currency.to_string(),
        })
    }

    /// Forecasts every expense category, ordered by current average spend
    /// (largest first) and then by name. `timeframe` does not influence the
    /// projection.
    pub fn generate(
        transactions: &[Transaction],
        timeframe: Timeframe,
        currency: &str,
    ) -> CategoryForecastOutcome {
        let buckets = Self::group_expenses(transactions);
        let mut outcome = CategoryForecastOutcome::default();
        for bucket in buckets.values() {
            match Self::forecast_bucket(bucket, currency) {
                Ok(forecast) => outcome.forecasts.push(forecast),
                Err(err) => {
                    tracing::debug!(
                        category = %bucket.category.id,
                        timeframe = %timeframe,
                        error = %err,
                        "skipping category forecast"
                    );
                    outcome.skipped += 1;
                }
            }
        }
        outcome.forecasts.sort_by(|a, b| {
            b.current
                .total_cmp(&a.current)
                .then_with(|| a.category.name.cmp(&b.category.name))
        });
        outcome
    }
}

/// Percentage change between the mean of the earlier half and the mean of
/// the later half of chronologically ordered amounts. The earlier half is
/// the shorter one when the count is odd.
pub fn trend_percent(amounts: &[f64]) -> f64 {
    let (first, second) = amounts.split_at(amounts.len() / 2);
    let first_mean = mean(first);
    if first_mean == 0.0 {
        return 0.0;
    }
    (mean(second) - first_mean) / first_mean * 100.0
}

/// Heuristic reliability from sample size alone.
pub fn confidence_for(samples: usize) -> f64 {
    match samples {
        0..=2 => 0.3,
        3..=5 => 0.5,
        6..=11 => 0.7,
        12..=23 => 0.8,
        _ => 0.9,
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
