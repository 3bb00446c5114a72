//! Month-by-month income/expense history with a short trend projection.

use std::collections::BTreeMap;

use tally_domain::{
    round_to_cents, MonthKey, MonthlyForecast, ProjectionRounding, Transaction, TransactionKind,
};

use crate::CoreError;

/// Number of trailing months used to estimate the trend.
pub const TREND_WINDOW_MONTHS: usize = 6;
/// Bound on the average month-over-month change, in either direction.
pub const MAX_MONTHLY_CHANGE: f64 = 0.30;
/// Number of projected rows appended after the last historical month.
pub const PROJECTED_MONTHS: usize = 3;

/// Per-month accumulator. The default entry is an empty month.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MonthTotals {
    pub income: f64,
    pub expenses: f64,
}

impl MonthTotals {
    fn record(mut self, kind: TransactionKind, amount: f64) -> Self {
        match kind {
            TransactionKind::Income => self.income += amount,
            TransactionKind::Expense => self.expenses += amount,
            TransactionKind::Transfer | TransactionKind::Other => {}
        }
        self
    }

    fn is_finite(&self) -> bool {
        self.income.is_finite() && self.expenses.is_finite()
    }
}

/// Average relative month-over-month change, clamped to
/// `[-MAX_MONTHLY_CHANGE, MAX_MONTHLY_CHANGE]`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrendRates {
    pub income: f64,
    pub expenses: f64,
}

pub struct MonthlySeriesService;

impl MonthlySeriesService {
    /// Groups transactions with a usable date and amount by calendar month.
    /// Every such record opens its month, but only income and expenses add
    /// to the totals, so a month of transfers alone is an empty month.
    pub fn aggregate(transactions: &[Transaction]) -> BTreeMap<MonthKey, MonthTotals> {
        transactions
            .iter()
            .filter_map(|txn| {
                txn.dated_amount()
                    .map(|(date, amount)| (MonthKey::of(date), txn.kind, amount))
            })
            .fold(BTreeMap::new(), |mut months, (key, kind, amount)| {
                let entry = months.entry(key).or_default();
                *entry = entry.record(kind, amount);
                months
            })
    }

    /// Trend over the trailing window of a chronologically ordered history.
    pub fn trend_rates(history: &[MonthTotals]) -> TrendRates {
        let window = &history[history.len().saturating_sub(TREND_WINDOW_MONTHS)..];
        let income = average_change(window.windows(2).map(|pair| {
            relative_change(pair[0].income, pair[1].income)
        }));
        let expenses = average_change(window.windows(2).map(|pair| {
            relative_change(pair[0].expenses, pair[1].expenses)
        }));
        TrendRates { income, expenses }
    }

    /// Historical rows followed by [`PROJECTED_MONTHS`] projected rows.
    /// Returns an empty series when no transaction is usable.
    pub fn generate(
        transactions: &[Transaction],
        currency: &str,
        rounding: ProjectionRounding,
    ) -> Result<Vec<MonthlyForecast>, CoreError> {
        let months = Self::aggregate(transactions);
        let Some((&last_key, &last_totals)) = months.iter().next_back() else {
            return Ok(Vec::new());
        };
        if let Some((key, _)) = months.iter().find(|(_, totals)| !totals.is_finite()) {
            return Err(CoreError::Forecast(format!(
                "totals for {key} are not finite"
            )));
        }

        let history: Vec<MonthTotals> = months.values().copied().collect();
        let rates = Self::trend_rates(&history);

        let mut rows = Vec::with_capacity(months.len() + PROJECTED_MONTHS);
        rows.extend(months.iter().map(|(key, totals)| MonthlyForecast {
            month: key.label(),
            income: round_to_cents(totals.income),
            expenses: round_to_cents(totals.expenses),
            savings: round_to_cents(totals.income - totals.expenses),
            prediction: false,
            currency: currency.to_string(),
        }));

        let mut key = last_key;
        let mut income = last_totals.income;
        let mut expenses = last_totals.expenses;
        for _ in 0..PROJECTED_MONTHS {
            key = key.next();
            income = rounding.apply(income * (1.0 + rates.income));
            expenses = rounding.apply(expenses * (1.0 + rates.expenses));
            rows.push(MonthlyForecast {
                month: key.label(),
                income,
                expenses,
                savings: rounding.apply(income - expenses),
                prediction: true,
                currency: currency.to_string(),
            });
        }

        Ok(rows)
    }
}

fn relative_change(previous: f64, current: f64) -> f64 {
    if previous == 0.0 {
        0.0
    } else {
        (current - previous) / previous
    }
}

fn average_change(changes: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = changes
        .filter(|change| change.is_finite())
        .fold((0.0, 0usize), |(sum, count), change| (sum + change, count + 1));
    if count == 0 {
        return 0.0;
    }
    (sum / count as f64).clamp(-MAX_MONTHLY_CHANGE, MAX_MONTHLY_CHANGE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn txn(date: &str, amount: f64, kind: TransactionKind) -> Transaction {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        Transaction::new(format!("{date}-{amount}"), date, amount, kind)
    }

    fn totals(income: f64, expenses: f64) -> MonthTotals {
        MonthTotals { income, expenses }
    }

    #[test]
    fn aggregate_skips_unusable_records_and_keeps_transfer_months() {
        let mut broken = txn("2024-01-10", 50.0, TransactionKind::Income);
        broken.amount = None;
        let mut undated = txn("2024-01-10", 70.0, TransactionKind::Expense);
        undated.date = None;
        let months = MonthlySeriesService::aggregate(&[
            txn("2024-01-05", 100.0, TransactionKind::Income),
            txn("2024-01-06", 30.0, TransactionKind::Expense),
            txn("2024-02-01", 500.0, TransactionKind::Transfer),
            broken,
            undated,
        ]);
        assert_eq!(months.len(), 2);
        let january = months[&MonthKey {
            year: 2024,
            month: 1,
        }];
        assert_eq!(january, totals(100.0, 30.0));
        let february = months[&MonthKey {
            year: 2024,
            month: 2,
        }];
        assert_eq!(february, MonthTotals::default());
    }

    #[test]
    fn transfer_only_month_joins_the_trend_window() {
        let rows = MonthlySeriesService::generate(
            &[
                txn("2024-01-10", 1000.0, TransactionKind::Income),
                txn("2024-02-10", 500.0, TransactionKind::Transfer),
                txn("2024-03-10", 1000.0, TransactionKind::Income),
            ],
            "USD",
            ProjectionRounding::WholeUnits,
        )
        .expect("series");
        let summary: Vec<(&str, f64, bool)> = rows
            .iter()
            .map(|row| (row.month.as_str(), row.income, row.prediction))
            .collect();
        // changes -1.0 and 0.0 (previous month empty) average to -0.5, clamped to -0.3
        assert_eq!(
            summary,
            vec![
                ("Jan 2024", 1000.0, false),
                ("Feb 2024", 0.0, false),
                ("Mar 2024", 1000.0, false),
                ("Apr 2024", 700.0, true),
                ("May 2024", 490.0, true),
                ("Jun 2024", 343.0, true),
            ]
        );
    }

    #[test]
    fn transfers_alone_still_produce_a_series() {
        let rows = MonthlySeriesService::generate(
            &[txn("2024-05-01", 80.0, TransactionKind::Transfer)],
            "USD",
            ProjectionRounding::WholeUnits,
        )
        .expect("series");
        assert_eq!(rows.len(), 1 + PROJECTED_MONTHS);
        assert!(rows.iter().all(|row| row.income == 0.0 && row.expenses == 0.0));
        assert_eq!(rows[0].month, "May 2024");
    }

    #[test]
    fn trend_uses_only_last_six_months() {
        let mut history = vec![totals(1.0, 1.0), totals(1000.0, 1000.0)];
        history.extend(std::iter::repeat(totals(100.0, 50.0)).take(6));
        let rates = MonthlySeriesService::trend_rates(&history);
        assert_eq!(rates, TrendRates::default());
    }

    #[test]
    fn zero_previous_month_counts_as_no_change() {
        let rates =
            MonthlySeriesService::trend_rates(&[totals(0.0, 100.0), totals(500.0, 110.0)]);
        assert_eq!(rates.income, 0.0);
        assert!((rates.expenses - 0.10).abs() < 1e-12);
    }

    #[test]
    fn rates_are_clamped() {
        let rising = MonthlySeriesService::trend_rates(&[totals(10.0, 100.0), totals(100.0, 1.0)]);
        assert_eq!(rising.income, MAX_MONTHLY_CHANGE);
        assert_eq!(rising.expenses, -MAX_MONTHLY_CHANGE);
    }

    #[test]
    fn single_month_projects_flat() {
        let rows = MonthlySeriesService::generate(
            &[txn("2023-12-20", 1234.5, TransactionKind::Income)],
            "USD",
            ProjectionRounding::WholeUnits,
        )
        .expect("series");
        let labels: Vec<&str> = rows.iter().map(|row| row.month.as_str()).collect();
        assert_eq!(labels, ["Dec 2023", "Jan 2024", "Feb 2024", "Mar 2024"]);
        assert_eq!(rows[1].income, 1235.0);
        assert!(rows[1..].iter().all(|row| row.prediction));
    }

    #[test]
    fn empty_input_yields_empty_series() {
        let rows = MonthlySeriesService::generate(&[], "USD", ProjectionRounding::WholeUnits)
            .expect("series");
        assert!(rows.is_empty());
    }

    #[test]
    fn overflowing_totals_are_a_forecast_error() {
        let err = MonthlySeriesService::generate(
            &[
                txn("2024-01-01", f64::MAX, TransactionKind::Income),
                txn("2024-01-02", f64::MAX, TransactionKind::Income),
            ],
            "USD",
            ProjectionRounding::WholeUnits,
        )
        .expect_err("overflow");
        assert_eq!(err.code(), "FORECAST_ERROR");
    }
}
