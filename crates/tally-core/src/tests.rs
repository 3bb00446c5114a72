use chrono::NaiveDate;

use crate::{
    forecast_service::{ForecastInput, ForecastOptions, ForecastService},
    source::{FinanceSource, MemorySource},
    time::{Clock, FixedClock},
};
use tally_domain::{
    CategoryInput, CompanySettings, Frequency, ProjectionRounding, RecurringTransaction,
    Timeframe, Transaction, TransactionKind,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sample_transactions() -> Vec<Transaction> {
    vec![
        Transaction::new("t1", date(2024, 1, 5), 1000.0, TransactionKind::Income),
        Transaction::new("t2", date(2024, 1, 9), 400.0, TransactionKind::Expense)
            .with_category(CategoryInput::from_id("rent")),
        Transaction::new("t3", date(2024, 2, 5), 1100.0, TransactionKind::Income),
        Transaction::new("t4", date(2024, 2, 9), 420.0, TransactionKind::Expense)
            .with_category(CategoryInput::from_id("rent")),
    ]
}

#[test]
fn fixed_clock_reports_pinned_day() {
    let clock = FixedClock(date(2024, 3, 1));
    assert_eq!(clock.today(), date(2024, 3, 1));
    assert_eq!(clock.now().date_naive(), date(2024, 3, 1));
}

#[test]
fn forecast_service_assembles_all_sections() {
    let transactions = sample_transactions();
    let recurring = vec![RecurringTransaction::new(
        "r1",
        "Hosting",
        30.0,
        Frequency::Monthly,
        date(2024, 1, 20),
    )];
    let settings = CompanySettings::new("EUR", "01");
    let input = ForecastInput {
        transactions: &transactions,
        recurring: &recurring,
        settings: &settings,
        timeframe: Timeframe::ThreeMonths,
        today: date(2024, 3, 1),
    };

    let report = ForecastService::build(&input, &ForecastOptions::default()).expect("report");

    assert_eq!(report.monthly_forecasts.len(), 5);
    assert_eq!(report.category_forecasts.len(), 1);
    assert_eq!(report.upcoming_expenses.len(), 3);
    assert!(report.has_history());
    assert!(report
        .monthly_forecasts
        .iter()
        .all(|row| row.currency == "EUR"));
    assert!(report
        .upcoming_expenses
        .iter()
        .all(|row| row.currency == "EUR"));
}

#[test]
fn forecast_service_falls_back_to_configured_currency() {
    let transactions = sample_transactions();
    let settings = CompanySettings::default();
    let options = ForecastOptions {
        default_currency: "GBP".into(),
        projection_rounding: ProjectionRounding::Cents,
    };
    let input = ForecastInput {
        transactions: &transactions,
        recurring: &[],
        settings: &settings,
        timeframe: Timeframe::SixMonths,
        today: date(2024, 3, 1),
    };

    let report = ForecastService::build(&input, &options).expect("report");
    assert_eq!(report.category_forecasts[0].currency, "GBP");
    // 420 * 1.05 * 1.05 = 463.05 survives cents rounding
    assert_eq!(report.monthly_forecasts[3].expenses, 463.05);
}

#[test]
fn forecast_service_reports_empty_history() {
    let settings = CompanySettings::default();
    let input = ForecastInput {
        transactions: &[],
        recurring: &[],
        settings: &settings,
        timeframe: Timeframe::TwelveMonths,
        today: date(2024, 3, 1),
    };
    let report = ForecastService::build(&input, &ForecastOptions::default()).expect("report");
    assert!(!report.has_history());
    assert!(report.category_forecasts.is_empty());
    assert!(report.upcoming_expenses.is_empty());
}

#[test]
fn memory_source_filters_by_window_and_user() {
    let mut undated = Transaction::new("u", date(2024, 1, 1), 5.0, TransactionKind::Expense);
    undated.date = None;
    let mut rows = sample_transactions();
    rows.push(undated);
    let source = MemorySource::new()
        .with_transactions("acme", rows)
        .with_settings("acme", CompanySettings::new("USD", "04"));

    let since = source
        .transactions_since("acme", date(2024, 2, 1))
        .expect("transactions");
    assert_eq!(since.len(), 2);
    assert!(source
        .transactions_since("other", date(2000, 1, 1))
        .expect("transactions")
        .is_empty());
    assert!(source
        .recurring_transactions("acme")
        .expect("recurring")
        .is_empty());
    assert!(source.company_settings("acme").expect("settings").is_some());
    assert!(source.company_settings("other").expect("settings").is_none());
}
