use chrono::NaiveDate;
use serde_json::json;
use tally_core::{
    ForecastInput, ForecastOptions, ForecastService, MonthTotals, MonthlySeriesService,
    MAX_MONTHLY_CHANGE,
};
use tally_domain::{
    round_to_cents, CompanySettings, ProjectionRounding, RecurringTransaction, Timeframe,
    Transaction, TransactionKind, TrendDirection,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn transactions(value: serde_json::Value) -> Vec<Transaction> {
    serde_json::from_value(value).expect("transactions decode")
}

#[test]
fn two_month_history_projects_three_months() {
    let txns = transactions(json!([
        { "id": "1", "date": "2024-01-03", "amount": 1000, "type": "income" },
        { "id": "2", "date": "2024-01-15T10:00:00Z", "amount": "400", "type": "expense", "category": "rent" },
        { "id": "3", "date": "2024-02-03", "amount": 1100.0, "type": "income" },
        { "id": "4", "date": "2024-02-15", "amount": 420, "type": "expense", "category": { "id": "rent", "name": "Rent" } }
    ]));

    let rows = MonthlySeriesService::generate(&txns, "USD", ProjectionRounding::WholeUnits)
        .expect("series");

    let summary: Vec<(&str, f64, f64, f64, bool)> = rows
        .iter()
        .map(|row| {
            (
                row.month.as_str(),
                row.income,
                row.expenses,
                row.savings,
                row.prediction,
            )
        })
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Jan 2024", 1000.0, 400.0, 600.0, false),
            ("Feb 2024", 1100.0, 420.0, 680.0, false),
            ("Mar 2024", 1210.0, 441.0, 769.0, true),
            ("Apr 2024", 1331.0, 463.0, 868.0, true),
            ("May 2024", 1464.0, 486.0, 978.0, true),
        ]
    );
}

#[test]
fn malformed_records_never_abort_the_forecast() {
    let txns = transactions(json!([
        { "id": "ok", "date": "2024-05-02", "amount": 80, "type": "expense", "category": { "name": "Food" } },
        { "id": "no-date", "amount": 50, "type": "expense" },
        { "id": "bad-date", "date": "soon", "amount": 50, "type": "expense" },
        { "id": "bad-amount", "date": "2024-05-03", "amount": "lots", "type": "income" },
        { "id": "odd-category", "date": "2024-05-04", "amount": 20, "type": "expense", "category": 12 },
        { "id": "unknown-kind", "date": "2024-05-05", "amount": 999, "type": "refund" }
    ]));
    let recurring: Vec<RecurringTransaction> = serde_json::from_value(json!([
        { "id": "r1", "description": "Gym", "amount": 45, "frequency": "monthly", "start_date": "2024-04-10" },
        { "id": "r2", "description": "Broken", "amount": 10, "frequency": "hourly", "start_date": "2024-04-10" },
        { "id": "r3", "description": "Undated", "amount": 10, "frequency": "weekly" }
    ]))
    .expect("recurring decodes");
    let settings = CompanySettings::default();
    let input = ForecastInput {
        transactions: &txns,
        recurring: &recurring,
        settings: &settings,
        timeframe: Timeframe::ThreeMonths,
        today: date(2024, 6, 1),
    };

    let report = ForecastService::build(&input, &ForecastOptions::default()).expect("report");

    assert_eq!(report.monthly_forecasts[0].month, "May 2024");
    assert_eq!(report.monthly_forecasts[0].expenses, 100.0);
    assert_eq!(report.monthly_forecasts[0].income, 0.0);
    let names: Vec<&str> = report
        .category_forecasts
        .iter()
        .map(|row| row.category.name.as_str())
        .collect();
    assert_eq!(names, ["Food", "Uncategorized"]);
    let gym: Vec<NaiveDate> = report.upcoming_expenses.iter().map(|row| row.date).collect();
    assert_eq!(gym, [date(2024, 6, 10), date(2024, 7, 10), date(2024, 8, 10)]);
}

#[test]
fn projected_rows_follow_history_in_order() {
    let txns = transactions(json!([
        { "id": "a", "date": "2023-11-11", "amount": 10, "type": "income" },
        { "id": "b", "date": "2023-09-11", "amount": 10, "type": "income" },
        { "id": "c", "date": "2023-12-30", "amount": 10, "type": "expense" }
    ]));
    let rows = MonthlySeriesService::generate(&txns, "USD", ProjectionRounding::WholeUnits)
        .expect("series");
    let history = rows.iter().take_while(|row| !row.prediction).count();
    assert_eq!(history, 3);
    assert!(rows[history..].iter().all(|row| row.prediction));
    assert_eq!(rows.len(), history + 3);
    assert_eq!(rows[history].month, "Jan 2024");
}

#[test]
fn rising_category_is_flagged_up() {
    let txns = transactions(json!([
        { "id": "1", "date": "2024-01-01", "amount": 100, "type": "expense", "category": "ads" },
        { "id": "2", "date": "2024-01-15", "amount": 100, "type": "expense", "category": "ads" },
        { "id": "3", "date": "2024-02-01", "amount": 150, "type": "expense", "category": "ads" },
        { "id": "4", "date": "2024-02-15", "amount": 150, "type": "expense", "category": "ads" }
    ]));
    let settings = CompanySettings::default();
    let input = ForecastInput {
        transactions: &txns,
        recurring: &[],
        settings: &settings,
        timeframe: Timeframe::SixMonths,
        today: date(2024, 3, 1),
    };
    let report = ForecastService::build(&input, &ForecastOptions::default()).expect("report");
    let ads = &report.category_forecasts[0];
    assert_eq!(ads.category.id, "ads");
    assert_eq!(ads.category.name, "Uncategorized");
    assert_eq!(ads.trend, TrendDirection::Up);
    assert_eq!(ads.change, 50);
    assert_eq!(ads.current, 125.0);
    assert_eq!(ads.forecast, 187.5);
    assert_eq!(ads.confidence, 0.5);
}

#[test]
fn history_rows_keep_the_savings_identity_and_rates_stay_clamped() {
    let amounts = [
        (3_250.75, 1_999.99),
        (12.5, 8_400.0),
        (0.0, 310.1),
        (7_777.77, 0.0),
        (450.0, 449.99),
        (99_000.0, 1.0),
        (1.0, 99_000.0),
    ];
    let txns: Vec<Transaction> = amounts
        .iter()
        .enumerate()
        .flat_map(|(offset, &(income, expense))| {
            let day = date(2023, offset as u32 + 1, 10);
            [
                Transaction::new(format!("i{offset}"), day, income, TransactionKind::Income),
                Transaction::new(format!("e{offset}"), day, expense, TransactionKind::Expense),
            ]
        })
        .collect();

    let totals: Vec<MonthTotals> = MonthlySeriesService::aggregate(&txns)
        .into_values()
        .collect();
    let rates = MonthlySeriesService::trend_rates(&totals);
    assert!((-MAX_MONTHLY_CHANGE..=MAX_MONTHLY_CHANGE).contains(&rates.income));
    assert!((-MAX_MONTHLY_CHANGE..=MAX_MONTHLY_CHANGE).contains(&rates.expenses));

    let rows = MonthlySeriesService::generate(&txns, "USD", ProjectionRounding::Cents)
        .expect("series");
    for row in rows.iter().filter(|row| !row.prediction) {
        assert_eq!(row.savings, round_to_cents(row.income - row.expenses));
    }
    assert_eq!(rows.iter().filter(|row| row.prediction).count(), 3);
}
