//! Turns a forecast request into engine inputs.

use chrono::NaiveDate;
use tally_core::{FinanceSource, ForecastInput, ForecastService};
use tally_domain::{
    CompanySettings, ForecastReport, RecurringTransaction, Timeframe, Transaction,
};

use crate::{
    errors::ApiError,
    server::{dto::ForecastRequest, AppState},
};

pub const NO_HISTORY_MESSAGE: &str = "No historical transactions available for forecasting";

/// Inputs after the data source has filled in whatever the request omitted.
#[derive(Debug, Clone)]
pub struct ResolvedInputs {
    pub user_id: String,
    pub timeframe: Timeframe,
    pub transactions: Vec<Transaction>,
    pub recurring: Vec<RecurringTransaction>,
    pub settings: CompanySettings,
}

pub fn parse_timeframe(raw: Option<&str>) -> Result<Timeframe, ApiError> {
    let raw = raw.ok_or_else(|| ApiError::BadRequest("timeframe is required".into()))?;
    raw.parse::<Timeframe>()
        .map_err(|err| ApiError::BadRequest(err.to_string()))
}

/// Body `userId`, then the settings owner, then the first transaction that
/// names one. Blank ids are skipped.
pub fn resolve_user_id(request: &ForecastRequest) -> Option<String> {
    let from_settings = || {
        request
            .settings
            .as_ref()
            .and_then(|settings| settings.user_id.clone())
    };
    let from_transactions = || {
        request
            .transactions
            .iter()
            .flatten()
            .find_map(|txn| txn.user_id.clone().filter(|id| !id.trim().is_empty()))
    };
    request
        .user_id
        .clone()
        .filter(|id| !id.trim().is_empty())
        .or_else(from_settings)
        .or_else(from_transactions)
        .map(|id| id.trim().to_string())
}

/// Validates the request and fetches absent inputs from `source`.
pub fn resolve(
    request: ForecastRequest,
    source: &dyn FinanceSource,
    default_settings: &CompanySettings,
    today: NaiveDate,
) -> Result<ResolvedInputs, ApiError> {
    let timeframe = parse_timeframe(request.timeframe.as_deref())?;
    let user_id = resolve_user_id(&request).ok_or_else(|| {
        ApiError::BadRequest("unable to determine the user for this forecast".into())
    })?;

    let settings = match request.settings {
        Some(settings) => settings,
        None => source
            .company_settings(&user_id)?
            .unwrap_or_else(|| default_settings.clone()),
    };
    let transactions = match request.transactions {
        Some(transactions) => transactions,
        None => {
            let since = settings.history_window_start(today);
            tracing::debug!(%user_id, %since, "fetching transactions");
            source.transactions_since(&user_id, since)?
        }
    };
    let recurring = match request.recurring {
        Some(recurring) => recurring,
        None => source.recurring_transactions(&user_id)?,
    };

    Ok(ResolvedInputs {
        user_id,
        timeframe,
        transactions,
        recurring,
        settings,
    })
}

pub fn summary_message(report: &ForecastReport, timeframe: Timeframe) -> String {
    if report.has_history() {
        format!("Forecast generated for {timeframe}")
    } else {
        NO_HISTORY_MESSAGE.to_string()
    }
}

/// Resolves inputs and runs the engine. Blocking; call off the async runtime.
pub fn run_forecast(
    state: &AppState,
    request: ForecastRequest,
) -> Result<(ForecastReport, String), ApiError> {
    let today = state.clock.today();
    let inputs = resolve(
        request,
        state.source.as_ref(),
        &state.default_settings,
        today,
    )?;
    tracing::info!(
        user_id = %inputs.user_id,
        timeframe = %inputs.timeframe,
        transactions = inputs.transactions.len(),
        recurring = inputs.recurring.len(),
        "generating forecast"
    );

    let input = ForecastInput {
        transactions: &inputs.transactions,
        recurring: &inputs.recurring,
        settings: &inputs.settings,
        timeframe: inputs.timeframe,
        today,
    };
    let report = ForecastService::build(&input, &state.options)?;
    let message = summary_message(&report, inputs.timeframe);
    Ok((report, message))
}
