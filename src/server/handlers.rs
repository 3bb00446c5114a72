use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::Instrument;
use uuid::Uuid;

use crate::{
    errors::ApiError,
    server::{
        dto::{ApiResponse, ForecastData, ForecastRequest, HealthResponse},
        inputs, AppState,
    },
    utils::build_info,
};

/// `POST /api/forecast`
pub async fn forecast(
    State(state): State<AppState>,
    payload: Result<Json<ForecastRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<ForecastData>>, ApiError> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("forecast", %request_id);

    async move {
        let Json(request) =
            payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

        let span = tracing::Span::current();
        let (report, message) = tokio::task::spawn_blocking(move || {
            let _entered = span.enter();
            inputs::run_forecast(&state, request)
        })
        .await
        .map_err(|err| ApiError::Task(err.to_string()))??;

        tracing::info!(
            months = report.monthly_forecasts.len(),
            categories = report.category_forecasts.len(),
            upcoming = report.upcoming_expenses.len(),
            "forecast ready"
        );
        Ok::<_, ApiError>(Json(ApiResponse::ok(ForecastData { report, message })))
    }
    .instrument(span)
    .await
}

/// `GET /api/health`
pub async fn health() -> Json<HealthResponse> {
    let build = build_info::current();
    Json(HealthResponse {
        status: "ok",
        version: build.version,
        build,
    })
}
