//! HTTP surface of the forecast service.

pub mod dto;
pub mod handlers;
pub mod inputs;

use std::sync::Arc;

use axum::{
    http::{header::InvalidHeaderValue, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tally_config::Config;
use tally_core::{Clock, FinanceSource, ForecastOptions, SystemClock};
use tally_domain::CompanySettings;
use tally_storage_json::JsonFinanceSource;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Shared, immutable state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn FinanceSource>,
    pub clock: Arc<dyn Clock>,
    pub options: ForecastOptions,
    /// Settings used when neither the request nor the source has any.
    pub default_settings: CompanySettings,
}

impl AppState {
    pub fn new(
        source: Arc<dyn FinanceSource>,
        clock: Arc<dyn Clock>,
        options: ForecastOptions,
        default_settings: CompanySettings,
    ) -> Self {
        Self {
            source,
            clock,
            options,
            default_settings,
        }
    }

    /// Production wiring: JSON records under the configured data directory
    /// and the system clock.
    pub fn from_config(config: &Config) -> Self {
        let options = ForecastOptions {
            default_currency: config.default_currency.clone(),
            projection_rounding: config.projection_rounding,
        };
        let default_settings = CompanySettings::new(
            config.default_currency.clone(),
            config.default_fiscal_year_start.clone(),
        );
        Self::new(
            Arc::new(JsonFinanceSource::new(config.resolve_data_dir())),
            Arc::new(SystemClock),
            options,
            default_settings,
        )
    }
}

/// CORS policy allowing `origin`, or any origin when unset.
pub fn cors_layer(origin: Option<&str>) -> Result<CorsLayer, InvalidHeaderValue> {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);
    Ok(match origin {
        Some(origin) => layer.allow_origin(origin.parse::<HeaderValue>()?),
        None => layer.allow_origin(Any),
    })
}

pub fn router(state: AppState, cors: CorsLayer) -> Router {
    let api_routes = Router::new()
        .route("/forecast", post(handlers::forecast))
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
