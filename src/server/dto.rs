//! Request and response bodies of the HTTP API.

use serde::{Deserialize, Serialize};
use tally_domain::{CompanySettings, ForecastReport, RecurringTransaction, Transaction};

use crate::utils::build_info::BuildMetadata;

/// Body of `POST /api/forecast`. Absent collections are fetched from the
/// data source for the resolved user.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastRequest {
    /// Kept as raw text so an unknown horizon yields a precise message.
    #[serde(default)]
    pub timeframe: Option<String>,
    #[serde(default)]
    pub transactions: Option<Vec<Transaction>>,
    #[serde(default)]
    pub recurring: Option<Vec<RecurringTransaction>>,
    #[serde(default)]
    pub settings: Option<CompanySettings>,
    #[serde(default, alias = "user_id")]
    pub user_id: Option<String>,
}

/// Success envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ForecastData {
    #[serde(flatten)]
    pub report: ForecastReport,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub build: BuildMetadata,
}
