use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Forecast computation failed: {0}")]
    Forecast(String),
    #[error("Data source error: {0}")]
    Source(String),
    #[error("Validation failed: {0}")]
    Validation(String),
}

impl CoreError {
    /// Stable machine-readable code reported to API clients.
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::Forecast(_) => "FORECAST_ERROR",
            CoreError::Source(_) => "DATA_SOURCE_ERROR",
            CoreError::Validation(_) => "INVALID_REQUEST",
        }
    }
}
