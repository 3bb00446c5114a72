use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tally_domain::{ProjectionRounding, DEFAULT_CURRENCY, DEFAULT_FISCAL_YEAR_START};

/// Environment variable overriding [`Config::bind_address`].
pub const BIND_ENV: &str = "TALLY_BIND";

/// Settings of the forecast service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_bind_address")]
    pub bind_address: String,
    /// `tracing` filter directive used unless `RUST_LOG` is set.
    #[serde(default = "Config::default_log_filter")]
    pub log_filter: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Root of the per-user JSON records. Defaults to `~/.tally/data`.
    pub data_dir: Option<PathBuf>,

    /// Currency tag used when a company has none configured.
    #[serde(default = "Config::default_currency_value")]
    pub default_currency: String,
    #[serde(default = "Config::default_fiscal_year_start_value")]
    pub default_fiscal_year_start: String,
    #[serde(default)]
    pub projection_rounding: ProjectionRounding,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cors_allow_origin: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: Self::default_bind_address(),
            log_filter: Self::default_log_filter(),
            data_dir: None,
            default_currency: Self::default_currency_value(),
            default_fiscal_year_start: Self::default_fiscal_year_start_value(),
            projection_rounding: ProjectionRounding::default(),
            cors_allow_origin: None,
        }
    }
}

impl Config {
    pub fn default_bind_address() -> String {
        "127.0.0.1:8080".into()
    }

    pub fn default_log_filter() -> String {
        "tally=info".into()
    }

    pub fn default_currency_value() -> String {
        DEFAULT_CURRENCY.into()
    }

    pub fn default_fiscal_year_start_value() -> String {
        DEFAULT_FISCAL_YEAR_START.into()
    }

    pub fn resolve_data_dir(&self) -> PathBuf {
        if let Some(path) = &self.data_dir {
            return path.clone();
        }

        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".tally")
            .join("data")
    }

    /// Applies a bind address override such as the value of [`BIND_ENV`].
    /// Blank values are ignored.
    pub fn override_bind_address(&mut self, bind: Option<String>) {
        if let Some(bind) = bind.map(|raw| raw.trim().to_string()) {
            if !bind.is_empty() {
                self.bind_address = bind;
            }
        }
    }
}
