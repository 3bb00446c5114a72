//! Historical transactions consumed by the forecasting engine.

use std::{convert::Infallible, fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{category::CategoryInput, lenient};

/// Ledger direction of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
    Transfer,
    /// Anything the backend sent that is not one of the known types.
    #[default]
    Other,
}

impl FromStr for TransactionKind {
    type Err = Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(match value.trim().to_ascii_lowercase().as_str() {
            "income" => TransactionKind::Income,
            "expense" => TransactionKind::Expense,
            "transfer" => TransactionKind::Transfer,
            _ => TransactionKind::Other,
        })
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
            TransactionKind::Transfer => "transfer",
            TransactionKind::Other => "other",
        };
        f.write_str(label)
    }
}

impl<'de> Deserialize<'de> for TransactionKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(lenient::parsed(deserializer)?.unwrap_or_default())
    }
}

/// A recorded transaction. `date` and `amount` are `None` when the backend
/// supplied something unusable; such records are ignored by the engine.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: String,
    #[serde(
        default,
        alias = "userId",
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::date")]
    pub date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub amount: Option<f64>,
    #[serde(rename = "type", default)]
    pub kind: TransactionKind,
    #[serde(default)]
    pub category: CategoryInput,
}

impl Transaction {
    pub fn new(
        id: impl Into<String>,
        date: NaiveDate,
        amount: f64,
        kind: TransactionKind,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: None,
            date: Some(date),
            amount: Some(amount),
            kind,
            category: CategoryInput::Missing,
        }
    }

    pub fn with_category(mut self, category: impl Into<CategoryInput>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Date and finite amount, when both are usable.
    pub fn dated_amount(&self) -> Option<(NaiveDate, f64)> {
        match (self.date, self.amount) {
            (Some(date), Some(amount)) if amount.is_finite() => Some((date, amount)),
            _ => None,
        }
    }
}
