//! Read-only JSON file source of per-user financial records.
//!
//! Layout under the data root:
//!
//! ```text
//! <root>/<user_id>/transactions.json   array of transactions
//! <root>/<user_id>/recurring.json      array of recurring definitions
//! <root>/<user_id>/settings.json       company settings object
//! ```
//!
//! Missing files read as "no records".

use std::{
    fs,
    io::ErrorKind,
    path::PathBuf,
};

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use tally_core::{CoreError, FinanceSource};
use tally_domain::{CompanySettings, RecurringTransaction, Transaction};

const TRANSACTIONS_FILE: &str = "transactions.json";
const RECURRING_FILE: &str = "recurring.json";
const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone)]
pub struct JsonFinanceSource {
    root: PathBuf,
}

impl JsonFinanceSource {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Directory holding the records of `user_id`.
    pub fn user_dir(&self, user_id: &str) -> Result<PathBuf, CoreError> {
        Ok(self.root.join(user_segment(user_id)?))
    }

    fn read<T: DeserializeOwned>(&self, user_id: &str, file: &str) -> Result<Option<T>, CoreError> {
        let path = self.user_dir(user_id)?.join(file);
        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(CoreError::Source(format!(
                    "failed to read {}: {err}",
                    path.display()
                )))
            }
        };
        serde_json::from_str(&data).map(Some).map_err(|err| {
            CoreError::Source(format!("failed to parse {}: {err}", path.display()))
        })
    }
}

impl FinanceSource for JsonFinanceSource {
    fn transactions_since(
        &self,
        user_id: &str,
        since: NaiveDate,
    ) -> Result<Vec<Transaction>, CoreError> {
        let rows: Vec<Transaction> = self
            .read(user_id, TRANSACTIONS_FILE)?
            .unwrap_or_default();
        // undated rows cannot be placed in the window and would be ignored anyway
        Ok(rows
            .into_iter()
            .filter(|txn| txn.date.is_some_and(|date| date >= since))
            .collect())
    }

    fn recurring_transactions(
        &self,
        user_id: &str,
    ) -> Result<Vec<RecurringTransaction>, CoreError> {
        Ok(self.read(user_id, RECURRING_FILE)?.unwrap_or_default())
    }

    fn company_settings(&self, user_id: &str) -> Result<Option<CompanySettings>, CoreError> {
        self.read(user_id, SETTINGS_FILE)
    }
}

/// Validates a user id for use as a single path segment. Ids are kept
/// verbatim so distinct users never share a directory.
fn user_segment(user_id: &str) -> Result<&str, CoreError> {
    let trimmed = user_id.trim();
    let valid = !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'));
    if valid {
        Ok(trimmed)
    } else {
        Err(CoreError::Validation(format!(
            "user id `{user_id}` contains unsupported characters"
        )))
    }
}
