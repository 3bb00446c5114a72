//! Data access for inputs a forecast request did not supply.

use std::collections::HashMap;

use chrono::NaiveDate;
use tally_domain::{CompanySettings, RecurringTransaction, Transaction};

use crate::CoreError;

/// Read-only access to a user's financial records.
pub trait FinanceSource: Send + Sync {
    /// Transactions dated on or after `since`.
    fn transactions_since(
        &self,
        user_id: &str,
        since: NaiveDate,
    ) -> Result<Vec<Transaction>, CoreError>;

    fn recurring_transactions(&self, user_id: &str)
        -> Result<Vec<RecurringTransaction>, CoreError>;

    /// `None` when the user has not saved any settings.
    fn company_settings(&self, user_id: &str) -> Result<Option<CompanySettings>, CoreError>;
}

/// Records held in memory, keyed by user id.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    transactions: HashMap<String, Vec<Transaction>>,
    recurring: HashMap<String, Vec<RecurringTransaction>>,
    settings: HashMap<String, CompanySettings>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transactions(
        mut self,
        user_id: impl Into<String>,
        transactions: Vec<Transaction>,
    ) -> Self {
        self.transactions.insert(user_id.into(), transactions);
        self
    }

    pub fn with_recurring(
        mut self,
        user_id: impl Into<String>,
        recurring: Vec<RecurringTransaction>,
    ) -> Self {
        self.recurring.insert(user_id.into(), recurring);
        self
    }

    pub fn with_settings(mut self, user_id: impl Into<String>, settings: CompanySettings) -> Self {
        self.settings.insert(user_id.into(), settings);
        self
    }
}

impl FinanceSource for MemorySource {
    fn transactions_since(
        &self,
        user_id: &str,
        since: NaiveDate,
    ) -> Result<Vec<Transaction>, CoreError> {
        Ok(self
            .transactions
            .get(user_id)
            .map(|rows| {
                rows.iter()
                    .filter(|txn| txn.date.is_some_and(|date| date >= since))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn recurring_transactions(
        &self,
        user_id: &str,
    ) -> Result<Vec<RecurringTransaction>, CoreError> {
        Ok(self.recurring.get(user_id).cloned().unwrap_or_default())
    }

    fn company_settings(&self, user_id: &str) -> Result<Option<CompanySettings>, CoreError> {
        Ok(self.settings.get(user_id).cloned())
    }
}
