//! Expansion of recurring definitions into dated upcoming expenses.

use chrono::NaiveDate;
use tally_domain::{CategoryLabel, Frequency, RecurringTransaction, Timeframe, UpcomingExpense};

use crate::CoreError;

/// Upper bound on occurrences emitted for a single definition.
const MAX_OCCURRENCES_PER_DEFINITION: usize = 1024;

pub struct RecurrenceService;

impl RecurrenceService {
    /// Occurrences of `definition` falling within `today..=horizon_end`.
    ///
    /// Definitions without a start date, cadence or numeric amount yield
    /// nothing.
    pub fn expand(
        definition: &RecurringTransaction,
        today: NaiveDate,
        horizon_end: NaiveDate,
        currency: &str,
    ) -> Result<Vec<UpcomingExpense>, CoreError> {
        let (Some(start), Some(frequency), Some(amount)) =
            (definition.start_date, definition.frequency, definition.amount)
        else {
            tracing::warn!(
                recurring_id = %definition.id,
                "recurring definition is incomplete; no occurrences generated"
            );
            return Ok(Vec::new());
        };
        if !amount.is_finite() {
            return Err(CoreError::Forecast(format!(
                "recurring transaction {} has a non-finite amount",
                definition.id
            )));
        }

        let first = frequency
            .first_index_on_or_after(start, today)
            .ok_or_else(|| out_of_range(definition))?;
        let category = definition
            .category
            .as_ref()
            .map(|category| category.label())
            .unwrap_or_default();

        let mut expenses = Vec::new();
        let mut index = first;
        while expenses.len() < MAX_OCCURRENCES_PER_DEFINITION {
            let date = frequency
                .occurrence(start, index)
                .ok_or_else(|| out_of_range(definition))?;
            if date > horizon_end {
                break;
            }
            expenses.push(occurrence_row(
                definition,
                date,
                amount,
                &category,
                frequency,
                currency,
            ));
            index = index.checked_add(1).ok_or_else(|| out_of_range(definition))?;
        }
        Ok(expenses)
    }

    /// Upcoming expenses for all definitions between `today` and the end of
    /// `timeframe`, ordered by date.
    pub fn upcoming(
        definitions: &[RecurringTransaction],
        today: NaiveDate,
        timeframe: Timeframe,
        currency: &str,
    ) -> Result<Vec<UpcomingExpense>, CoreError> {
        let horizon_end = timeframe.horizon_end(today).ok_or_else(|| {
            CoreError::Forecast(format!("horizon {timeframe} from {today} is out of range"))
        })?;
        let mut expenses = Vec::new();
        for definition in definitions {
            expenses.extend(Self::expand(definition, today, horizon_end, currency)?);
        }
        expenses.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
        Ok(expenses)
    }
}

fn occurrence_row(
    definition: &RecurringTransaction,
    date: NaiveDate,
    amount: f64,
    category: &CategoryLabel,
    frequency: Frequency,
    currency: &str,
) -> UpcomingExpense {
    UpcomingExpense {
        id: format!("{}-{}", definition.id, date.format("%Y-%m-%d")),
        description: definition.description.clone(),
        amount,
        date,
        category: category.clone(),
        frequency,
        currency: currency.to_string(),
    }
}

fn out_of_range(definition: &RecurringTransaction) -> CoreError {
    CoreError::Forecast(format!(
        "recurring transaction {} has dates outside the supported calendar range",
        definition.id
    ))
}
