//! Recurring transaction definitions and their period arithmetic.

use std::{fmt, str::FromStr};

use chrono::{Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{category::PartialCategory, common::months_between, lenient};

/// Repeat cadence of a recurring definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    /// The `index`-th occurrence counted from `start`, where index 0 is
    /// `start` itself. Month-based cadences clamp to the end of shorter
    /// months without drifting: a Jan 31 series lands on Feb 28/29 and then
    /// Mar 31 again.
    pub fn occurrence(self, start: NaiveDate, index: u32) -> Option<NaiveDate> {
        match self {
            Frequency::Weekly => start.checked_add_signed(Duration::try_weeks(i64::from(index))?),
            Frequency::Monthly => start.checked_add_months(Months::new(index)),
            Frequency::Yearly => start.checked_add_months(Months::new(index.checked_mul(12)?)),
        }
    }

    /// Smallest occurrence index whose date is on or after `target`,
    /// computed without walking the series.
    pub fn first_index_on_or_after(self, start: NaiveDate, target: NaiveDate) -> Option<u32> {
        if target <= start {
            return Some(0);
        }
        let candidate = match self {
            Frequency::Weekly => {
                let days = (target - start).num_days();
                return u32::try_from((days + 6) / 7).ok();
            }
            Frequency::Monthly => months_between(start, target),
            Frequency::Yearly => months_between(start, target) / 12,
        };
        let candidate = u32::try_from(candidate).ok()?;
        if self.occurrence(start, candidate)? >= target {
            Some(candidate)
        } else {
            candidate.checked_add(1)
        }
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            "yearly" => Ok(Frequency::Yearly),
            other => Err(format!("unsupported frequency `{other}`")),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Yearly => "yearly",
        };
        f.write_str(label)
    }
}

/// A recurring transaction definition. It has no end date; expansion stops
/// at the forecast horizon.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RecurringTransaction {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: String,
    #[serde(
        default,
        alias = "userId",
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub user_id: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient::parsed")]
    pub frequency: Option<Frequency>,
    #[serde(default, alias = "startDate", deserialize_with = "lenient::date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<PartialCategory>,
}

impl RecurringTransaction {
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        amount: f64,
        frequency: Frequency,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: None,
            description: description.into(),
            amount: Some(amount),
            frequency: Some(frequency),
            start_date: Some(start_date),
            category: None,
        }
    }

    pub fn with_category(mut self, name: impl Into<String>, color: impl Into<String>) -> Self {
        self.category = Some(PartialCategory {
            name: Some(name.into()),
            color: Some(color.into()),
            ..PartialCategory::default()
        });
        self
    }
}
