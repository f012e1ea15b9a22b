//! Academic term-time calendar
//!
//! Static interval data supplied as configuration; the classifier queries
//! it, nothing here computes term dates.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::{PredictorError, Result};

/// Term-time interval table. Dates inside any period are in term; the
/// default classification is non-term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermCalendar {
    periods: Vec<(NaiveDate, NaiveDate)>,
}

#[derive(Debug, Deserialize)]
struct WirePeriod {
    start: NaiveDate,
    end: NaiveDate,
}

impl TermCalendar {
    /// Build a calendar from `(start, end)` periods, end inclusive.
    pub fn new(periods: Vec<(NaiveDate, NaiveDate)>) -> Result<Self> {
        for (start, end) in &periods {
            if end < start {
                return Err(PredictorError::Configuration(format!(
                    "term period ends ({end}) before it starts ({start})"
                )));
            }
        }
        Ok(Self { periods })
    }

    /// Load a calendar from a JSON array of
    /// `{"start": "YYYY-MM-DD", "end": "YYYY-MM-DD"}` objects.
    pub fn from_json(raw: &str) -> Result<Self> {
        let periods: Vec<WirePeriod> = serde_json::from_str(raw).map_err(|e| {
            PredictorError::Configuration(format!("invalid term calendar JSON: {e}"))
        })?;
        Self::new(periods.into_iter().map(|p| (p.start, p.end)).collect())
    }

    /// The 2024-25 academic year: semester teaching weeks (excluding
    /// independent learning weeks and vacations) plus revision and exam
    /// diets.
    pub fn academic_year_2024_25() -> Self {
        let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        Self {
            periods: vec![
                (date(2024, 9, 16), date(2024, 10, 20)),
                (date(2024, 10, 28), date(2024, 12, 1)),
                (date(2024, 12, 6), date(2024, 12, 20)),
                (date(2025, 1, 27), date(2025, 3, 2)),
                (date(2025, 3, 10), date(2025, 4, 6)),
                (date(2025, 4, 14), date(2025, 4, 27)),
                (date(2025, 4, 28), date(2025, 5, 26)),
                (date(2025, 5, 27), date(2025, 5, 31)),
            ],
        }
    }

    /// 1 when `date` falls outside every term period, 0 inside one.
    /// Period ends are inclusive (compared as `< end + 1 day`).
    pub fn is_non_term(&self, date: NaiveDate) -> u8 {
        let in_term = self
            .periods
            .iter()
            .any(|(start, end)| date >= *start && date <= *end);
        u8::from(!in_term)
    }
}
