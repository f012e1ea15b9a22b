//! Cyclical date/time feature encoding
//!
//! Maps a timestamp to the numeric features the occupancy models were
//! trained on: sin/cos position within the week, month and year cycles,
//! plus fraction-of-day and open-window progress scalars.

use std::f64::consts::PI;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

/// Day-of-year divisor. Fixed at 365 regardless of leap years; the trained
/// models expect this exact encoding.
const DAYS_PER_YEAR: f64 = 365.0;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Cyclical encodings of a single timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CyclicalFeatures {
    pub day_sin: f64,
    pub day_cos: f64,
    pub month_sin: f64,
    pub month_cos: f64,
    pub day_of_year_sin: f64,
    pub day_of_year_cos: f64,
    /// Fraction of the day elapsed, in [0, 1).
    pub day_progress: f64,
}

impl CyclicalFeatures {
    /// Encode a timestamp. Pure function, no failure modes.
    pub fn encode(at: NaiveDateTime) -> Self {
        let weekday = f64::from(at.weekday().num_days_from_monday());
        let month = f64::from(at.month());
        let day_of_year = f64::from(at.ordinal());
        let seconds_since_midnight =
            f64::from(at.hour() * 3600 + at.minute() * 60 + at.second());

        Self {
            day_sin: (weekday * (2.0 * PI / 7.0)).sin(),
            day_cos: (weekday * (2.0 * PI / 7.0)).cos(),
            month_sin: (2.0 * PI * month / 12.0).sin(),
            month_cos: (2.0 * PI * month / 12.0).cos(),
            day_of_year_sin: (2.0 * PI * day_of_year / DAYS_PER_YEAR).sin(),
            day_of_year_cos: (2.0 * PI * day_of_year / DAYS_PER_YEAR).cos(),
            day_progress: seconds_since_midnight / SECONDS_PER_DAY,
        }
    }
}

/// Fraction of the year elapsed at `date`, counted from January 1st over
/// the fixed 365-day cycle.
pub fn seasonal_position(date: NaiveDate) -> f64 {
    f64::from(date.ordinal0()) / DAYS_PER_YEAR
}

/// Position of `at` inside an open window running from `opening` to
/// `closing`, 0 at opening and 1 at closing. Callers guarantee
/// `closing > opening`.
pub fn open_window_progress(
    at: NaiveDateTime,
    opening: NaiveDateTime,
    closing: NaiveDateTime,
) -> f64 {
    let elapsed = (at - opening).num_seconds() as f64;
    let total = (closing - opening).num_seconds() as f64;
    elapsed / total
}
