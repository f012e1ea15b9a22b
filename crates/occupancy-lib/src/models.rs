//! Core data models for the occupancy predictor

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{PredictorError, Result};

/// One day's operating window, times encoded as HHMM integers
/// (630 = 06:30, 2230 = 22:30). Immutable once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timing {
    opening: u16,
    closing: u16,
    #[serde(rename = "open")]
    is_open: bool,
}

impl Timing {
    /// Build a validated timing. The progress computation divides by
    /// `closing - opening`, so `closing` must be strictly later.
    pub fn new(opening: u16, closing: u16, is_open: bool) -> Result<Self> {
        if closing <= opening {
            return Err(PredictorError::Configuration(format!(
                "closing time {closing:04} must be after opening time {opening:04}"
            )));
        }
        Ok(Self {
            opening,
            closing,
            is_open,
        })
    }

    pub fn opening(&self) -> u16 {
        self.opening
    }

    pub fn closing(&self) -> u16 {
        self.closing
    }

    /// Whether the facility is marked open that day. The open-period
    /// progress computation does not read this flag; see `ScheduleClock`.
    pub fn is_open(&self) -> bool {
        self.is_open
    }
}

/// A full week of operating windows, indexed Monday = 0 .. Sunday = 6.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklySchedule([Timing; 7]);

impl WeeklySchedule {
    pub fn new(timings: [Timing; 7]) -> Self {
        Self(timings)
    }

    /// Standard opening hours used as the week-keyed fallback:
    /// Mon-Fri 06:30-22:30, Sat-Sun 08:00-21:00, all days open.
    pub fn standard_hours() -> Self {
        let weekday = Timing {
            opening: 630,
            closing: 2230,
            is_open: true,
        };
        let weekend = Timing {
            opening: 800,
            closing: 2100,
            is_open: true,
        };
        Self([
            weekday, weekday, weekday, weekday, weekday, weekend, weekend,
        ])
    }

    /// Timing for a weekday index, Monday = 0 .. Sunday = 6.
    pub fn timing(&self, weekday: usize) -> Timing {
        self.0[weekday]
    }
}

/// Schedule configuration variants. The two wire shapes carry different
/// fallback semantics and are kept distinct rather than merged.
#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleConfig {
    /// A single fixed week pattern, applied to every week with no fallback.
    Flat(WeeklySchedule),
    /// Per-calendar-week overrides keyed by the week's Monday date. Weeks
    /// without an entry fall back to `default`.
    WeekKeyed {
        weeks: BTreeMap<NaiveDate, WeeklySchedule>,
        default: WeeklySchedule,
    },
}

/// A single occupancy estimate paired with the timestamp it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionPoint {
    pub timestamp: NaiveDateTime,
    pub occupancy: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timing_rejects_inverted_window() {
        assert!(Timing::new(2230, 630, true).is_err());
        assert!(Timing::new(900, 900, true).is_err());
        assert!(Timing::new(630, 2230, true).is_ok());
    }

    #[test]
    fn test_equal_open_close_rejected_even_when_closed() {
        // A closed day still carries a window; the invariant holds for it too.
        let err = Timing::new(0, 0, false).unwrap_err();
        assert!(matches!(err, PredictorError::Configuration(_)));
    }

    #[test]
    fn test_standard_hours_constant() {
        let week = WeeklySchedule::standard_hours();
        for day in 0..5 {
            assert_eq!(week.timing(day).opening(), 630);
            assert_eq!(week.timing(day).closing(), 2230);
        }
        for day in 5..7 {
            assert_eq!(week.timing(day).opening(), 800);
            assert_eq!(week.timing(day).closing(), 2100);
        }
        assert!((0..7).all(|day| week.timing(day).is_open()));
    }
}
