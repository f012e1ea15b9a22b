//! Evenly spaced timestamp series generation

use chrono::{Duration, NaiveDateTime};

use crate::error::{PredictorError, Result};

/// Lazy, finite, restartable series of timestamps from `from` to `to`
/// inclusive, stepping by a whole-minute interval. Iteration stops once
/// the next tick would exceed `to`; cloning restarts from the beginning.
#[derive(Debug, Clone)]
pub struct TimestampRange {
    next: Option<NaiveDateTime>,
    end: NaiveDateTime,
    step: Duration,
}

impl TimestampRange {
    pub fn new(from: NaiveDateTime, to: NaiveDateTime, step_minutes: u32) -> Result<Self> {
        if step_minutes == 0 {
            return Err(PredictorError::Configuration(
                "timestamp step must be at least one minute".into(),
            ));
        }
        Ok(Self {
            next: (from <= to).then_some(from),
            end: to,
            step: Duration::minutes(i64::from(step_minutes)),
        })
    }
}

impl Iterator for TimestampRange {
    type Item = NaiveDateTime;

    fn next(&mut self) -> Option<NaiveDateTime> {
        let current = self.next?;
        let following = current + self.step;
        self.next = (following <= self.end).then_some(following);
        Some(current)
    }
}
