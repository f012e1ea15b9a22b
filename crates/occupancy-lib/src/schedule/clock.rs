//! Open-period progress computation

use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, Timelike};

use crate::models::{ScheduleConfig, Timing, WeeklySchedule};

/// Maps a timestamp to its normalized position within that day's
/// opening/closing window.
#[derive(Debug, Clone)]
pub struct ScheduleClock {
    config: ScheduleConfig,
}

impl ScheduleClock {
    pub fn from_config(config: ScheduleConfig) -> Self {
        Self { config }
    }

    /// A clock over a single fixed week pattern.
    pub fn flat(week: WeeklySchedule) -> Self {
        Self {
            config: ScheduleConfig::Flat(week),
        }
    }

    /// A clock over per-week overrides. Weeks without an entry resolve
    /// against the supplied fallback week.
    pub fn week_keyed(
        weeks: BTreeMap<NaiveDate, WeeklySchedule>,
        default: WeeklySchedule,
    ) -> Self {
        Self {
            config: ScheduleConfig::WeekKeyed { weeks, default },
        }
    }

    /// Progress through the day's open period, clamped to [0, 1]:
    /// 0 at or before opening, 1 at or after closing, linear in the
    /// HHMM encoding in between. Seconds are ignored.
    ///
    /// The day's `is_open` flag is deliberately not consulted here; the
    /// trained models were calibrated against this behavior.
    pub fn progress(&self, at: NaiveDateTime) -> f64 {
        let hhmm = (at.hour() * 100 + at.minute()) as u16;
        let timing = self.timing_for(at);
        let opening = timing.opening();
        let closing = timing.closing();

        if hhmm <= opening {
            0.0
        } else if hhmm >= closing {
            1.0
        } else {
            f64::from(hhmm - opening) / f64::from(closing - opening)
        }
    }

    fn timing_for(&self, at: NaiveDateTime) -> Timing {
        let weekday = at.weekday().num_days_from_monday() as usize;
        match &self.config {
            ScheduleConfig::Flat(week) => week.timing(weekday),
            ScheduleConfig::WeekKeyed { weeks, default } => {
                let monday = week_start(at.date());
                weeks
                    .get(&monday)
                    .unwrap_or(default)
                    .timing(weekday)
            }
        }
    }
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.weekday().num_days_from_monday()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Timing;

    fn stamp(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn standard_clock() -> ScheduleClock {
        ScheduleClock::flat(WeeklySchedule::standard_hours())
    }

    #[test]
    fn test_before_opening_is_zero() {
        // 2024-01-01 is a Monday with hours 0630-2230.
        assert_eq!(standard_clock().progress(stamp("2024-01-01 03:00")), 0.0);
        assert_eq!(standard_clock().progress(stamp("2024-01-01 06:30")), 0.0);
    }

    #[test]
    fn test_after_closing_is_one() {
        assert_eq!(standard_clock().progress(stamp("2024-01-01 23:00")), 1.0);
        assert_eq!(standard_clock().progress(stamp("2024-01-01 22:30")), 1.0);
    }

    #[test]
    fn test_interior_progress_value() {
        // (1415 - 630) / (2230 - 630) = 785 / 1600
        let progress = standard_clock().progress(stamp("2024-01-01 14:15"));
        assert!((progress - 785.0 / 1600.0).abs() < 1e-12);
    }

    #[test]
    fn test_progress_strictly_increasing_inside_window() {
        let clock = standard_clock();
        let mut previous = 0.0;
        for hour in 7..22 {
            let progress = clock.progress(stamp(&format!("2024-01-01 {hour:02}:00")));
            assert!(progress > previous);
            assert!(progress > 0.0 && progress < 1.0);
            previous = progress;
        }
    }

    #[test]
    fn test_weekend_uses_weekend_timing() {
        // 2024-01-06 is a Saturday with hours 0800-2100.
        let clock = standard_clock();
        assert_eq!(clock.progress(stamp("2024-01-06 07:30")), 0.0);
        let progress = clock.progress(stamp("2024-01-06 14:30"));
        assert!((progress - 630.0 / 1300.0).abs() < 1e-12);
    }

    #[test]
    fn test_progress_ignores_is_open_flag() {
        let open = Timing::new(630, 2230, true).unwrap();
        let closed = Timing::new(630, 2230, false).unwrap();
        let open_clock = ScheduleClock::flat(WeeklySchedule::new([open; 7]));
        let closed_clock = ScheduleClock::flat(WeeklySchedule::new([closed; 7]));

        for time in ["03:00", "09:15", "14:15", "23:00"] {
            let at = stamp(&format!("2024-01-01 {time}"));
            assert_eq!(open_clock.progress(at), closed_clock.progress(at));
        }
    }

    #[test]
    fn test_week_keyed_override_and_fallback() {
        let short_day = Timing::new(1000, 1200, true).unwrap();
        let override_week = WeeklySchedule::new([short_day; 7]);
        let mut weeks = BTreeMap::new();
        weeks.insert(date("2024-01-01"), override_week);
        let clock = ScheduleClock::week_keyed(weeks, WeeklySchedule::standard_hours());

        // Inside the keyed week the override applies.
        let progress = clock.progress(stamp("2024-01-03 11:00"));
        assert!((progress - 0.5).abs() < 1e-12);

        // The following week misses the map and falls back to the default.
        assert_eq!(clock.progress(stamp("2024-01-10 06:00")), 0.0);
        let progress = clock.progress(stamp("2024-01-10 14:15"));
        assert!((progress - 785.0 / 1600.0).abs() < 1e-12);
    }

    #[test]
    fn test_week_start() {
        assert_eq!(week_start(date("2024-01-01")), date("2024-01-01"));
        assert_eq!(week_start(date("2024-01-04")), date("2024-01-01"));
        assert_eq!(week_start(date("2024-01-07")), date("2024-01-01"));
        assert_eq!(week_start(date("2024-01-08")), date("2024-01-08"));
    }
}
