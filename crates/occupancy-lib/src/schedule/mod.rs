//! Opening-hours schedule model
//!
//! This module resolves a wall-clock timestamp against a weekly
//! opening/closing schedule (flat or per-week-keyed) and exposes the
//! normalized open-period progress signal, plus the academic term-time
//! calendar lookup.

mod calendar;
mod clock;
mod parse;

pub use calendar::TermCalendar;
pub use clock::{week_start, ScheduleClock};
pub use parse::parse_schedule_json;
