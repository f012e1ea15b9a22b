//! Schedule JSON parsing
//!
//! Two wire shapes exist and are distinguished structurally:
//!
//! - Flat: `{"timings": [{"opening": 630, "closing": 2230, "open": true}, ...]}`
//!   with exactly seven Monday-first entries.
//! - Week-keyed: `[["2024-01-01", ...], ["{\"timings\": ...}", ...]]` --
//!   parallel arrays of week-start dates and per-week JSON documents,
//!   each document itself in the flat shape.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{PredictorError, Result};
use crate::models::{ScheduleConfig, Timing, WeeklySchedule};

#[derive(Debug, Deserialize)]
struct WireTiming {
    opening: u16,
    closing: u16,
    open: bool,
}

#[derive(Debug, Deserialize)]
struct WireWeek {
    timings: Vec<WireTiming>,
}

/// Parse a schedule document into the matching configuration variant.
pub fn parse_schedule_json(raw: &str) -> Result<ScheduleConfig> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| PredictorError::ScheduleParse(format!("malformed schedule JSON: {e}")))?;

    match value {
        Value::Object(_) => {
            let week: WireWeek = serde_json::from_value(value).map_err(|e| {
                PredictorError::ScheduleParse(format!("invalid flat schedule: {e}"))
            })?;
            Ok(ScheduleConfig::Flat(weekly_from_wire(week)?))
        }
        Value::Array(parts) => parse_week_keyed(parts),
        other => Err(PredictorError::ScheduleParse(format!(
            "expected a schedule object or parallel arrays, got {other}"
        ))),
    }
}

fn parse_week_keyed(parts: Vec<Value>) -> Result<ScheduleConfig> {
    if parts.len() != 2 {
        return Err(PredictorError::ScheduleParse(format!(
            "week-keyed schedule must be two parallel arrays, got {} elements",
            parts.len()
        )));
    }
    let dates: Vec<String> = serde_json::from_value(parts[0].clone()).map_err(|e| {
        PredictorError::ScheduleParse(format!("invalid week-start date array: {e}"))
    })?;
    let documents: Vec<String> = serde_json::from_value(parts[1].clone()).map_err(|e| {
        PredictorError::ScheduleParse(format!("invalid per-week schedule array: {e}"))
    })?;
    if dates.len() != documents.len() {
        return Err(PredictorError::ScheduleParse(format!(
            "week-keyed arrays differ in length: {} dates, {} schedules",
            dates.len(),
            documents.len()
        )));
    }

    let mut weeks = BTreeMap::new();
    for (date_str, document) in dates.iter().zip(&documents) {
        let monday = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
            PredictorError::ScheduleParse(format!("invalid week-start date {date_str:?}: {e}"))
        })?;
        if monday.weekday() != Weekday::Mon {
            return Err(PredictorError::ScheduleParse(format!(
                "week-start date {date_str} is not a Monday"
            )));
        }
        let week: WireWeek = serde_json::from_str(document).map_err(|e| {
            PredictorError::ScheduleParse(format!("invalid schedule for week {date_str}: {e}"))
        })?;
        weeks.insert(monday, weekly_from_wire(week)?);
    }

    Ok(ScheduleConfig::WeekKeyed {
        weeks,
        default: WeeklySchedule::standard_hours(),
    })
}

fn weekly_from_wire(wire: WireWeek) -> Result<WeeklySchedule> {
    if wire.timings.len() != 7 {
        return Err(PredictorError::ScheduleParse(format!(
            "schedule must list 7 weekday entries, got {}",
            wire.timings.len()
        )));
    }
    let timings = wire
        .timings
        .into_iter()
        .map(|entry| Timing::new(entry.opening, entry.closing, entry.open))
        .collect::<Result<Vec<_>>>()?;
    let timings: [Timing; 7] = timings
        .try_into()
        .map_err(|_| PredictorError::ScheduleParse("schedule must list 7 weekday entries".into()))?;
    Ok(WeeklySchedule::new(timings))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLAT: &str = r#"{"timings": [
        {"opening": 630, "closing": 2230, "open": true},
        {"opening": 630, "closing": 2230, "open": true},
        {"opening": 630, "closing": 2230, "open": true},
        {"opening": 630, "closing": 2230, "open": true},
        {"opening": 630, "closing": 2230, "open": true},
        {"opening": 800, "closing": 2100, "open": true},
        {"opening": 800, "closing": 2100, "open": false}
    ]}"#;

    #[test]
    fn test_flat_schedule_parses() {
        let config = parse_schedule_json(FLAT).unwrap();
        match config {
            ScheduleConfig::Flat(week) => {
                assert_eq!(week.timing(0).opening(), 630);
                assert_eq!(week.timing(6).closing(), 2100);
                assert!(!week.timing(6).is_open());
            }
            other => panic!("expected flat variant, got {other:?}"),
        }
    }

    #[test]
    fn test_week_keyed_schedule_parses() {
        let raw = format!(r#"[["2024-01-01"], [{}]]"#, serde_json::to_string(FLAT).unwrap());
        let config = parse_schedule_json(&raw).unwrap();
        match config {
            ScheduleConfig::WeekKeyed { weeks, default } => {
                let monday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
                assert!(weeks.contains_key(&monday));
                assert_eq!(default, WeeklySchedule::standard_hours());
            }
            other => panic!("expected week-keyed variant, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_weekday_entries_rejected() {
        let raw = r#"{"timings": [{"opening": 630, "closing": 2230, "open": true}]}"#;
        let err = parse_schedule_json(raw).unwrap_err();
        assert!(matches!(err, PredictorError::ScheduleParse(_)));
    }

    #[test]
    fn test_inverted_window_is_configuration_error() {
        let raw = r#"{"timings": [
            {"opening": 2230, "closing": 630, "open": true},
            {"opening": 630, "closing": 2230, "open": true},
            {"opening": 630, "closing": 2230, "open": true},
            {"opening": 630, "closing": 2230, "open": true},
            {"opening": 630, "closing": 2230, "open": true},
            {"opening": 800, "closing": 2100, "open": true},
            {"opening": 800, "closing": 2100, "open": true}
        ]}"#;
        let err = parse_schedule_json(raw).unwrap_err();
        assert!(matches!(err, PredictorError::Configuration(_)));
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(parse_schedule_json("{not json").is_err());
        assert!(parse_schedule_json("42").is_err());
    }

    #[test]
    fn test_mismatched_parallel_arrays_rejected() {
        let raw = format!(r#"[["2024-01-01", "2024-01-08"], [{}]]"#, serde_json::to_string(FLAT).unwrap());
        let err = parse_schedule_json(&raw).unwrap_err();
        assert!(matches!(err, PredictorError::ScheduleParse(_)));
    }

    #[test]
    fn test_non_monday_week_start_rejected() {
        let raw = format!(r#"[["2024-01-02"], [{}]]"#, serde_json::to_string(FLAT).unwrap());
        let err = parse_schedule_json(&raw).unwrap_err();
        assert!(matches!(err, PredictorError::ScheduleParse(_)));
    }
}
