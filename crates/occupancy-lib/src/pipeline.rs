//! Batch prediction pipelines
//!
//! Orchestrates timestamp generation, feature synthesis, model inference
//! and output post-processing for the two prediction paths: tabular
//! (feature matrix, one row per timestamp) and sequence (windowed tensor,
//! one window per timestamp under tail padding).

use chrono::{NaiveDate, NaiveDateTime};
use tracing::info;

use crate::error::{PredictorError, Result};
use crate::features::{self, CyclicalFeatures};
use crate::models::PredictionPoint;
use crate::predictor::{OutputScale, SequenceModel, TabularModel};
use crate::schedule::{ScheduleClock, TermCalendar};
use crate::series::TimestampRange;
use crate::window::{build_windows, TailPolicy};

/// Column order of the tabular feature matrix. This is the order the
/// models were trained on and is a contract, not a convenience; the
/// term column is present only when a calendar is configured.
pub const TABULAR_COLUMNS: [&str; 9] = [
    "day_sin",
    "day_cos",
    "month_sin",
    "month_cos",
    "day_of_year_sin",
    "day_of_year_cos",
    "day_progress",
    "schedule",
    "is_non_term_time",
];

pub const DEFAULT_TABULAR_STEP_MINUTES: u32 = 5;
pub const DEFAULT_SEQUENCE_STEP_MINUTES: u32 = 1;
pub const DEFAULT_WINDOW_LENGTH: usize = 48;

/// Tabular path: per-timestamp feature rows fed to a tabular regressor.
pub struct TabularPipeline {
    clock: ScheduleClock,
    calendar: Option<TermCalendar>,
    step_minutes: u32,
    scale: OutputScale,
}

impl TabularPipeline {
    pub fn new(clock: ScheduleClock) -> Self {
        Self {
            clock,
            calendar: None,
            step_minutes: DEFAULT_TABULAR_STEP_MINUTES,
            scale: OutputScale::Unit,
        }
    }

    /// Append the term-time column computed from `calendar`.
    pub fn with_calendar(mut self, calendar: TermCalendar) -> Self {
        self.calendar = Some(calendar);
        self
    }

    pub fn with_step_minutes(mut self, step_minutes: u32) -> Self {
        self.step_minutes = step_minutes;
        self
    }

    pub fn with_scale(mut self, scale: OutputScale) -> Self {
        self.scale = scale;
        self
    }

    /// Width of the feature rows this pipeline produces; the loaded model
    /// must expect the same.
    pub fn feature_width(&self) -> usize {
        if self.calendar.is_some() {
            TABULAR_COLUMNS.len()
        } else {
            TABULAR_COLUMNS.len() - 1
        }
    }

    pub fn run(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
        model: &dyn TabularModel,
    ) -> Result<Vec<PredictionPoint>> {
        let timestamps: Vec<NaiveDateTime> =
            TimestampRange::new(from, to, self.step_minutes)?.collect();
        info!(
            count = timestamps.len(),
            step_minutes = self.step_minutes,
            "generated timestamp series"
        );

        let rows: Vec<Vec<f64>> = timestamps.iter().map(|&at| self.feature_row(at)).collect();
        let values = model.predict(&rows)?;
        if values.len() != timestamps.len() {
            return Err(PredictorError::ModelInvocation(format!(
                "model returned {} predictions for {} rows",
                values.len(),
                timestamps.len()
            )));
        }

        Ok(timestamps
            .into_iter()
            .zip(values)
            .map(|(timestamp, raw)| PredictionPoint {
                timestamp,
                occupancy: self.scale.apply(raw),
            })
            .collect())
    }

    fn feature_row(&self, at: NaiveDateTime) -> Vec<f64> {
        let encoded = CyclicalFeatures::encode(at);
        let mut row = vec![
            encoded.day_sin,
            encoded.day_cos,
            encoded.month_sin,
            encoded.month_cos,
            encoded.day_of_year_sin,
            encoded.day_of_year_cos,
            encoded.day_progress,
            self.clock.progress(at),
        ];
        if let Some(calendar) = &self.calendar {
            row.push(f64::from(calendar.is_non_term(at.date())));
        }
        row
    }
}

/// Sequence path: one day's open window resampled into fixed-length
/// feature windows fed to a sequence regressor.
pub struct SequencePipeline {
    window_length: usize,
    step_minutes: u32,
    tail_policy: TailPolicy,
    scale: OutputScale,
}

impl Default for SequencePipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl SequencePipeline {
    pub fn new() -> Self {
        Self {
            window_length: DEFAULT_WINDOW_LENGTH,
            step_minutes: DEFAULT_SEQUENCE_STEP_MINUTES,
            tail_policy: TailPolicy::TailPad,
            scale: OutputScale::Unit,
        }
    }

    pub fn with_window_length(mut self, window_length: usize) -> Self {
        self.window_length = window_length;
        self
    }

    pub fn with_step_minutes(mut self, step_minutes: u32) -> Self {
        self.step_minutes = step_minutes;
        self
    }

    pub fn with_tail_policy(mut self, tail_policy: TailPolicy) -> Self {
        self.tail_policy = tail_policy;
        self
    }

    pub fn with_scale(mut self, scale: OutputScale) -> Self {
        self.scale = scale;
        self
    }

    pub fn window_length(&self) -> usize {
        self.window_length
    }

    /// Predict across one day's open window. `opening` and `closing` are
    /// HHMM-encoded times on `date`.
    ///
    /// Pairing follows the tail policy: tail-pad yields one prediction
    /// per generated timestamp (near-end timestamps share the repeated
    /// tail window's prediction), strict-drop yields one per window
    /// paired with its anchor timestamp.
    pub fn run(
        &self,
        date: NaiveDate,
        opening: u16,
        closing: u16,
        model: &dyn SequenceModel,
    ) -> Result<Vec<PredictionPoint>> {
        let opening_at = hhmm_on(date, opening)?;
        let closing_at = hhmm_on(date, closing)?;
        if closing_at <= opening_at {
            return Err(PredictorError::Configuration(format!(
                "closing time {closing:04} must be after opening time {opening:04}"
            )));
        }

        let timestamps: Vec<NaiveDateTime> =
            TimestampRange::new(opening_at, closing_at, self.step_minutes)?.collect();
        if self.tail_policy == TailPolicy::TailPad && timestamps.len() < self.window_length {
            // The windower would emit shorter-than-length windows here,
            // which the fixed-shape sequence model cannot accept.
            return Err(PredictorError::Configuration(format!(
                "open window yields {} timesteps, fewer than the window length {}",
                timestamps.len(),
                self.window_length
            )));
        }

        let seasonal = features::seasonal_position(date);
        let rows: Vec<Vec<f64>> = timestamps
            .iter()
            .map(|&at| {
                vec![
                    features::open_window_progress(at, opening_at, closing_at),
                    seasonal,
                ]
            })
            .collect();

        let windows = build_windows(&rows, self.window_length, self.tail_policy)?;
        info!(
            timesteps = timestamps.len(),
            windows = windows.len(),
            window_length = self.window_length,
            "built sequence windows"
        );
        let values = model.predict(&windows)?;
        if values.len() != windows.len() {
            return Err(PredictorError::ModelInvocation(format!(
                "model returned {} predictions for {} windows",
                values.len(),
                windows.len()
            )));
        }

        let points = match self.tail_policy {
            TailPolicy::TailPad => timestamps
                .iter()
                .zip(&values)
                .map(|(&timestamp, &raw)| PredictionPoint {
                    timestamp,
                    occupancy: self.scale.apply(raw),
                })
                .collect(),
            TailPolicy::StrictDrop => windows
                .iter()
                .zip(&values)
                .map(|(window, &raw)| PredictionPoint {
                    timestamp: timestamps[window.anchor],
                    occupancy: self.scale.apply(raw),
                })
                .collect(),
        };
        Ok(points)
    }
}

fn hhmm_on(date: NaiveDate, hhmm: u16) -> Result<NaiveDateTime> {
    let hour = u32::from(hhmm / 100);
    let minute = u32::from(hhmm % 100);
    date.and_hms_opt(hour, minute, 0).ok_or_else(|| {
        PredictorError::Configuration(format!("{hhmm:04} is not a valid HHMM time"))
    })
}
