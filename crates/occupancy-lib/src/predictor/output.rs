//! Prediction post-processing and output writing
//!
//! Raw model outputs are clipped to [0, 1], optionally rescaled to a
//! percentage, and written as header-less `timestamp,value` CSV lines.

use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::models::PredictionPoint;

/// Timestamp format used in the output file.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Output range for clipped predictions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputScale {
    /// Raw model range, [0, 1].
    #[default]
    Unit,
    /// Percentage occupancy, [0, 100].
    Percent,
}

impl OutputScale {
    /// Clip a raw model output to [0, 1] and apply the scale.
    pub fn apply(self, raw: f32) -> f64 {
        let clipped = f64::from(raw).clamp(0.0, 1.0);
        match self {
            OutputScale::Unit => clipped,
            OutputScale::Percent => clipped * 100.0,
        }
    }
}

/// Write prediction points as `timestamp,value` lines, no header.
pub fn write_csv(path: &Path, points: &[PredictionPoint]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    for point in points {
        writer.write_record([
            point.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            point.occupancy.to_string(),
        ])?;
    }
    writer.flush()?;
    info!(count = points.len(), path = %path.display(), "wrote predictions");
    Ok(())
}
