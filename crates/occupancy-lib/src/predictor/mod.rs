//! Occupancy model inference boundary
//!
//! The core treats the trained model as an opaque, side-effect-free
//! function from a feature matrix (tabular) or windowed tensor (sequence)
//! to one scalar per row or window.

mod inference;
mod output;

pub use inference::{OnnxSequenceModel, OnnxTabularModel};
pub use output::{write_csv, OutputScale, TIMESTAMP_FORMAT};

use crate::error::Result;
use crate::window::Window;

/// Tabular regressor: one prediction per feature row.
pub trait TabularModel {
    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<f32>>;
}

/// Sequence regressor: one prediction per feature window.
pub trait SequenceModel {
    fn predict(&self, windows: &[Window<Vec<f64>>]) -> Result<Vec<f32>>;
}
