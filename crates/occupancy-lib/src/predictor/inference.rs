//! ONNX model inference using tract
//!
//! Loads pretrained occupancy regressors via tract-onnx and runs them
//! row-at-a-time (tabular) or window-at-a-time (sequence). Models are
//! loaded once, read-only; any load or shape failure is fatal.

use std::path::Path;

use tract_onnx::prelude::*;
use tracing::debug;

use super::{SequenceModel, TabularModel};
use crate::error::{PredictorError, Result};
use crate::window::Window;

type TractModel = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

fn invocation_error(context: &str, err: impl std::fmt::Display) -> PredictorError {
    PredictorError::ModelInvocation(format!("{context}: {err}"))
}

/// Tabular occupancy regressor over a 2-D feature matrix, run one row at
/// a time with a fixed `[1, features]` input fact.
#[derive(Debug)]
pub struct OnnxTabularModel {
    model: TractModel,
    num_features: usize,
}

impl OnnxTabularModel {
    pub fn load(path: &Path, num_features: usize) -> Result<Self> {
        let model = tract_onnx::onnx()
            .model_for_path(path)
            .map_err(|e| invocation_error("failed to load ONNX model", e))?
            .with_input_fact(0, f32::fact([1, num_features]).into())
            .map_err(|e| invocation_error("failed to set input shape", e))?
            .into_optimized()
            .map_err(|e| invocation_error("failed to optimize model", e))?
            .into_runnable()
            .map_err(|e| invocation_error("failed to create runnable model", e))?;
        debug!(path = %path.display(), num_features, "loaded tabular model");
        Ok(Self {
            model,
            num_features,
        })
    }
}

impl TabularModel for OnnxTabularModel {
    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<f32>> {
        let mut values = Vec::with_capacity(rows.len());
        for row in rows {
            if row.len() != self.num_features {
                return Err(PredictorError::ModelInvocation(format!(
                    "feature row has {} columns, model expects {}",
                    row.len(),
                    self.num_features
                )));
            }
            let data: Vec<f32> = row.iter().map(|v| *v as f32).collect();
            let input: Tensor = tract_ndarray::Array2::from_shape_vec((1, self.num_features), data)
                .unwrap()
                .into();
            values.push(run_scalar(&self.model, input)?);
        }
        Ok(values)
    }
}

/// Sequence occupancy regressor over a 3-D windowed tensor, run one
/// window at a time with a fixed `[1, length, features]` input fact.
#[derive(Debug)]
pub struct OnnxSequenceModel {
    model: TractModel,
    window_length: usize,
    num_features: usize,
}

impl OnnxSequenceModel {
    pub fn load(path: &Path, window_length: usize, num_features: usize) -> Result<Self> {
        let model = tract_onnx::onnx()
            .model_for_path(path)
            .map_err(|e| invocation_error("failed to load ONNX model", e))?
            .with_input_fact(0, f32::fact([1, window_length, num_features]).into())
            .map_err(|e| invocation_error("failed to set input shape", e))?
            .into_optimized()
            .map_err(|e| invocation_error("failed to optimize model", e))?
            .into_runnable()
            .map_err(|e| invocation_error("failed to create runnable model", e))?;
        debug!(
            path = %path.display(),
            window_length,
            num_features,
            "loaded sequence model"
        );
        Ok(Self {
            model,
            window_length,
            num_features,
        })
    }
}

impl SequenceModel for OnnxSequenceModel {
    fn predict(&self, windows: &[Window<Vec<f64>>]) -> Result<Vec<f32>> {
        let mut values = Vec::with_capacity(windows.len());
        for window in windows {
            if window.rows.len() != self.window_length {
                return Err(PredictorError::ModelInvocation(format!(
                    "window has {} timesteps, model expects {}",
                    window.rows.len(),
                    self.window_length
                )));
            }
            if let Some(row) = window.rows.iter().find(|r| r.len() != self.num_features) {
                return Err(PredictorError::ModelInvocation(format!(
                    "window row has {} features, model expects {}",
                    row.len(),
                    self.num_features
                )));
            }
            let data: Vec<f32> = window
                .rows
                .iter()
                .flat_map(|row| row.iter().map(|v| *v as f32))
                .collect();
            let input: Tensor = tract_ndarray::Array3::from_shape_vec(
                (1, self.window_length, self.num_features),
                data,
            )
            .unwrap()
            .into();
            values.push(run_scalar(&self.model, input)?);
        }
        Ok(values)
    }
}

fn run_scalar(model: &TractModel, input: Tensor) -> Result<f32> {
    let result = model
        .run(tvec!(input.into()))
        .map_err(|e| invocation_error("inference failed", e))?;
    let output = result
        .first()
        .ok_or_else(|| PredictorError::ModelInvocation("model produced no output".into()))?;
    let view = output
        .to_array_view::<f32>()
        .map_err(|e| invocation_error("unexpected output type", e))?;
    view.iter()
        .next()
        .copied()
        .ok_or_else(|| PredictorError::ModelInvocation("model output was empty".into()))
}
