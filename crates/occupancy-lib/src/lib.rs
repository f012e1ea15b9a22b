//! Core library for the facility occupancy predictor
//!
//! This crate provides the functionality for:
//! - Opening-hours schedule modeling and open-period progress
//! - Cyclical date/time feature encoding
//! - Term-time calendar classification
//! - Fixed-interval timestamp series and sequence windowing
//! - ONNX model inference and CSV output

pub mod error;
pub mod features;
pub mod models;
pub mod pipeline;
pub mod predictor;
pub mod schedule;
pub mod series;
pub mod window;

pub use error::{PredictorError, Result};
pub use models::*;
