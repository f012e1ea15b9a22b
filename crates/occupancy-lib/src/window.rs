//! Fixed-length sliding-window sequence building
//!
//! Reshapes a per-timestamp feature stream into the contiguous windows a
//! sequence model consumes. Two tail policies exist and stay distinct:
//! strict-drop discards the trailing positions that lack a full look-ahead
//! window, tail-pad repeats the final window so every input timestamp gets
//! a prediction.

use crate::error::{PredictorError, Result};

/// End-of-stream policy for window construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TailPolicy {
    /// Emit windows only for start indices with a full window and target
    /// ahead of them: `max(0, N - length)` windows. A series no longer
    /// than `length` yields zero windows, silently.
    StrictDrop,
    /// Emit one window per input index, repeating the final `length`
    /// elements for every near-end index: exactly `N` windows.
    TailPad,
}

/// A contiguous feature slice plus the index of the position it predicts.
/// For tail-padded windows past the end, the anchor is the series' last
/// index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window<T> {
    pub rows: Vec<T>,
    pub anchor: usize,
}

/// Build fixed-length windows over `rows` under the given tail policy.
///
/// In tail-pad mode a series shorter than `length` produces windows equal
/// to the whole series; callers that need the full `length` shape must
/// reject those before use.
pub fn build_windows<T: Clone>(
    rows: &[T],
    length: usize,
    policy: TailPolicy,
) -> Result<Vec<Window<T>>> {
    if length == 0 {
        return Err(PredictorError::Configuration(
            "window length must be at least 1".into(),
        ));
    }

    let n = rows.len();
    let mut windows = Vec::new();
    match policy {
        TailPolicy::StrictDrop => {
            for start in 0..n.saturating_sub(length) {
                windows.push(Window {
                    rows: rows[start..start + length].to_vec(),
                    anchor: start + length,
                });
            }
        }
        TailPolicy::TailPad => {
            for start in 0..n {
                if start + length < n {
                    windows.push(Window {
                        rows: rows[start..start + length].to_vec(),
                        anchor: start + length,
                    });
                } else {
                    windows.push(Window {
                        rows: rows[n.saturating_sub(length)..].to_vec(),
                        anchor: n - 1,
                    });
                }
            }
        }
    }
    Ok(windows)
}
