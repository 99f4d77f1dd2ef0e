use ndarray::{Array1, ArrayView1};

use crate::error::{DqnError, Result};

/// Mean squared error `mean((p_i - t_i)^2)` for a single prediction.
pub fn mean_squared_error(predictions: ArrayView1<f32>, targets: ArrayView1<f32>) -> Result<f32> {
    DqnError::check_len("targets", predictions.len(), targets.len())?;
    if predictions.is_empty() {
        return Ok(0.0);
    }
    let diff = &predictions - &targets;
    Ok(diff.mapv(|x| x * x).sum() / predictions.len() as f32)
}

/// Error signal fed into backpropagation: `predictions - targets`.
///
/// The constant factor `2 / n` of the exact MSE gradient is folded into the learning rate.
pub fn output_error(predictions: ArrayView1<f32>, targets: ArrayView1<f32>) -> Result<Array1<f32>> {
    DqnError::check_len("targets", predictions.len(), targets.len())?;
    Ok(&predictions - &targets)
}
