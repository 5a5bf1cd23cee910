use super::*;
use rayon::prelude::*;

/// Number of windows above which predictions are computed in parallel.
const INFERENCE_PARALLEL_THRESHOLD: usize = 64;

/// Forward-only prediction over held-out windows.
///
/// Runs without an activation cache and never touches parameters, optimizer
/// state or loss history, so repeated calls on the same inputs return
/// identical outputs.
pub struct InferenceRunner;

impl InferenceRunner {
    /// Predicts one output column per window, in input order.
    ///
    /// # Parameters
    ///
    /// - `params` - Trained parameters (read only)
    /// - `windows` - Windows with shape `(timesteps, input_size)` each
    ///
    /// # Returns
    ///
    /// - `Result<Vec<Column>, ModelError>` - One `(output_size, 1)` column per window
    ///
    /// # Errors
    ///
    /// - `ModelError::InputValidationError` - If any window is empty or has the wrong width
    pub fn predict(
        params: &ParameterSet,
        windows: &[Array2<f64>],
    ) -> Result<Vec<Column>, ModelError> {
        let run_one = |window: &Array2<f64>| {
            SequenceRunner::run(params, window.view(), CacheMode::NoCache).map(|out| out.output)
        };

        if windows.len() >= INFERENCE_PARALLEL_THRESHOLD {
            windows.par_iter().map(run_one).collect()
        } else {
            windows.iter().map(run_one).collect()
        }
    }

    /// Same as [`InferenceRunner::predict`] for single-output models, flattened to scalars.
    ///
    /// # Errors
    ///
    /// - `ModelError::InputValidationError` - If the model has more than one output
    ///   or a window does not fit it
    pub fn predict_scalar(
        params: &ParameterSet,
        windows: &[Array2<f64>],
    ) -> Result<Vec<f64>, ModelError> {
        if params.w_y.nrows() != 1 {
            return Err(ModelError::InputValidationError(format!(
                "scalar prediction needs output_size 1, model has {}",
                params.w_y.nrows()
            )));
        }
        Ok(Self::predict(params, windows)?
            .into_iter()
            .map(|column| column[[0, 0]])
            .collect())
    }
}
