use super::*;
use ndarray::ArrayView2;

/// Whether a forward pass keeps the per-step activations.
///
/// # Variants
///
/// - `Cache` - Training mode: every step is recorded for the backward pass
/// - `NoCache` - Inference mode: only the final output and hidden state are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheMode {
    Cache,
    NoCache,
}

/// Per-step activations of one forward pass over one window.
///
/// Built in chronological order and consumed in reverse by exactly one
/// backward pass. Indexing is by time step.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivationCache {
    steps: Vec<StepRecord>,
}

impl ActivationCache {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            steps: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step(&self, t: usize) -> Option<&StepRecord> {
        self.steps.get(t)
    }

    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    /// Final step of the window.
    pub fn last(&self) -> Option<&StepRecord> {
        self.steps.last()
    }
}

/// Result of running a window through the network.
///
/// # Fields
///
/// - `output` - `y = W_y · h_W + b_y` with shape `(output_size, 1)`
/// - `hidden` - Final hidden state `h_W`
/// - `cache` - Per-step activations, present only in [`CacheMode::Cache`]
#[derive(Debug, Clone)]
pub struct SequenceOutput {
    pub output: Column,
    pub hidden: Column,
    pub cache: Option<ActivationCache>,
}

/// Drives [`LSTMCell`] across a fixed-length window starting from `h_0 = c_0 = 0`.
pub struct SequenceRunner;

impl SequenceRunner {
    /// Runs one window.
    ///
    /// # Parameters
    ///
    /// - `params` - Model parameters (read only)
    /// - `window` - Window with shape `(timesteps, input_size)`; row `t` is `x_t`
    /// - `mode` - Whether to keep the activation cache
    ///
    /// # Returns
    ///
    /// - `Result<SequenceOutput, ModelError>` - Output, final hidden state and optional cache
    ///
    /// # Errors
    ///
    /// - `ModelError::InputValidationError` - If the window is empty or its width is not `input_size`
    pub fn run(
        params: &ParameterSet,
        window: ArrayView2<f64>,
        mode: CacheMode,
    ) -> Result<SequenceOutput, ModelError> {
        let hidden_size = params.w_i.nrows();
        let input_size = params.input_size()?;
        let (timesteps, features) = window.dim();

        if timesteps == 0 {
            return Err(ModelError::InputValidationError(
                "window must contain at least one time step".to_string(),
            ));
        }
        if features != input_size {
            return Err(ModelError::InputValidationError(format!(
                "window has {} features per step but the model expects {}",
                features, input_size
            )));
        }

        let mut h_prev = Column::zeros((hidden_size, 1));
        let mut c_prev = Column::zeros((hidden_size, 1));
        let mut cache = match mode {
            CacheMode::Cache => Some(ActivationCache::with_capacity(timesteps)),
            CacheMode::NoCache => None,
        };

        for x_row in window.rows() {
            let x_t = x_row.to_owned().insert_axis(ndarray::Axis(1));
            let record = LSTMCell::forward(params, &x_t, &h_prev, &c_prev)?;

            h_prev = record.hidden.clone();
            c_prev = record.cell.clone();

            if let Some(cache) = cache.as_mut() {
                cache.steps.push(record);
            }
        }

        let output = LSTMCell::project(params, &h_prev);

        Ok(SequenceOutput {
            output,
            hidden: h_prev,
            cache,
        })
    }
}
