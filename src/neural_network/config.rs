use super::input_validation_function::{
    validate_dimension_greater_than_zero, validate_learning_rate, validate_momentum,
    validate_open_unit_interval, validate_positive_finite,
};
use super::*;

/// Shape and initialization settings of a model.
///
/// # Fields
///
/// - `input_size` - Number of features per time step
/// - `hidden_size` - Number of LSTM units
/// - `output_size` - Number of regression outputs
/// - `seed` - Seed for the deterministic weight initialization
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub input_size: usize,
    pub hidden_size: usize,
    pub output_size: usize,
    pub seed: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            input_size: 1,
            hidden_size: 30,
            output_size: 1,
            seed: 42,
        }
    }
}

impl ModelConfig {
    pub fn new(input_size: usize, hidden_size: usize, output_size: usize) -> Self {
        Self {
            input_size,
            hidden_size,
            output_size,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Width of the concatenated `[x_t; h_{t-1}]` vector.
    ///
    /// Saturates on overflow; [`ModelConfig::validate`] rejects such sizes.
    pub fn combined_size(&self) -> usize {
        self.input_size.saturating_add(self.hidden_size)
    }

    /// # Errors
    ///
    /// - `ModelError::ConfigurationError` - If any size is 0 or `input_size + hidden_size` overflows
    pub fn validate(&self) -> Result<(), ModelError> {
        validate_dimension_greater_than_zero(self.input_size, "input_size")?;
        validate_dimension_greater_than_zero(self.hidden_size, "hidden_size")?;
        validate_dimension_greater_than_zero(self.output_size, "output_size")?;
        if self.input_size.checked_add(self.hidden_size).is_none() {
            return Err(ModelError::ConfigurationError(format!(
                "input_size {} + hidden_size {} overflows",
                self.input_size, self.hidden_size
            )));
        }
        Ok(())
    }
}

/// Parameter update rule applied after clipping.
///
/// # Variants
///
/// - `RmsProp` - Moving average of squared gradients scales each parameter's step
/// - `Momentum` - Classical momentum; `momentum = 0` is plain SGD
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum UpdatePolicy {
    RmsProp { beta: f64, epsilon: f64 },
    Momentum { momentum: f64 },
}

impl Default for UpdatePolicy {
    fn default() -> Self {
        UpdatePolicy::RmsProp {
            beta: 0.9,
            epsilon: 1e-8,
        }
    }
}

impl UpdatePolicy {
    pub fn name(&self) -> &'static str {
        match self {
            UpdatePolicy::RmsProp { .. } => "RMSprop",
            UpdatePolicy::Momentum { .. } => "Momentum",
        }
    }
}

/// Optimizer hyperparameters.
///
/// # Fields
///
/// - `learning_rate` - Step size
/// - `max_grad_norm` - Every gradient element is clamped to `[-max_grad_norm, max_grad_norm]`
/// - `policy` - Update rule applied to the clipped gradients
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    pub learning_rate: f64,
    pub max_grad_norm: f64,
    pub policy: UpdatePolicy,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.0014,
            max_grad_norm: 5.0,
            policy: UpdatePolicy::default(),
        }
    }
}

impl OptimizerConfig {
    pub fn new(learning_rate: f64) -> Self {
        Self {
            learning_rate,
            ..Self::default()
        }
    }

    pub fn with_max_grad_norm(mut self, max_grad_norm: f64) -> Self {
        self.max_grad_norm = max_grad_norm;
        self
    }

    pub fn with_policy(mut self, policy: UpdatePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// # Errors
    ///
    /// - `ModelError::ConfigurationError` - If any hyperparameter is out of range
    pub fn validate(&self) -> Result<(), ModelError> {
        validate_learning_rate(self.learning_rate)?;
        validate_positive_finite(self.max_grad_norm, "max_grad_norm")?;
        match self.policy {
            UpdatePolicy::RmsProp { beta, epsilon } => {
                validate_open_unit_interval(beta, "beta")?;
                validate_positive_finite(epsilon, "epsilon")?;
            }
            UpdatePolicy::Momentum { momentum } => validate_momentum(momentum)?,
        }
        Ok(())
    }
}

/// Training-loop settings.
///
/// # Fields
///
/// - `epochs` - Epoch budget
/// - `batch_size` - Samples per mini-batch; a trailing partial batch is dropped
/// - `convergence_threshold` - Gradient-norm threshold for early stopping
/// - `time_budget_secs` - Optional wall-clock budget, checked between epochs only
/// - `verbose` - Draws an epoch progress bar when true
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub epochs: usize,
    pub batch_size: usize,
    pub convergence_threshold: f64,
    pub time_budget_secs: Option<u64>,
    pub verbose: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            epochs: 20,
            batch_size: 15,
            convergence_threshold: 1e-4,
            time_budget_secs: None,
            verbose: false,
        }
    }
}

impl TrainingConfig {
    pub fn new(epochs: usize, batch_size: usize) -> Self {
        Self {
            epochs,
            batch_size,
            ..Self::default()
        }
    }

    pub fn with_convergence_threshold(mut self, threshold: f64) -> Self {
        self.convergence_threshold = threshold;
        self
    }

    pub fn with_time_budget_secs(mut self, secs: u64) -> Self {
        self.time_budget_secs = Some(secs);
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// # Errors
    ///
    /// - `ModelError::ConfigurationError` - If `epochs` or `batch_size` is 0, or the threshold is negative
    pub fn validate(&self) -> Result<(), ModelError> {
        validate_dimension_greater_than_zero(self.epochs, "epochs")?;
        validate_dimension_greater_than_zero(self.batch_size, "batch_size")?;
        if !(self.convergence_threshold >= 0.0 && self.convergence_threshold.is_finite()) {
            return Err(ModelError::ConfigurationError(format!(
                "convergence_threshold must be non-negative and finite, got {}",
                self.convergence_threshold
            )));
        }
        Ok(())
    }
}
