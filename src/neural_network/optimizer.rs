use super::*;
use ndarray::Zip;

/// Classical momentum update
pub mod momentum;
/// RMSprop update
pub mod rms_prop;

pub use momentum::momentum_delta;
pub use rms_prop::rms_prop_delta;

/// Threshold for switching between sequential and parallel elementwise updates.
/// Tensors with fewer elements than this are updated sequentially.
const OPTIMIZER_PARALLEL_THRESHOLD: usize = 1024;

/// Per-parameter optimizer state.
///
/// Zero-initialized at model construction and mutated only by [`Optimizer::step`].
/// The forward and backward passes never read it.
///
/// # Fields
///
/// - `squared_avg` - Running average of squared gradients (RMSprop)
/// - `velocity` - Running velocity (momentum)
/// - `steps` - Number of updates applied so far
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizerState {
    pub squared_avg: ParameterSet,
    pub velocity: ParameterSet,
    pub steps: u64,
}

impl OptimizerState {
    /// Creates a zeroed state shaped like `params`.
    pub fn new(params: &ParameterSet) -> Self {
        Self {
            squared_avg: params.zeros_like(),
            velocity: params.zeros_like(),
            steps: 0,
        }
    }
}

/// Clamps every gradient element to `[-max_grad_norm, max_grad_norm]`.
///
/// This is an elementwise clamp, not a rescale by the global norm.
pub fn clip_gradients(grads: &Gradients, max_grad_norm: f64) -> Gradients {
    let mut clipped = grads.clone();
    for (_, tensor) in clipped.iter_mut() {
        tensor.mapv_inplace(|g| g.clamp(-max_grad_norm, max_grad_norm));
    }
    clipped
}

/// Clips raw gradients and applies the configured update policy.
///
/// # Example
/// ```rust
/// use rustyforecast::neural_network::*;
///
/// let config = ModelConfig::new(1, 4, 1);
/// let mut params = ParameterSet::initialize(&config).unwrap();
/// let mut state = OptimizerState::new(&params);
/// let optimizer = Optimizer::new(OptimizerConfig::default()).unwrap();
///
/// let grads = params.zeros_like();
/// optimizer.step(&mut params, &grads, &mut state);
/// assert_eq!(state.steps, 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Optimizer {
    config: OptimizerConfig,
}

impl Optimizer {
    /// # Errors
    ///
    /// - `ModelError::ConfigurationError` - If any hyperparameter is out of range
    pub fn new(config: OptimizerConfig) -> Result<Self, ModelError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Computes the parameter deltas for `grads` and advances `state`.
    ///
    /// # Returns
    ///
    /// - `ParameterSet` - Deltas to add to the parameters
    pub fn deltas(&self, grads: &Gradients, state: &mut OptimizerState) -> ParameterSet {
        let clipped = clip_gradients(grads, self.config.max_grad_norm);
        let lr = self.config.learning_rate;
        let mut deltas = clipped.zeros_like();

        match self.config.policy {
            UpdatePolicy::RmsProp { beta, epsilon } => {
                for (((_, delta), (_, grad)), (_, accum)) in deltas
                    .iter_mut()
                    .zip(clipped.iter())
                    .zip(state.squared_avg.iter_mut())
                {
                    *delta = rms_prop_delta(grad, accum, beta, lr, epsilon);
                }
            }
            UpdatePolicy::Momentum { momentum } => {
                for (((_, delta), (_, grad)), (_, velocity)) in deltas
                    .iter_mut()
                    .zip(clipped.iter())
                    .zip(state.velocity.iter_mut())
                {
                    *delta = momentum_delta(grad, velocity, momentum, lr);
                }
            }
        }

        state.steps += 1;
        deltas
    }

    /// Applies one update: `params += deltas(grads)`.
    pub fn step(&self, params: &mut ParameterSet, grads: &Gradients, state: &mut OptimizerState) {
        let deltas = self.deltas(grads, state);
        for ((_, param), (_, delta)) in params.iter_mut().zip(deltas.iter()) {
            if param.len() >= OPTIMIZER_PARALLEL_THRESHOLD {
                Zip::from(param)
                    .and(delta)
                    .par_for_each(|p, &d| *p += d);
            } else {
                *param += delta;
            }
        }
    }
}
