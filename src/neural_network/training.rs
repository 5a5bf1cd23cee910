use super::*;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Threshold for using parallel per-window passes inside a batch.
/// When batch_len * hidden_size < this value, windows are processed sequentially.
const TRAINING_PARALLEL_THRESHOLD: usize = 1024;

/// A window of inputs paired with the value that follows it.
///
/// # Fields
///
/// - `window` - Inputs with shape `(timesteps, input_size)`; row `t` is `x_t`
/// - `target` - Target column with shape `(output_size, 1)`
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSample {
    pub window: Array2<f64>,
    pub target: Column,
}

/// States of the training state machine.
///
/// # Variants
///
/// - `Running` - Epochs are still being processed
/// - `Converged` - Terminal; the final batch's gradient norm fell below the threshold
/// - `Exhausted` - Terminal; the epoch budget (or time budget) was spent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrainingState {
    Running,
    Converged,
    Exhausted,
}

impl TrainingState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TrainingState::Running)
    }
}

/// Summary of a finished training run.
///
/// # Fields
///
/// - `state` - Terminal state reached
/// - `epochs_run` - Number of completed epochs
/// - `batches_per_epoch` - Full batches processed per epoch
/// - `dropped_samples` - Trailing samples that did not fill a batch
/// - `final_gradient_norm` - Sum of per-parameter gradient norms of the last batch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingOutcome {
    pub state: TrainingState,
    pub epochs_run: usize,
    pub batches_per_epoch: usize,
    pub dropped_samples: usize,
    pub final_gradient_norm: f64,
}

/// Mini-batch training with early stopping.
///
/// Each epoch walks the samples in consecutive, non-overlapping batches of
/// `batch_size`; a trailing partial batch is dropped. Every batch runs the
/// forward and backward pass for each of its windows, sums the gradients and
/// applies exactly one optimizer step. Batches are strictly sequential because
/// each step mutates the parameters the next batch reads.
pub struct TrainingLoop {
    optimizer: Optimizer,
    config: TrainingConfig,
}

impl TrainingLoop {
    /// # Errors
    ///
    /// - `ModelError::ConfigurationError` - If either configuration is invalid
    pub fn new(
        optimizer_config: OptimizerConfig,
        config: TrainingConfig,
    ) -> Result<Self, ModelError> {
        config.validate()?;
        Ok(Self {
            optimizer: Optimizer::new(optimizer_config)?,
            config,
        })
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Runs forward and backward passes for one batch.
    ///
    /// # Returns
    ///
    /// - `Result<(f64, Gradients), ModelError>` - Batch MSE and gradients summed over its windows
    pub fn process_batch(
        params: &ParameterSet,
        batch: &[TrainingSample],
    ) -> Result<(f64, Gradients), ModelError> {
        let output_size = params.w_y.nrows();
        let denominator = batch.len() * output_size;

        let per_window = |sample: &TrainingSample| -> Result<(f64, Gradients), ModelError> {
            let forward = SequenceRunner::run(params, sample.window.view(), CacheMode::Cache)?;
            let cache = forward.cache.ok_or_else(|| {
                ModelError::InputValidationError("forward pass produced no cache".to_string())
            })?;
            let squared_error = (&forward.output - &sample.target)
                .mapv(|d| d * d)
                .sum();
            let dy = squared_error_gradient(&forward.output, &sample.target, denominator);
            let grads = BackpropEngine::backward(params, &cache, &dy)?;
            Ok((squared_error, grads))
        };

        // Collected in window order so the reduction below is identical either way
        let use_parallel = batch.len() * params.w_i.nrows() >= TRAINING_PARALLEL_THRESHOLD;
        let partials: Vec<(f64, Gradients)> = if use_parallel {
            batch.par_iter().map(per_window).collect::<Result<Vec<_>, ModelError>>()?
        } else {
            batch.iter().map(per_window).collect::<Result<Vec<_>, ModelError>>()?
        };

        let mut total_squared_error = 0.0;
        let mut grads = params.zeros_like();
        for (squared_error, window_grads) in &partials {
            total_squared_error += squared_error;
            grads.accumulate(window_grads);
        }

        Ok((total_squared_error / denominator as f64, grads))
    }

    /// Trains `params` on `samples`.
    ///
    /// The average batch loss of every completed epoch is appended to `history`.
    /// If a NaN or infinity shows up, the parameters and optimizer state are
    /// restored to their values at the start of the failing epoch before the
    /// error is returned, so only completed epochs affect the model.
    ///
    /// # Errors
    ///
    /// - `ModelError::InsufficientData` - If `samples` cannot fill one batch
    /// - `ModelError::InputValidationError` - If a sample does not fit the parameter shapes
    /// - `ModelError::NumericalInstability` - If a loss, gradient or updated parameter is not finite
    pub fn run(
        &self,
        params: &mut ParameterSet,
        optimizer_state: &mut OptimizerState,
        history: &mut LossHistory,
        samples: &[TrainingSample],
    ) -> Result<TrainingOutcome, ModelError> {
        let batch_size = self.config.batch_size;
        let batches_per_epoch = samples.len() / batch_size;
        if batches_per_epoch == 0 {
            return Err(ModelError::InsufficientData(format!(
                "{} samples cannot fill one batch of size {}",
                samples.len(),
                batch_size
            )));
        }
        validate_samples(params, samples)?;

        let dropped_samples = samples.len() % batch_size;
        if dropped_samples > 0 {
            warn!(
                dropped_samples,
                batch_size, "trailing samples do not fill a batch and are dropped"
            );
        }
        info!(
            samples = samples.len(),
            batch_size,
            batches_per_epoch,
            epochs = self.config.epochs,
            policy = self.optimizer.config().policy.name(),
            "starting LSTM training"
        );

        let progress_bar = if self.config.verbose {
            ProgressBar::new(self.config.epochs as u64)
        } else {
            ProgressBar::hidden()
        };
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} | Loss: {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓░"),
        );

        let time_budget = self.config.time_budget_secs.map(Duration::from_secs);
        let started = Instant::now();
        let mut state = TrainingState::Running;
        let mut epochs_run = 0;
        let mut final_gradient_norm = f64::INFINITY;

        for epoch in 1..=self.config.epochs {
            let params_snapshot = params.clone();
            let optimizer_snapshot = optimizer_state.clone();

            match self.run_epoch(params, optimizer_state, samples, batches_per_epoch) {
                Ok((epoch_loss, gradient_norm)) => {
                    history.push(epoch_loss);
                    epochs_run = epoch;
                    final_gradient_norm = gradient_norm;
                    debug!(epoch, loss = epoch_loss, gradient_norm, "epoch finished");
                    progress_bar.set_message(format!("{:.6}", epoch_loss));
                    progress_bar.inc(1);
                }
                Err(e) => {
                    *params = params_snapshot;
                    *optimizer_state = optimizer_snapshot;
                    progress_bar.abandon_with_message("training aborted");
                    warn!(epoch, error = %e, "training aborted, epoch rolled back");
                    return Err(e);
                }
            }

            if final_gradient_norm < self.config.convergence_threshold {
                state = TrainingState::Converged;
                info!(epoch, gradient_norm = final_gradient_norm, "training converged");
                break;
            }
            if time_budget.is_some_and(|budget| started.elapsed() >= budget) {
                state = TrainingState::Exhausted;
                info!(epoch, "time budget spent");
                break;
            }
        }

        if state == TrainingState::Running {
            state = TrainingState::Exhausted;
            info!(epochs = epochs_run, "epoch budget spent");
        }
        progress_bar.finish_with_message("Training completed");

        Ok(TrainingOutcome {
            state,
            epochs_run,
            batches_per_epoch,
            dropped_samples,
            final_gradient_norm,
        })
    }

    /// Runs every full batch of one epoch.
    ///
    /// # Returns
    ///
    /// - `Result<(f64, f64), ModelError>` - Average batch loss and the final batch's gradient norm
    fn run_epoch(
        &self,
        params: &mut ParameterSet,
        optimizer_state: &mut OptimizerState,
        samples: &[TrainingSample],
        batches_per_epoch: usize,
    ) -> Result<(f64, f64), ModelError> {
        let mut loss_sum = 0.0;
        let mut gradient_norm = 0.0;

        for (index, batch) in samples
            .chunks_exact(self.config.batch_size)
            .enumerate()
        {
            let (loss, grads) = Self::process_batch(params, batch)?;

            if !loss.is_finite() {
                return Err(ModelError::NumericalInstability(format!(
                    "loss of batch {} is {}",
                    index + 1,
                    loss
                )));
            }
            if let Some(kind) = grads.first_non_finite() {
                return Err(ModelError::NumericalInstability(format!(
                    "gradient of {} in batch {} is not finite",
                    kind.name(),
                    index + 1
                )));
            }

            self.optimizer.step(params, &grads, optimizer_state);

            if let Some(kind) = params.first_non_finite() {
                return Err(ModelError::NumericalInstability(format!(
                    "update of batch {} left {} non-finite",
                    index + 1,
                    kind.name()
                )));
            }

            loss_sum += loss;
            if index + 1 == batches_per_epoch {
                gradient_norm = grads.norm_sum();
            }
        }

        let epoch_loss = loss_sum / batches_per_epoch as f64;
        if !epoch_loss.is_finite() {
            return Err(ModelError::NumericalInstability(format!(
                "average epoch loss is {}",
                epoch_loss
            )));
        }
        Ok((epoch_loss, gradient_norm))
    }
}

/// Checks that every sample fits the parameter shapes.
fn validate_samples(params: &ParameterSet, samples: &[TrainingSample]) -> Result<(), ModelError> {
    let input_size = params.input_size()?;
    let output_size = params.w_y.nrows();

    for (index, sample) in samples.iter().enumerate() {
        if sample.window.nrows() == 0 || sample.window.ncols() != input_size {
            return Err(ModelError::InputValidationError(format!(
                "sample {} has window shape {:?}, expected (timesteps >= 1, {})",
                index,
                sample.window.dim(),
                input_size
            )));
        }
        if sample.target.dim() != (output_size, 1) {
            return Err(ModelError::InputValidationError(format!(
                "sample {} has target shape {:?}, expected ({}, 1)",
                index,
                sample.target.dim(),
                output_size
            )));
        }
    }
    Ok(())
}
