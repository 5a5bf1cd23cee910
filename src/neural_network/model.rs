use super::serialize_model::SerializableModel;
use super::*;
use crate::error::IoError;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// A recurrent sequence-regression model.
///
/// Owns one [`ParameterSet`], its [`OptimizerState`] and the [`LossHistory`] of
/// the most recent training run. Nothing is shared between instances, so
/// separate models can be trained concurrently.
///
/// # Example
/// ```rust
/// use ndarray::Array2;
/// use rustyforecast::neural_network::*;
///
/// let config = ModelConfig::new(1, 8, 1);
/// let mut model = LSTMModel::new(config, OptimizerConfig::default()).unwrap();
///
/// let samples: Vec<TrainingSample> = (0..20)
///     .map(|i| TrainingSample {
///         window: Array2::from_elem((3, 1), i as f64 * 0.05),
///         target: Array2::from_elem((1, 1), i as f64 * 0.05),
///     })
///     .collect();
///
/// let outcome = model.fit(&samples, &TrainingConfig::new(3, 5)).unwrap();
/// assert_eq!(outcome.batches_per_epoch, 4);
///
/// let predictions = model.predict(&[samples[0].window.clone()]).unwrap();
/// assert_eq!(predictions[0].dim(), (1, 1));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LSTMModel {
    config: ModelConfig,
    optimizer_config: OptimizerConfig,
    params: ParameterSet,
    optimizer_state: OptimizerState,
    loss_history: LossHistory,
}

impl LSTMModel {
    /// Creates a model with seeded Xavier-uniform weights and zeroed optimizer state.
    ///
    /// # Errors
    ///
    /// - `ModelError::ConfigurationError` - If either configuration is invalid
    pub fn new(config: ModelConfig, optimizer_config: OptimizerConfig) -> Result<Self, ModelError> {
        let params = ParameterSet::initialize(&config)?;
        Self::from_parameters(config, optimizer_config, params)
    }

    /// Creates a model around explicit parameters.
    ///
    /// # Errors
    ///
    /// - `ModelError::ConfigurationError` - If either configuration is invalid
    /// - `ModelError::InputValidationError` - If a tensor does not match `config`
    pub fn from_parameters(
        config: ModelConfig,
        optimizer_config: OptimizerConfig,
        params: ParameterSet,
    ) -> Result<Self, ModelError> {
        let optimizer_state = OptimizerState::new(&params);
        Self::from_parts(
            config,
            optimizer_config,
            params,
            optimizer_state,
            LossHistory::new(),
        )
    }

    pub(crate) fn from_parts(
        config: ModelConfig,
        optimizer_config: OptimizerConfig,
        params: ParameterSet,
        optimizer_state: OptimizerState,
        loss_history: LossHistory,
    ) -> Result<Self, ModelError> {
        optimizer_config.validate()?;
        check_shapes(&config, &params)?;
        check_shapes(&config, &optimizer_state.squared_avg)?;
        check_shapes(&config, &optimizer_state.velocity)?;

        Ok(Self {
            config,
            optimizer_config,
            params,
            optimizer_state,
            loss_history,
        })
    }

    /// Trains the model on `samples`.
    ///
    /// The loss history is replaced by this run's history once at least one
    /// epoch completes; a call rejected before that leaves the model as it was.
    /// Optimizer state carries over, so calling `fit` again continues from
    /// where the last run stopped.
    ///
    /// # Errors
    ///
    /// - `ModelError::ConfigurationError` - If `training` is invalid
    /// - `ModelError::InsufficientData` - If `samples` cannot fill one batch
    /// - `ModelError::InputValidationError` - If a sample does not fit the model
    /// - `ModelError::NumericalInstability` - If training diverges; completed epochs are kept
    pub fn fit(
        &mut self,
        samples: &[TrainingSample],
        training: &TrainingConfig,
    ) -> Result<TrainingOutcome, ModelError> {
        let training_loop = TrainingLoop::new(self.optimizer_config, *training)?;
        let mut history = LossHistory::new();
        let result = training_loop.run(
            &mut self.params,
            &mut self.optimizer_state,
            &mut history,
            samples,
        );

        // Parameters only move when an epoch completes; the history follows them
        if !history.is_empty() {
            self.loss_history = history;
        }
        result
    }

    /// Predicts one `(output_size, 1)` column per window without touching model state.
    pub fn predict(&self, windows: &[Array2<f64>]) -> Result<Vec<Column>, ModelError> {
        InferenceRunner::predict(&self.params, windows)
    }

    /// Predicts one scalar per window for single-output models.
    pub fn predict_scalar(&self, windows: &[Array2<f64>]) -> Result<Vec<f64>, ModelError> {
        InferenceRunner::predict_scalar(&self.params, windows)
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn optimizer_config(&self) -> &OptimizerConfig {
        &self.optimizer_config
    }

    pub fn parameters(&self) -> &ParameterSet {
        &self.params
    }

    pub fn optimizer_state(&self) -> &OptimizerState {
        &self.optimizer_state
    }

    pub fn loss_history(&self) -> &LossHistory {
        &self.loss_history
    }

    /// Serializes the full model state to a JSON string.
    pub fn to_json_string(&self) -> Result<String, IoError> {
        Ok(serde_json::to_string(&SerializableModel::from_model(self))?)
    }

    /// Restores a model from a string produced by [`LSTMModel::to_json_string`].
    ///
    /// # Errors
    ///
    /// - `IoError::JsonError` - Malformed JSON
    /// - `IoError::ModelStructureMismatch` - Tensors do not match the stored configuration
    pub fn from_json_str(json: &str) -> Result<Self, IoError> {
        let bundle: SerializableModel = serde_json::from_str(json)?;
        bundle.into_model()
    }

    /// Saves parameters, optimizer state, hyperparameters and loss history to `path`.
    ///
    /// The bundle is written to a uniquely named temporary file in the same
    /// directory, synced, and then renamed over `path`, so readers see either
    /// the old file or one complete new one, even when several saves race.
    ///
    /// # Errors
    ///
    /// - `IoError::StdIoError` - File creation, write or rename failed
    /// - `IoError::JsonError` - Serialization failed
    pub fn save_to_path(&self, path: &str) -> Result<(), IoError> {
        let bundle = SerializableModel::from_model(self);
        let target = Path::new(path);
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        // Dropped (and removed) on any early return
        let mut temp_file = NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(temp_file.as_file_mut());
            serde_json::to_writer_pretty(&mut writer, &bundle)?;
            writer.flush()?;
        }
        temp_file.as_file().sync_all()?;
        temp_file.persist(target).map_err(|e| e.error)?;
        Ok(())
    }

    /// Loads a model saved with [`LSTMModel::save_to_path`].
    ///
    /// # Errors
    ///
    /// - `IoError::StdIoError` - File not found or read failed
    /// - `IoError::JsonError` - Malformed JSON
    /// - `IoError::ModelStructureMismatch` - Tensors do not match the stored configuration
    pub fn load_from_path(path: &str) -> Result<Self, IoError> {
        let reader = IoError::load_in_buf_reader(path)?;
        let bundle: SerializableModel = serde_json::from_reader(reader)?;
        bundle.into_model()
    }
}

fn check_shapes(config: &ModelConfig, set: &ParameterSet) -> Result<(), ModelError> {
    config.validate()?;
    for (kind, tensor) in set.iter() {
        let expected = kind.shape(config);
        if tensor.dim() != expected {
            return Err(ModelError::InputValidationError(format!(
                "{} must have shape {:?}, got {:?}",
                kind.name(),
                expected,
                tensor.dim()
            )));
        }
    }
    Ok(())
}
