use crate::error::{IoError, ModelError};
use crate::metric::{MapePolicy, RegressionMetrics};
use crate::neural_network::{
    LSTMModel, LossHistory, ModelConfig, OptimizerConfig, TrainingConfig, TrainingOutcome,
};
use crate::traits::{Scaler, SeriesProvider};
use crate::utility::{MinMaxScaler, chronological_split, last_window, make_windows, take_last};
use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Settings of one end-to-end forecast run.
///
/// The defaults train a 30-unit model on windows of 6 observations from the
/// last 1000 points of a series, with an 80/20 chronological split and
/// 20 epochs of batch 15 at learning rate 0.0014.
///
/// # Fields
///
/// - `window_size` - Observations per input window
/// - `train_ratio` - Share of windows used for training, in `(0, 1)`
/// - `max_observations` - Only the most recent observations are kept when set
/// - `mape_policy` - Handling of zero actual values in MAPE
/// - `model` - Network dimensions and seed; input and output size must be 1
/// - `optimizer` - Optimizer hyperparameters
/// - `training` - Epochs, batch size and stopping rules
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub window_size: usize,
    pub train_ratio: f64,
    pub max_observations: Option<usize>,
    pub mape_policy: MapePolicy,
    pub model: ModelConfig,
    pub optimizer: OptimizerConfig,
    pub training: TrainingConfig,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            window_size: 6,
            train_ratio: 0.8,
            max_observations: Some(1000),
            mape_policy: MapePolicy::default(),
            model: ModelConfig::default(),
            optimizer: OptimizerConfig::default(),
            training: TrainingConfig::default(),
        }
    }
}

impl ForecastConfig {
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    pub fn with_train_ratio(mut self, train_ratio: f64) -> Self {
        self.train_ratio = train_ratio;
        self
    }

    pub fn with_max_observations(mut self, max_observations: Option<usize>) -> Self {
        self.max_observations = max_observations;
        self
    }

    pub fn with_mape_policy(mut self, policy: MapePolicy) -> Self {
        self.mape_policy = policy;
        self
    }

    pub fn with_model(mut self, model: ModelConfig) -> Self {
        self.model = model;
        self
    }

    pub fn with_optimizer(mut self, optimizer: OptimizerConfig) -> Self {
        self.optimizer = optimizer;
        self
    }

    pub fn with_training(mut self, training: TrainingConfig) -> Self {
        self.training = training;
        self
    }

    /// Parses a JSON configuration; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, IoError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a JSON configuration file; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// - `IoError::StdIoError` - File not found or read failed
    /// - `IoError::JsonError` - Malformed JSON
    pub fn from_json_path(path: &str) -> Result<Self, IoError> {
        let reader = IoError::load_in_buf_reader(path)?;
        Ok(serde_json::from_reader(reader)?)
    }

    /// # Errors
    ///
    /// - `ModelError::ConfigurationError` - If any setting is out of range
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.window_size == 0 {
            return Err(ModelError::ConfigurationError(
                "window_size must be greater than 0".to_string(),
            ));
        }
        if !(self.train_ratio > 0.0 && self.train_ratio < 1.0) {
            return Err(ModelError::ConfigurationError(format!(
                "train_ratio must be between 0 and 1 (exclusive), got {}",
                self.train_ratio
            )));
        }
        if self.max_observations == Some(0) {
            return Err(ModelError::ConfigurationError(
                "max_observations must be greater than 0 when set".to_string(),
            ));
        }
        self.model.validate()?;
        if self.model.input_size != 1 || self.model.output_size != 1 {
            return Err(ModelError::ConfigurationError(format!(
                "a univariate forecast needs input_size 1 and output_size 1, got {} and {}",
                self.model.input_size, self.model.output_size
            )));
        }
        self.optimizer.validate()?;
        self.training.validate()
    }
}

/// Result of one forecast run, in the units of the original series.
///
/// # Fields
///
/// - `predictions` - One prediction per test window, chronological
/// - `actual` - The observed values the predictions target
/// - `metrics` - MSE, RMSE and MAPE of `predictions` against `actual`
/// - `next_value` - Prediction for the observation after the end of the series
/// - `loss_history` - Per-epoch training losses
/// - `outcome` - How training ended
/// - `model` - The trained model, ready to be saved or reused
#[derive(Debug, Clone)]
pub struct ForecastReport {
    pub predictions: Vec<f64>,
    pub actual: Vec<f64>,
    pub metrics: RegressionMetrics,
    pub next_value: f64,
    pub loss_history: LossHistory,
    pub outcome: TrainingOutcome,
    pub model: LSTMModel,
}

/// Loads `name` from `provider` and runs [`run_forecast_on_series`] on it.
///
/// # Errors
///
/// - `ModelError::NotFound` - If the provider has no such series
/// - Any error of [`run_forecast_on_series`]
pub fn run_forecast<P>(
    provider: &P,
    name: &str,
    config: &ForecastConfig,
) -> Result<ForecastReport, ModelError>
where
    P: SeriesProvider + ?Sized,
{
    config.validate()?;
    let series = provider.load_series(name)?;
    info!(series = name, observations = series.len(), "loaded series");
    run_forecast_on_series(series.view(), config)
}

/// Trains a fresh model on the start of `series` and evaluates it on the rest.
///
/// The most recent `max_observations` values are scaled into `[-1, 1]` with a
/// scaler owned by this run, cut into windows and split chronologically.
/// The model is trained on the first part and predicts every test window;
/// predictions and actual values are mapped back to original units before
/// the metrics are computed. The last `window_size` observations are then
/// used to predict one step past the end of the series.
///
/// # Errors
///
/// - `ModelError::ConfigurationError` - If `config` is invalid
/// - `ModelError::InputValidationError` - If the series is empty or holds non-finite values
/// - `ModelError::InsufficientData` - If the series is too short to window, split or fill a batch
/// - `ModelError::NumericalInstability` - If training diverges
/// - `ModelError::MapeUndefined` - If an actual value is zero under `MapePolicy::Error`
pub fn run_forecast_on_series(
    series: ArrayView1<f64>,
    config: &ForecastConfig,
) -> Result<ForecastReport, ModelError> {
    config.validate()?;

    let observations = match config.max_observations {
        Some(limit) => take_last(series, limit),
        None => series.to_owned(),
    };

    let mut scaler = MinMaxScaler::default();
    let scaled = scaler.fit_transform(observations.view())?;
    let samples = make_windows(scaled.view(), config.window_size)?;
    let (train, test) = chronological_split(samples, config.train_ratio)?;
    info!(
        observations = observations.len(),
        train = train.len(),
        test = test.len(),
        window_size = config.window_size,
        "prepared forecast samples"
    );

    let mut model = LSTMModel::new(config.model, config.optimizer)?;
    let outcome = model.fit(&train, &config.training)?;

    let windows: Vec<Array2<f64>> = test.iter().map(|s| s.window.clone()).collect();
    let scaled_predictions = Array1::from(model.predict_scalar(&windows)?);
    let scaled_actual: Array1<f64> = test.iter().map(|s| s.target[[0, 0]]).collect();

    let predictions = scaler.inverse_transform(scaled_predictions.view())?;
    let actual = scaler.inverse_transform(scaled_actual.view())?;
    let metrics = RegressionMetrics::new(&actual, &predictions, config.mape_policy)?;

    let next_window = last_window(scaled.view(), config.window_size)?;
    let scaled_next = Array1::from(model.predict_scalar(std::slice::from_ref(&next_window))?);
    let next_value = scaler.inverse_transform(scaled_next.view())?[0];
    info!(
        mse = metrics.mse,
        rmse = metrics.rmse,
        mape = metrics.mape,
        next_value,
        "forecast evaluated"
    );

    Ok(ForecastReport {
        predictions: predictions.to_vec(),
        actual: actual.to_vec(),
        metrics,
        next_value,
        loss_history: model.loss_history().clone(),
        outcome,
        model,
    })
}
