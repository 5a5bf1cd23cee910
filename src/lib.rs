/// Module `error` defines the error types shared by the whole crate.
///
/// - `ModelError` - configuration, data, numerical and lookup failures
/// - `IoError` - failures while saving or loading a model bundle
pub mod error;

/// Module `math` provides numerically stable activations and array helpers.
///
/// # Main Functions
/// - `sigmoid` - Sigmoid that branches on the sign of its input so `exp` never overflows
/// - `sigmoid_array` / `tanh_array` - Elementwise activations over 2D arrays
/// - `frobenius_norm` - Square root of the sum of squared elements
/// - `all_finite` - Whether an array holds no NaN or infinite values
pub mod math;

/// Module `traits` defines the seams to the collaborators around the engine.
///
/// - `Scaler` - fit/transform/inverse-transform of a series
/// - `SeriesProvider` - named access to materialized series
pub mod traits;

/// Module `neural_network` implements the recurrent regression engine.
///
/// A single-layer LSTM maps a window of observations to the next value. Gradients
/// are computed by explicit backpropagation through time and applied by a
/// clipped RMSprop (or momentum) optimizer in mini-batches, with early stopping
/// on the gradient norm.
///
/// # Components
/// - **ParameterSet**: the ten weight and bias tensors, addressed through `ParameterKind`
/// - **LSTMCell** / **SequenceRunner**: forward pass over one step and over a window
/// - **BackpropEngine**: reverse pass over an `ActivationCache`
/// - **Optimizer**: elementwise clipping followed by the selected `UpdatePolicy`
/// - **TrainingLoop**: batching, loss history and the Running/Converged/Exhausted state machine
/// - **InferenceRunner**: cache-free prediction
/// - **LSTMModel**: owns all of the above state and persists it as JSON
///
/// # Examples
/// ```rust
/// use ndarray::Array2;
/// use rustyforecast::neural_network::*;
///
/// let mut model = LSTMModel::new(ModelConfig::new(1, 4, 1), OptimizerConfig::default()).unwrap();
/// let samples: Vec<TrainingSample> = (0..10)
///     .map(|i| TrainingSample {
///         window: Array2::from_elem((4, 1), (i as f64 / 10.0).sin()),
///         target: Array2::from_elem((1, 1), ((i + 4) as f64 / 10.0).sin()),
///     })
///     .collect();
///
/// let outcome = model.fit(&samples, &TrainingConfig::new(5, 5)).unwrap();
/// assert!(outcome.state.is_terminal());
/// assert_eq!(model.loss_history().len(), outcome.epochs_run);
/// ```
pub mod neural_network;

/// Module `utility` prepares series for the engine.
///
/// # Main Functions
/// - `MinMaxScaler` - maps a series into `[-1, 1]` and back
/// - `make_windows` - slides a fixed window over a series to build training samples
/// - `chronological_split` - splits samples into a training prefix and a test suffix
pub mod utility;

/// Module `metric` provides regression error metrics.
///
/// - `mean_squared_error`, `root_mean_squared_error`
/// - `mean_absolute_percentage_error` with a configurable `MapePolicy` for zero actual values
/// - `RegressionMetrics` - all three at once
pub mod metric;

/// Module `dataset` provides series sources.
///
/// - `InMemorySeriesProvider` - a `SeriesProvider` over in-memory series
/// - `merge_series_by_date` - averages several dated series into one sector series
pub mod dataset;

/// Module `forecast` runs the full pipeline from a raw series to evaluated predictions.
///
/// # Examples
/// ```rust
/// use ndarray::Array1;
/// use rustyforecast::forecast::{ForecastConfig, run_forecast_on_series};
/// use rustyforecast::neural_network::{ModelConfig, TrainingConfig};
///
/// let series: Array1<f64> = (0..80).map(|i| 100.0 + 10.0 * (i as f64 / 6.0).sin()).collect();
/// let config = ForecastConfig::default()
///     .with_model(ModelConfig::new(1, 8, 1))
///     .with_training(TrainingConfig::new(3, 10));
///
/// let report = run_forecast_on_series(series.view(), &config).unwrap();
/// assert_eq!(report.predictions.len(), report.actual.len());
/// ```
pub mod forecast;

/// Convenience re-exports of the most used types and functions.
pub mod prelude;
