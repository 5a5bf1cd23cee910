pub use crate::dataset::{InMemorySeriesProvider, merge_series_by_date};
pub use crate::error::{IoError, ModelError};
pub use crate::forecast::{ForecastConfig, ForecastReport, run_forecast, run_forecast_on_series};
pub use crate::metric::{
    MapePolicy, RegressionMetrics, mean_absolute_percentage_error, mean_squared_error,
    root_mean_squared_error,
};
pub use crate::neural_network::{
    Column, LSTMModel, LossHistory, ModelConfig, OptimizerConfig, TrainingConfig,
    TrainingOutcome, TrainingSample, TrainingState, UpdatePolicy,
};
pub use crate::traits::{Scaler, SeriesProvider};
pub use crate::utility::{MinMaxScaler, chronological_split, make_windows};
