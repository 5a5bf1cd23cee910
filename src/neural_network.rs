pub use crate::error::ModelError;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Column vector with shape `(n, 1)`; every vector inside the engine uses this layout
pub type Column = Array2<f64>;

/// Backward pass through time over one cached window
pub mod backprop;
/// Model, optimizer and training hyperparameters
pub mod config;
/// Prediction over held-out windows without caching
pub mod inference;
/// Input validation functions for engine configuration
mod input_validation_function;
/// Per-epoch average loss record
pub mod loss_history;
/// Single time-step LSTM gate computation
pub mod lstm_cell;
/// Model instance owning parameters, optimizer state and loss history
pub mod model;
/// Gradient clipping and the selectable update policies
pub mod optimizer;
/// The ten weight/bias tensors of a model
pub mod parameter_set;
/// Drives the cell across a window, optionally caching activations
pub mod sequence_runner;
/// JSON bundle used to persist a model
pub mod serialize_model;
/// Mini-batch training loop with early stopping
pub mod training;

pub use backprop::*;
pub use config::*;
pub use inference::*;
pub use loss_history::*;
pub use lstm_cell::*;
pub use model::*;
pub use optimizer::*;
pub use parameter_set::*;
pub use sequence_runner::*;
pub use training::*;
