use crate::error::ModelError;
use crate::neural_network::{Column, TrainingSample};
use ndarray::{Array1, Array2, ArrayView1};

/// Min-max scaling of a series into a fixed range
pub mod min_max_scaler;
/// Chronological train/test split without shuffling
pub mod train_test_split;
/// Sliding-window sample construction
pub mod windowing;

pub use min_max_scaler::*;
pub use train_test_split::*;
pub use windowing::*;
