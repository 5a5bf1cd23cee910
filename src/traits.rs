use crate::error::ModelError;
use ndarray::{Array1, ArrayView1};

/// Maps a raw series into a fixed numeric range and back.
///
/// A scaler is fitted once per training run and owned by that run; fitted
/// bounds are never shared between concurrent runs.
pub trait Scaler {
    /// Fits the scaler to `series` and returns the scaled series.
    ///
    /// # Errors
    ///
    /// - `ModelError::InputValidationError` - If `series` is empty or contains non-finite values
    fn fit_transform(&mut self, series: ArrayView1<f64>) -> Result<Array1<f64>, ModelError>;

    /// Scales `series` with the already fitted bounds.
    ///
    /// # Errors
    ///
    /// - `ModelError::NotFitted` - If the scaler has not been fitted
    fn transform(&self, series: ArrayView1<f64>) -> Result<Array1<f64>, ModelError>;

    /// Maps scaled values back to original units; the exact left inverse of
    /// `fit_transform` on the fitted range.
    ///
    /// # Errors
    ///
    /// - `ModelError::NotFitted` - If the scaler has not been fitted
    fn inverse_transform(&self, series: ArrayView1<f64>) -> Result<Array1<f64>, ModelError>;
}

/// Supplies ordered numeric series (e.g. closing prices) by name.
///
/// The engine only requires the series to be materialized in memory; how it
/// is sourced is up to the implementor.
pub trait SeriesProvider {
    /// Loads the named series in chronological order.
    ///
    /// # Errors
    ///
    /// - `ModelError::NotFound` - If no series with this name is available
    fn load_series(&self, name: &str) -> Result<Array1<f64>, ModelError>;

    /// Names of every series this provider can serve, sorted.
    fn available_series(&self) -> Vec<String>;
}
