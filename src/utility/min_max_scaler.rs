use super::*;
use crate::traits::Scaler;
use serde::{Deserialize, Serialize};

/// Linearly maps a series from its observed `[min, max]` onto `feature_range`.
///
/// ```text
/// scaled   = lower + (x - min) / (max - min) * (upper - lower)
/// original = min + (scaled - lower) / (upper - lower) * (max - min)
/// ```
///
/// A constant series has `max - min = 0`; the range is then taken as 1, so
/// every value maps to `lower` and the inverse still recovers the original.
///
/// # Fields
///
/// - `feature_range` - Target `(lower, upper)` interval, `(-1.0, 1.0)` by default
/// - `data_min` - Minimum seen by the last fit, `None` before fitting
/// - `data_max` - Maximum seen by the last fit, `None` before fitting
///
/// # Example
/// ```rust
/// use ndarray::array;
/// use rustyforecast::traits::Scaler;
/// use rustyforecast::utility::MinMaxScaler;
///
/// let mut scaler = MinMaxScaler::default();
/// let scaled = scaler.fit_transform(array![1.0, 5.5, 10.0].view()).unwrap();
/// assert_eq!(scaled[0], -1.0);
/// assert_eq!(scaled[2], 1.0);
///
/// let restored = scaler.inverse_transform(scaled.view()).unwrap();
/// assert!((restored[1] - 5.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    feature_range: (f64, f64),
    data_min: Option<f64>,
    data_max: Option<f64>,
}

impl Default for MinMaxScaler {
    fn default() -> Self {
        Self {
            feature_range: (-1.0, 1.0),
            data_min: None,
            data_max: None,
        }
    }
}

impl MinMaxScaler {
    /// Creates an unfitted scaler targeting `feature_range`.
    ///
    /// # Errors
    ///
    /// - `ModelError::ConfigurationError` - If the bounds are not finite or `lower >= upper`
    pub fn new(feature_range: (f64, f64)) -> Result<Self, ModelError> {
        let (lower, upper) = feature_range;
        if !lower.is_finite() || !upper.is_finite() || lower >= upper {
            return Err(ModelError::ConfigurationError(format!(
                "feature_range must satisfy lower < upper with finite bounds, got ({}, {})",
                lower, upper
            )));
        }
        Ok(Self {
            feature_range,
            ..Self::default()
        })
    }

    pub fn feature_range(&self) -> (f64, f64) {
        self.feature_range
    }

    pub fn data_min(&self) -> Option<f64> {
        self.data_min
    }

    pub fn data_max(&self) -> Option<f64> {
        self.data_max
    }

    pub fn is_fitted(&self) -> bool {
        self.data_min.is_some() && self.data_max.is_some()
    }

    /// Records the minimum and maximum of `series`.
    ///
    /// # Errors
    ///
    /// - `ModelError::InputValidationError` - If `series` is empty or holds NaN/infinite values
    pub fn fit(&mut self, series: ArrayView1<f64>) -> Result<(), ModelError> {
        if series.is_empty() {
            return Err(ModelError::InputValidationError(
                "cannot fit a scaler on an empty series".to_string(),
            ));
        }
        if let Some(index) = series.iter().position(|v| !v.is_finite()) {
            return Err(ModelError::InputValidationError(format!(
                "series value at index {} is not finite",
                index
            )));
        }

        let (min, max) = series
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        self.data_min = Some(min);
        self.data_max = Some(max);
        Ok(())
    }

    /// Fitted `(min, data_range)` with a zero range replaced by 1.
    fn fitted_bounds(&self) -> Result<(f64, f64), ModelError> {
        match (self.data_min, self.data_max) {
            (Some(min), Some(max)) => {
                let range = max - min;
                Ok((min, if range == 0.0 { 1.0 } else { range }))
            }
            _ => Err(ModelError::NotFitted),
        }
    }
}

impl Scaler for MinMaxScaler {
    fn fit_transform(&mut self, series: ArrayView1<f64>) -> Result<Array1<f64>, ModelError> {
        self.fit(series)?;
        self.transform(series)
    }

    fn transform(&self, series: ArrayView1<f64>) -> Result<Array1<f64>, ModelError> {
        let (min, range) = self.fitted_bounds()?;
        let (lower, upper) = self.feature_range;
        Ok(series.mapv(|x| lower + (x - min) / range * (upper - lower)))
    }

    fn inverse_transform(&self, series: ArrayView1<f64>) -> Result<Array1<f64>, ModelError> {
        let (min, range) = self.fitted_bounds()?;
        let (lower, upper) = self.feature_range;
        Ok(series.mapv(|s| min + (s - lower) / (upper - lower) * range))
    }
}
