use crate::error::ModelError;
use ndarray::Data;
use ndarray::prelude::*;
use serde::{Deserialize, Serialize};

/// How [`mean_absolute_percentage_error`] treats zero actual values.
///
/// # Variants
///
/// - `Error` - Fail with `ModelError::MapeUndefined` at the first zero actual
/// - `Skip` - Leave out pairs whose actual is zero and average over the rest
/// - `EpsilonGuard(eps)` - Divide by `max(|actual|, eps)` instead of `|actual|`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum MapePolicy {
    #[default]
    Error,
    Skip,
    EpsilonGuard(f64),
}

fn check_pair<S>(actual: &ArrayBase<S, Ix1>, predicted: &ArrayBase<S, Ix1>) -> Result<(), ModelError>
where
    S: Data<Elem = f64>,
{
    if actual.len() != predicted.len() {
        return Err(ModelError::InputValidationError(format!(
            "Input arrays must have the same length. Actual: {}, Predicted: {}",
            actual.len(),
            predicted.len()
        )));
    }
    if actual.is_empty() {
        return Err(ModelError::InputValidationError(
            "Input arrays must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Calculates the Mean Squared Error between actual and predicted values.
///
/// # Parameters
///
/// - `actual` - Ground-truth values
/// - `predicted` - Predicted values
///
/// # Examples
/// ```rust
/// use ndarray::array;
/// use rustyforecast::metric::mean_squared_error;
///
/// let actual = array![3.0, -0.5, 2.0, 7.0];
/// let predicted = array![2.5, 0.0, 2.1, 7.8];
/// let mse = mean_squared_error(&actual, &predicted).unwrap();
/// // (0.25 + 0.25 + 0.01 + 0.64) / 4 = 0.2875
/// assert!((mse - 0.2875).abs() < 1e-10);
/// ```
///
/// # Errors
///
/// - `ModelError::InputValidationError` - If the arrays are empty or differ in length
pub fn mean_squared_error<S>(
    actual: &ArrayBase<S, Ix1>,
    predicted: &ArrayBase<S, Ix1>,
) -> Result<f64, ModelError>
where
    S: Data<Elem = f64>,
{
    check_pair(actual, predicted)?;

    let sum_squared_diff = actual
        .iter()
        .zip(predicted.iter())
        .fold(0.0, |acc, (&a, &p)| {
            let error = a - p;
            acc + error * error
        });

    Ok(sum_squared_diff / actual.len() as f64)
}

/// Calculates the Root Mean Squared Error, in the units of the data.
///
/// # Examples
/// ```rust
/// use ndarray::array;
/// use rustyforecast::metric::root_mean_squared_error;
///
/// let rmse = root_mean_squared_error(&array![1.0, 2.0, 3.0], &array![2.0, 3.0, 4.0]).unwrap();
/// assert!((rmse - 1.0).abs() < 1e-12);
/// ```
///
/// # Errors
///
/// - `ModelError::InputValidationError` - If the arrays are empty or differ in length
pub fn root_mean_squared_error<S>(
    actual: &ArrayBase<S, Ix1>,
    predicted: &ArrayBase<S, Ix1>,
) -> Result<f64, ModelError>
where
    S: Data<Elem = f64>,
{
    Ok(mean_squared_error(actual, predicted)?.sqrt())
}

/// Calculates the Mean Absolute Percentage Error, as a percentage.
///
/// ```text
/// MAPE = 100 / n * sum(|(actual - predicted) / actual|)
/// ```
///
/// Zero actual values are handled according to `policy`.
///
/// # Examples
/// ```rust
/// use ndarray::array;
/// use rustyforecast::metric::{MapePolicy, mean_absolute_percentage_error};
///
/// let actual = array![100.0, 200.0];
/// let predicted = array![110.0, 190.0];
/// let mape = mean_absolute_percentage_error(&actual, &predicted, MapePolicy::Error).unwrap();
/// assert!((mape - 7.5).abs() < 1e-12);
/// ```
///
/// # Errors
///
/// - `ModelError::InputValidationError` - If the arrays are empty or differ in length,
///   or the epsilon of `EpsilonGuard` is not positive
/// - `ModelError::MapeUndefined` - Under `Error` when an actual value is zero,
///   under `Skip` when every actual value is zero
pub fn mean_absolute_percentage_error<S>(
    actual: &ArrayBase<S, Ix1>,
    predicted: &ArrayBase<S, Ix1>,
    policy: MapePolicy,
) -> Result<f64, ModelError>
where
    S: Data<Elem = f64>,
{
    check_pair(actual, predicted)?;

    let mut total = 0.0;
    let mut counted = 0usize;
    for (index, (&a, &p)) in actual.iter().zip(predicted.iter()).enumerate() {
        let denominator = match policy {
            MapePolicy::Error if a == 0.0 => return Err(ModelError::MapeUndefined { index }),
            MapePolicy::Skip if a == 0.0 => continue,
            MapePolicy::EpsilonGuard(eps) => {
                if !(eps > 0.0) {
                    return Err(ModelError::InputValidationError(format!(
                        "MAPE epsilon must be positive, got {}",
                        eps
                    )));
                }
                a.abs().max(eps)
            }
            _ => a.abs(),
        };
        total += ((a - p) / denominator).abs();
        counted += 1;
    }

    if counted == 0 {
        return Err(ModelError::MapeUndefined { index: 0 });
    }
    Ok(total / counted as f64 * 100.0)
}

/// Error metrics of one forecast, in the units of the original series.
///
/// # Fields
///
/// - `mse` - Mean squared error
/// - `rmse` - Root mean squared error
/// - `mape` - Mean absolute percentage error (percent)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    pub mse: f64,
    pub rmse: f64,
    pub mape: f64,
}

impl RegressionMetrics {
    /// Computes all three metrics for `actual` against `predicted`.
    ///
    /// # Errors
    ///
    /// - `ModelError::InputValidationError` - If the arrays are empty or differ in length
    /// - `ModelError::MapeUndefined` - If MAPE is undefined under `policy`
    pub fn new<S>(
        actual: &ArrayBase<S, Ix1>,
        predicted: &ArrayBase<S, Ix1>,
        policy: MapePolicy,
    ) -> Result<Self, ModelError>
    where
        S: Data<Elem = f64>,
    {
        let mse = mean_squared_error(actual, predicted)?;
        Ok(Self {
            mse,
            rmse: mse.sqrt(),
            mape: mean_absolute_percentage_error(actual, predicted, policy)?,
        })
    }

    /// One-line summary, e.g. `MSE: 70.0000, RMSE: 8.3666, MAPE: 4.6333%`.
    pub fn summary(&self) -> String {
        format!(
            "MSE: {:.4}, RMSE: {:.4}, MAPE: {:.4}%",
            self.mse, self.rmse, self.mape
        )
    }
}
