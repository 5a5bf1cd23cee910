use ndarray::{Array2, ArrayBase, Data, Dimension};

/// Numerically stable sigmoid: `1 / (1 + exp(-z))`.
///
/// Branches on the sign of `z` so that `exp` is only ever evaluated on a
/// non-positive argument and cannot overflow.
///
/// # Parameters
///
/// - `z` - Pre-activation value
///
/// # Returns
///
/// - `f64` - Value in `[0, 1]`
///
/// # Examples
/// ```rust
/// use rustyforecast::math::sigmoid;
///
/// assert!((sigmoid(0.0) - 0.5).abs() < 1e-12);
/// assert_eq!(sigmoid(1000.0), 1.0);
/// assert_eq!(sigmoid(-1000.0), 0.0);
/// ```
#[inline]
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// Applies [`sigmoid`] elementwise.
#[inline]
pub fn sigmoid_array(z: &Array2<f64>) -> Array2<f64> {
    z.mapv(sigmoid)
}

/// Applies `tanh` elementwise.
#[inline]
pub fn tanh_array(z: &Array2<f64>) -> Array2<f64> {
    z.mapv(f64::tanh)
}

/// Frobenius (L2) norm of an array of any dimension.
pub fn frobenius_norm<S, D>(values: &ArrayBase<S, D>) -> f64
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    values.iter().map(|v| v * v).sum::<f64>().sqrt()
}

/// Returns true if every element is finite (neither NaN nor infinite).
pub fn all_finite<S, D>(values: &ArrayBase<S, D>) -> bool
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    values.iter().all(|v| v.is_finite())
}
