use super::OPTIMIZER_PARALLEL_THRESHOLD;
use ndarray::{Array2, Zip};

/// Advances one RMSprop accumulator and returns the matching parameter delta.
///
/// ```text
/// accum = beta * accum + (1 - beta) * grad^2
/// delta = -(lr / (epsilon + sqrt(accum))) * grad
/// ```
///
/// # Parameters
///
/// - `grad` - Clipped gradient of one tensor
/// - `accum` - Moving average of squared gradients for that tensor, updated in place
/// - `beta` - Decay rate of the moving average
/// - `lr` - Learning rate
/// - `epsilon` - Small constant keeping the denominator away from zero
///
/// # Performance
///
/// Uses parallel computation when the tensor has at least `OPTIMIZER_PARALLEL_THRESHOLD` elements.
///
/// # Examples
///
/// ```rust
/// use ndarray::array;
/// use rustyforecast::neural_network::optimizer::rms_prop_delta;
///
/// let grad = array![[0.5, -0.5]];
/// let mut accum = array![[0.0, 0.0]];
/// let delta = rms_prop_delta(&grad, &mut accum, 0.9, 0.001, 1e-8);
/// assert!(delta[[0, 0]] < 0.0 && delta[[0, 1]] > 0.0);
/// ```
pub fn rms_prop_delta(
    grad: &Array2<f64>,
    accum: &mut Array2<f64>,
    beta: f64,
    lr: f64,
    epsilon: f64,
) -> Array2<f64> {
    let update_accum = |a: &mut f64, &g: &f64| *a = beta * *a + (1.0 - beta) * g * g;
    let step = |&g: &f64, &a: &f64| -(lr / (epsilon + a.sqrt())) * g;

    if grad.len() >= OPTIMIZER_PARALLEL_THRESHOLD {
        Zip::from(&mut *accum).and(grad).par_for_each(update_accum);
        Zip::from(grad).and(&*accum).par_map_collect(step)
    } else {
        Zip::from(&mut *accum).and(grad).for_each(update_accum);
        Zip::from(grad).and(&*accum).map_collect(step)
    }
}
