use super::OPTIMIZER_PARALLEL_THRESHOLD;
use ndarray::{Array2, Zip};

/// Advances one momentum velocity and returns it as the parameter delta.
///
/// ```text
/// velocity = momentum * velocity - lr * grad
/// delta    = velocity
/// ```
///
/// With `momentum = 0` this is plain stochastic gradient descent.
pub fn momentum_delta(
    grad: &Array2<f64>,
    velocity: &mut Array2<f64>,
    momentum: f64,
    lr: f64,
) -> Array2<f64> {
    let update = |v: &mut f64, &g: &f64| *v = momentum * *v - lr * g;

    if grad.len() >= OPTIMIZER_PARALLEL_THRESHOLD {
        Zip::from(&mut *velocity).and(grad).par_for_each(update);
    } else {
        Zip::from(&mut *velocity).and(grad).for_each(update);
    }
    velocity.clone()
}
