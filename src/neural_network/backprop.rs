use super::*;
use ndarray::s;

/// Backpropagation through time over one cached window.
///
/// Replays an [`ActivationCache`] from the last time step to the first and
/// accumulates the gradient of every parameter tensor. Gradients are returned;
/// the parameters themselves are never touched.
pub struct BackpropEngine;

impl BackpropEngine {
    /// Computes the gradients of the loss for one window.
    ///
    /// # Parameters
    ///
    /// - `params` - Parameters the cache was produced with
    /// - `cache` - Activations of the window's forward pass
    /// - `dy` - Gradient of the loss with respect to the window output, shape `(output_size, 1)`
    ///
    /// # Returns
    ///
    /// - `Result<Gradients, ModelError>` - One gradient tensor per parameter, same shapes
    ///
    /// # Errors
    ///
    /// - `ModelError::InputValidationError` - If the cache is empty or `dy` has the wrong shape
    pub fn backward(
        params: &ParameterSet,
        cache: &ActivationCache,
        dy: &Column,
    ) -> Result<Gradients, ModelError> {
        let last = cache.last().ok_or_else(|| {
            ModelError::InputValidationError("activation cache is empty".to_string())
        })?;
        if dy.dim() != (params.w_y.nrows(), 1) {
            return Err(ModelError::InputValidationError(format!(
                "output gradient must have shape ({}, 1), got {:?}",
                params.w_y.nrows(),
                dy.dim()
            )));
        }

        let hidden_size = params.w_i.nrows();
        let input_size = params.input_size()?;
        let steps = cache.steps();

        let mut grads = params.zeros_like();
        grads.w_y = dy.dot(&last.hidden.t());
        grads.b_y = dy.clone();

        // Only the last step receives the projection gradient; earlier steps see carried terms only
        let mut dh_next = params.w_y.t().dot(dy);
        let mut dc_next = Column::zeros((hidden_size, 1));
        let zero_state = Column::zeros((hidden_size, 1));

        for t in (0..steps.len()).rev() {
            let step = &steps[t];
            let c_prev = if t > 0 { &steps[t - 1].cell } else { &zero_state };

            let i_t = &step.input_gate;
            let f_t = &step.forget_gate;
            let o_t = &step.output_gate;
            let g_t = &step.candidate;
            let tanh_c = &step.cell_activated;

            let dh = &dh_next;
            let do_raw = dh * tanh_c * o_t * &(1.0 - o_t);
            let dc = &dc_next + &(dh * o_t * &(1.0 - tanh_c * tanh_c));
            let dg_raw = &dc * i_t * &(1.0 - g_t * g_t);
            let di_raw = &dc * g_t * i_t * &(1.0 - i_t);
            let df_raw = &dc * c_prev * f_t * &(1.0 - f_t);

            let combined_t = step.combined.t();
            grads.w_i += &di_raw.dot(&combined_t);
            grads.w_f += &df_raw.dot(&combined_t);
            grads.w_o += &do_raw.dot(&combined_t);
            grads.w_c += &dg_raw.dot(&combined_t);
            grads.b_i += &di_raw;
            grads.b_f += &df_raw;
            grads.b_o += &do_raw;
            grads.b_c += &dg_raw;

            let d_combined = params.w_i.t().dot(&di_raw)
                + params.w_f.t().dot(&df_raw)
                + params.w_o.t().dot(&do_raw)
                + params.w_c.t().dot(&dg_raw);

            dh_next = d_combined.slice(s![input_size.., ..]).to_owned();
            dc_next = f_t * &dc;
        }

        Ok(grads)
    }
}

/// Gradient of a mean squared error with respect to one window's output.
///
/// With a loss averaged over `denominator` squared terms, each output element
/// contributes `2 (y - target) / denominator`.
///
/// # Parameters
///
/// - `output` - Network output for the window
/// - `target` - Target for the window, same shape as `output`
/// - `denominator` - Number of squared terms the loss is averaged over
pub fn squared_error_gradient(output: &Column, target: &Column, denominator: usize) -> Column {
    (output - target) * (2.0 / denominator as f64)
}
