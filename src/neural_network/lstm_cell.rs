use super::*;
use crate::math::{sigmoid_array, tanh_array};
use ndarray::{Axis, concatenate};

/// Activations of one LSTM time step.
///
/// Every field is a column vector. One record per element of a window forms an
/// [`ActivationCache`].
///
/// # Fields
///
/// - `input` - Raw input `x_t` with shape `(input_size, 1)`
/// - `combined` - `[x_t; h_{t-1}]` with shape `(input_size + hidden_size, 1)`
/// - `input_gate` - `i_t = σ(W_i · combined + b_i)`
/// - `forget_gate` - `f_t = σ(W_f · combined + b_f)`
/// - `output_gate` - `o_t = σ(W_o · combined + b_o)`
/// - `candidate` - `g_t = tanh(W_c · combined + b_c)`
/// - `cell` - `c_t = f_t ⊙ c_{t-1} + i_t ⊙ g_t`
/// - `cell_activated` - `tanh(c_t)`
/// - `hidden` - `h_t = o_t ⊙ tanh(c_t)`
#[derive(Debug, Clone, PartialEq)]
pub struct StepRecord {
    pub input: Column,
    pub combined: Column,
    pub input_gate: Column,
    pub forget_gate: Column,
    pub output_gate: Column,
    pub candidate: Column,
    pub cell: Column,
    pub cell_activated: Column,
    pub hidden: Column,
}

/// Computes a gate pre-activation: `weight · combined + bias`
#[inline]
fn compute_gate_value(weight: &Array2<f64>, bias: &Array2<f64>, combined: &Column) -> Column {
    weight.dot(combined) + bias
}

/// Single time-step LSTM computation.
///
/// The cell is stateless: each call is a pure function of its arguments and
/// the parameter tensors.
pub struct LSTMCell;

impl LSTMCell {
    /// Runs one time step.
    ///
    /// # Parameters
    ///
    /// - `params` - Model parameters
    /// - `x_t` - Input column with shape `(input_size, 1)`
    /// - `h_prev` - Previous hidden state with shape `(hidden_size, 1)`
    /// - `c_prev` - Previous cell state with shape `(hidden_size, 1)`
    ///
    /// # Returns
    ///
    /// - `Result<StepRecord, ModelError>` - All activations of this step
    ///
    /// # Errors
    ///
    /// - `ModelError::InputValidationError` - If the column shapes do not line up with `params`
    pub fn forward(
        params: &ParameterSet,
        x_t: &Column,
        h_prev: &Column,
        c_prev: &Column,
    ) -> Result<StepRecord, ModelError> {
        let hidden_size = params.w_i.nrows();
        if x_t.ncols() != 1 || h_prev.dim() != (hidden_size, 1) || c_prev.dim() != (hidden_size, 1)
        {
            return Err(ModelError::InputValidationError(format!(
                "step shapes do not match the parameters: x_t {:?}, h_prev {:?}, c_prev {:?}, hidden_size {}",
                x_t.dim(),
                h_prev.dim(),
                c_prev.dim(),
                hidden_size
            )));
        }
        let input_size = params.input_size()?;
        if x_t.nrows() != input_size {
            return Err(ModelError::InputValidationError(format!(
                "input has {} features but the model expects {}",
                x_t.nrows(),
                input_size
            )));
        }

        let combined = concatenate(Axis(0), &[x_t.view(), h_prev.view()])
            .map_err(|e| ModelError::InputValidationError(e.to_string()))?;

        let input_gate = sigmoid_array(&compute_gate_value(&params.w_i, &params.b_i, &combined));
        let forget_gate = sigmoid_array(&compute_gate_value(&params.w_f, &params.b_f, &combined));
        let output_gate = sigmoid_array(&compute_gate_value(&params.w_o, &params.b_o, &combined));
        let candidate = tanh_array(&compute_gate_value(&params.w_c, &params.b_c, &combined));

        let cell = &forget_gate * c_prev + &input_gate * &candidate;
        let cell_activated = tanh_array(&cell);
        let hidden = &output_gate * &cell_activated;

        Ok(StepRecord {
            input: x_t.clone(),
            combined,
            input_gate,
            forget_gate,
            output_gate,
            candidate,
            cell,
            cell_activated,
            hidden,
        })
    }

    /// Output projection: `y = W_y · h + b_y`, shape `(output_size, 1)`.
    #[inline]
    pub fn project(params: &ParameterSet, hidden: &Column) -> Column {
        compute_gate_value(&params.w_y, &params.b_y, hidden)
    }
}
