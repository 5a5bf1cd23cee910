use super::*;
use crate::error::IoError;

/// Version tag written into every saved bundle.
pub const FORMAT_VERSION: u32 = 1;

fn array2_to_vec2(array: &Array2<f64>) -> Vec<Vec<f64>> {
    array.rows().into_iter().map(|row| row.to_vec()).collect()
}

fn vec2_to_array2(vec: &[Vec<f64>], name: &str) -> Result<Array2<f64>, IoError> {
    let rows = vec.len();
    let cols = if rows > 0 { vec[0].len() } else { 0 };
    if vec.iter().any(|row| row.len() != cols) {
        return Err(IoError::ModelStructureMismatch(format!(
            "{} has rows of different lengths",
            name
        )));
    }
    let flat: Vec<f64> = vec.iter().flat_map(|row| row.iter().copied()).collect();
    Array2::from_shape_vec((rows, cols), flat)
        .map_err(|e| IoError::ModelStructureMismatch(format!("{}: {}", name, e)))
}

/// Serializable form of a [`ParameterSet`], one nested vector per tensor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializableParameterSet {
    pub w_i: Vec<Vec<f64>>,
    pub w_f: Vec<Vec<f64>>,
    pub w_o: Vec<Vec<f64>>,
    pub w_c: Vec<Vec<f64>>,
    pub w_y: Vec<Vec<f64>>,
    pub b_i: Vec<Vec<f64>>,
    pub b_f: Vec<Vec<f64>>,
    pub b_o: Vec<Vec<f64>>,
    pub b_c: Vec<Vec<f64>>,
    pub b_y: Vec<Vec<f64>>,
}

impl SerializableParameterSet {
    pub fn from_parameter_set(params: &ParameterSet) -> Self {
        Self {
            w_i: array2_to_vec2(&params.w_i),
            w_f: array2_to_vec2(&params.w_f),
            w_o: array2_to_vec2(&params.w_o),
            w_c: array2_to_vec2(&params.w_c),
            w_y: array2_to_vec2(&params.w_y),
            b_i: array2_to_vec2(&params.b_i),
            b_f: array2_to_vec2(&params.b_f),
            b_o: array2_to_vec2(&params.b_o),
            b_c: array2_to_vec2(&params.b_c),
            b_y: array2_to_vec2(&params.b_y),
        }
    }

    /// Rebuilds the tensors and checks them against `config`.
    ///
    /// # Errors
    ///
    /// - `IoError::ModelStructureMismatch` - If a tensor is ragged or has the wrong shape
    pub fn to_parameter_set(&self, config: &ModelConfig) -> Result<ParameterSet, IoError> {
        let tensors = [
            vec2_to_array2(&self.w_i, "W_i")?,
            vec2_to_array2(&self.w_f, "W_f")?,
            vec2_to_array2(&self.w_o, "W_o")?,
            vec2_to_array2(&self.w_c, "W_c")?,
            vec2_to_array2(&self.w_y, "W_y")?,
            vec2_to_array2(&self.b_i, "b_i")?,
            vec2_to_array2(&self.b_f, "b_f")?,
            vec2_to_array2(&self.b_o, "b_o")?,
            vec2_to_array2(&self.b_c, "b_c")?,
            vec2_to_array2(&self.b_y, "b_y")?,
        ];
        ParameterSet::from_tensors(config, tensors)
            .map_err(|e| IoError::ModelStructureMismatch(e.to_string()))
    }
}

/// Serializable form of an [`OptimizerState`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializableOptimizerState {
    pub squared_avg: SerializableParameterSet,
    pub velocity: SerializableParameterSet,
    pub steps: u64,
}

impl SerializableOptimizerState {
    pub fn from_optimizer_state(state: &OptimizerState) -> Self {
        Self {
            squared_avg: SerializableParameterSet::from_parameter_set(&state.squared_avg),
            velocity: SerializableParameterSet::from_parameter_set(&state.velocity),
            steps: state.steps,
        }
    }

    pub fn to_optimizer_state(&self, config: &ModelConfig) -> Result<OptimizerState, IoError> {
        Ok(OptimizerState {
            squared_avg: self.squared_avg.to_parameter_set(config)?,
            velocity: self.velocity.to_parameter_set(config)?,
            steps: self.steps,
        })
    }
}

/// Everything needed to resume training or run inference with a saved model.
///
/// # Fields
///
/// - `format_version` - Bundle layout version, see [`FORMAT_VERSION`]
/// - `config` - Network dimensions and seed
/// - `optimizer` - Optimizer hyperparameters
/// - `parameters` - Weights and biases
/// - `optimizer_state` - Accumulators and step counter
/// - `loss_history` - Per-epoch losses of the last training run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializableModel {
    pub format_version: u32,
    pub config: ModelConfig,
    pub optimizer: OptimizerConfig,
    pub parameters: SerializableParameterSet,
    pub optimizer_state: SerializableOptimizerState,
    pub loss_history: LossHistory,
}

impl SerializableModel {
    pub fn from_model(model: &LSTMModel) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            config: *model.config(),
            optimizer: *model.optimizer_config(),
            parameters: SerializableParameterSet::from_parameter_set(model.parameters()),
            optimizer_state: SerializableOptimizerState::from_optimizer_state(
                model.optimizer_state(),
            ),
            loss_history: model.loss_history().clone(),
        }
    }

    /// Validates the bundle and rebuilds the model.
    ///
    /// # Errors
    ///
    /// - `IoError::ModelStructureMismatch` - Unknown version, invalid configuration or wrong tensor shapes
    pub fn into_model(self) -> Result<LSTMModel, IoError> {
        if self.format_version != FORMAT_VERSION {
            return Err(IoError::ModelStructureMismatch(format!(
                "unsupported format version {}, expected {}",
                self.format_version, FORMAT_VERSION
            )));
        }
        let params = self.parameters.to_parameter_set(&self.config)?;
        let optimizer_state = self.optimizer_state.to_optimizer_state(&self.config)?;

        LSTMModel::from_parts(
            self.config,
            self.optimizer,
            params,
            optimizer_state,
            self.loss_history,
        )
        .map_err(|e| IoError::ModelStructureMismatch(e.to_string()))
    }
}
