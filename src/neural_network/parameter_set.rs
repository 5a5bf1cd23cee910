use super::*;
use crate::math::{all_finite, frobenius_norm};
use ndarray_rand::RandomExt;
use ndarray_rand::rand::SeedableRng;
use ndarray_rand::rand::rngs::StdRng;
use ndarray_rand::rand_distr::Uniform;

/// Tag naming one of the ten tensors of a [`ParameterSet`].
///
/// Gate order is input, forget, output, cell-candidate everywhere in the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParameterKind {
    InputWeight,
    ForgetWeight,
    OutputGateWeight,
    CandidateWeight,
    ProjectionWeight,
    InputBias,
    ForgetBias,
    OutputGateBias,
    CandidateBias,
    ProjectionBias,
}

impl ParameterKind {
    /// Every tensor tag in storage order.
    pub const ALL: [ParameterKind; 10] = [
        ParameterKind::InputWeight,
        ParameterKind::ForgetWeight,
        ParameterKind::OutputGateWeight,
        ParameterKind::CandidateWeight,
        ParameterKind::ProjectionWeight,
        ParameterKind::InputBias,
        ParameterKind::ForgetBias,
        ParameterKind::OutputGateBias,
        ParameterKind::CandidateBias,
        ParameterKind::ProjectionBias,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ParameterKind::InputWeight => "W_i",
            ParameterKind::ForgetWeight => "W_f",
            ParameterKind::OutputGateWeight => "W_o",
            ParameterKind::CandidateWeight => "W_c",
            ParameterKind::ProjectionWeight => "W_y",
            ParameterKind::InputBias => "b_i",
            ParameterKind::ForgetBias => "b_f",
            ParameterKind::OutputGateBias => "b_o",
            ParameterKind::CandidateBias => "b_c",
            ParameterKind::ProjectionBias => "b_y",
        }
    }

    /// Shape `(rows, cols)` of this tensor under `config`.
    pub fn shape(&self, config: &ModelConfig) -> (usize, usize) {
        let (h, o, z) = (
            config.hidden_size,
            config.output_size,
            config.combined_size(),
        );
        match self {
            ParameterKind::InputWeight
            | ParameterKind::ForgetWeight
            | ParameterKind::OutputGateWeight
            | ParameterKind::CandidateWeight => (h, z),
            ParameterKind::ProjectionWeight => (o, h),
            ParameterKind::InputBias
            | ParameterKind::ForgetBias
            | ParameterKind::OutputGateBias
            | ParameterKind::CandidateBias => (h, 1),
            ParameterKind::ProjectionBias => (o, 1),
        }
    }
}

/// The ten weight/bias tensors of one model.
///
/// Gate weights have shape `(hidden_size, input_size + hidden_size)`, gate biases
/// `(hidden_size, 1)`, the projection weight `(output_size, hidden_size)` and the
/// projection bias `(output_size, 1)`. Shapes are fixed at construction.
///
/// The same type carries gradients, which always have the shapes of the
/// parameters they belong to.
///
/// # Fields
///
/// - `w_i`, `w_f`, `w_o`, `w_c` - Gate weight matrices (input, forget, output, cell-candidate)
/// - `w_y` - Output projection matrix
/// - `b_i`, `b_f`, `b_o`, `b_c` - Gate bias columns
/// - `b_y` - Output projection bias column
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSet {
    pub w_i: Array2<f64>,
    pub w_f: Array2<f64>,
    pub w_o: Array2<f64>,
    pub w_c: Array2<f64>,
    pub w_y: Array2<f64>,
    pub b_i: Array2<f64>,
    pub b_f: Array2<f64>,
    pub b_o: Array2<f64>,
    pub b_c: Array2<f64>,
    pub b_y: Array2<f64>,
}

/// Gradients of the scalar loss with respect to every tensor of a [`ParameterSet`]
pub type Gradients = ParameterSet;

impl ParameterSet {
    /// Creates a parameter set with every tensor filled with zeros.
    pub fn zeros(config: &ModelConfig) -> Self {
        let z = |kind: ParameterKind| Array2::<f64>::zeros(kind.shape(config));
        Self {
            w_i: z(ParameterKind::InputWeight),
            w_f: z(ParameterKind::ForgetWeight),
            w_o: z(ParameterKind::OutputGateWeight),
            w_c: z(ParameterKind::CandidateWeight),
            w_y: z(ParameterKind::ProjectionWeight),
            b_i: z(ParameterKind::InputBias),
            b_f: z(ParameterKind::ForgetBias),
            b_o: z(ParameterKind::OutputGateBias),
            b_c: z(ParameterKind::CandidateBias),
            b_y: z(ParameterKind::ProjectionBias),
        }
    }

    /// Creates a parameter set with deterministic Xavier/Glorot-uniform weights.
    ///
    /// Weights are drawn from `U(-limit, limit)` with `limit = sqrt(6 / (fan_in + fan_out))`
    /// using a `StdRng` seeded with `config.seed`. Biases start at zero.
    ///
    /// # Errors
    ///
    /// - `ModelError::ConfigurationError` - If any size in `config` is 0
    pub fn initialize(config: &ModelConfig) -> Result<Self, ModelError> {
        config.validate()?;

        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut params = Self::zeros(config);

        for kind in ParameterKind::ALL.iter().filter(|k| k.is_weight()) {
            let (rows, cols) = kind.shape(config);
            let limit = (6.0 / (rows + cols) as f64).sqrt();
            *params.get_mut(*kind) =
                Array2::random_using((rows, cols), Uniform::new(-limit, limit), &mut rng);
        }

        Ok(params)
    }

    /// Builds a parameter set from explicit tensors given in [`ParameterKind::ALL`] order.
    ///
    /// # Errors
    ///
    /// - `ModelError::ConfigurationError` - If `config` is invalid
    /// - `ModelError::InputValidationError` - If any tensor has the wrong shape
    pub fn from_tensors(
        config: &ModelConfig,
        tensors: [Array2<f64>; 10],
    ) -> Result<Self, ModelError> {
        config.validate()?;

        for (kind, tensor) in ParameterKind::ALL.iter().zip(tensors.iter()) {
            let expected = kind.shape(config);
            if tensor.dim() != expected {
                return Err(ModelError::InputValidationError(format!(
                    "{} must have shape {:?}, got {:?}",
                    kind.name(),
                    expected,
                    tensor.dim()
                )));
            }
        }

        let [w_i, w_f, w_o, w_c, w_y, b_i, b_f, b_o, b_c, b_y] = tensors;
        Ok(Self {
            w_i,
            w_f,
            w_o,
            w_c,
            w_y,
            b_i,
            b_f,
            b_o,
            b_c,
            b_y,
        })
    }

    /// A zero-filled set with the same shapes as `self`.
    pub fn zeros_like(&self) -> Self {
        let z = |a: &Array2<f64>| Array2::<f64>::zeros(a.raw_dim());
        Self {
            w_i: z(&self.w_i),
            w_f: z(&self.w_f),
            w_o: z(&self.w_o),
            w_c: z(&self.w_c),
            w_y: z(&self.w_y),
            b_i: z(&self.b_i),
            b_f: z(&self.b_f),
            b_o: z(&self.b_o),
            b_c: z(&self.b_c),
            b_y: z(&self.b_y),
        }
    }

    pub fn get(&self, kind: ParameterKind) -> &Array2<f64> {
        match kind {
            ParameterKind::InputWeight => &self.w_i,
            ParameterKind::ForgetWeight => &self.w_f,
            ParameterKind::OutputGateWeight => &self.w_o,
            ParameterKind::CandidateWeight => &self.w_c,
            ParameterKind::ProjectionWeight => &self.w_y,
            ParameterKind::InputBias => &self.b_i,
            ParameterKind::ForgetBias => &self.b_f,
            ParameterKind::OutputGateBias => &self.b_o,
            ParameterKind::CandidateBias => &self.b_c,
            ParameterKind::ProjectionBias => &self.b_y,
        }
    }

    pub fn get_mut(&mut self, kind: ParameterKind) -> &mut Array2<f64> {
        match kind {
            ParameterKind::InputWeight => &mut self.w_i,
            ParameterKind::ForgetWeight => &mut self.w_f,
            ParameterKind::OutputGateWeight => &mut self.w_o,
            ParameterKind::CandidateWeight => &mut self.w_c,
            ParameterKind::ProjectionWeight => &mut self.w_y,
            ParameterKind::InputBias => &mut self.b_i,
            ParameterKind::ForgetBias => &mut self.b_f,
            ParameterKind::OutputGateBias => &mut self.b_o,
            ParameterKind::CandidateBias => &mut self.b_c,
            ParameterKind::ProjectionBias => &mut self.b_y,
        }
    }

    /// Iterates over `(kind, tensor)` pairs in [`ParameterKind::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (ParameterKind, &Array2<f64>)> {
        [
            &self.w_i, &self.w_f, &self.w_o, &self.w_c, &self.w_y, &self.b_i, &self.b_f,
            &self.b_o, &self.b_c, &self.b_y,
        ]
        .into_iter()
        .enumerate()
        .map(|(i, tensor)| (ParameterKind::ALL[i], tensor))
    }

    /// Iterates mutably over `(kind, tensor)` pairs in [`ParameterKind::ALL`] order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ParameterKind, &mut Array2<f64>)> {
        [
            &mut self.w_i,
            &mut self.w_f,
            &mut self.w_o,
            &mut self.w_c,
            &mut self.w_y,
            &mut self.b_i,
            &mut self.b_f,
            &mut self.b_o,
            &mut self.b_c,
            &mut self.b_y,
        ]
        .into_iter()
        .enumerate()
        .map(|(i, tensor)| (ParameterKind::ALL[i], tensor))
    }

    /// Elementwise `self += other`; shapes must match.
    pub fn accumulate(&mut self, other: &ParameterSet) {
        for ((_, dst), (_, src)) in self.iter_mut().zip(other.iter()) {
            *dst += src;
        }
    }

    /// Sum of the Frobenius norms of the ten tensors.
    pub fn norm_sum(&self) -> f64 {
        self.iter().map(|(_, tensor)| frobenius_norm(tensor)).sum()
    }

    /// First tensor holding a NaN or infinite value, if any.
    pub fn first_non_finite(&self) -> Option<ParameterKind> {
        self.iter()
            .find(|(_, tensor)| !all_finite(*tensor))
            .map(|(kind, _)| kind)
    }

    /// Number of input features, read off the gate weight width.
    ///
    /// # Errors
    ///
    /// - `ModelError::InputValidationError` - If `W_i` is narrower than its hidden size
    pub fn input_size(&self) -> Result<usize, ModelError> {
        let hidden_size = self.w_i.nrows();
        self.w_i.ncols().checked_sub(hidden_size).ok_or_else(|| {
            ModelError::InputValidationError(format!(
                "W_i has {} columns but needs at least hidden_size = {}",
                self.w_i.ncols(),
                hidden_size
            ))
        })
    }

    /// Total number of scalar parameters.
    pub fn param_count(&self) -> usize {
        self.iter().map(|(_, tensor)| tensor.len()).sum()
    }
}

impl ParameterKind {
    /// True for the five weight matrices, false for the bias columns.
    pub fn is_weight(&self) -> bool {
        matches!(
            self,
            ParameterKind::InputWeight
                | ParameterKind::ForgetWeight
                | ParameterKind::OutputGateWeight
                | ParameterKind::CandidateWeight
                | ParameterKind::ProjectionWeight
        )
    }
}
