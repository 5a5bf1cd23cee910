use super::*;

#[test]
fn test_cell_forward_matches_gate_equations() {
    let config = ModelConfig::new(2, 3, 1).with_seed(11);
    let params = ParameterSet::initialize(&config).unwrap();

    let x_t = array![[0.5], [-1.0]];
    let h_prev = array![[0.1], [0.0], [-0.2]];
    let c_prev = array![[0.3], [-0.4], [0.05]];

    let record = LSTMCell::forward(&params, &x_t, &h_prev, &c_prev).unwrap();

    // Recompute every gate by hand
    let combined = array![[0.5], [-1.0], [0.1], [0.0], [-0.2]];
    let gate = |w: &Array2<f64>, b: &Array2<f64>| w.dot(&combined) + b;
    let i = gate(&params.w_i, &params.b_i).mapv(crate::math::sigmoid);
    let f = gate(&params.w_f, &params.b_f).mapv(crate::math::sigmoid);
    let o = gate(&params.w_o, &params.b_o).mapv(crate::math::sigmoid);
    let g = gate(&params.w_c, &params.b_c).mapv(f64::tanh);
    let c = &f * &c_prev + &i * &g;
    let h = &o * &c.mapv(f64::tanh);

    assert_eq!(record.combined, combined);
    for (actual, expected) in [
        (&record.input_gate, &i),
        (&record.forget_gate, &f),
        (&record.output_gate, &o),
        (&record.candidate, &g),
        (&record.cell, &c),
        (&record.hidden, &h),
    ] {
        for (a, e) in actual.iter().zip(expected.iter()) {
            assert_abs_diff_eq!(*a, *e, epsilon = 1e-12);
        }
    }
}

#[test]
fn test_cell_rejects_mismatched_shapes() {
    let config = ModelConfig::new(2, 3, 1);
    let params = ParameterSet::initialize(&config).unwrap();
    let h = Column::zeros((3, 1));
    let c = Column::zeros((3, 1));

    // Three input features for a two-feature model
    let x_t = Column::zeros((3, 1));
    assert!(matches!(
        LSTMCell::forward(&params, &x_t, &h, &c),
        Err(ModelError::InputValidationError(_))
    ));

    // Hidden state of the wrong size
    let x_t = Column::zeros((2, 1));
    let short_h = Column::zeros((2, 1));
    assert!(matches!(
        LSTMCell::forward(&params, &x_t, &short_h, &c),
        Err(ModelError::InputValidationError(_))
    ));
}

#[test]
fn test_output_shape_for_various_dimensions() {
    for &(input_size, hidden_size, output_size, timesteps) in
        &[(1, 1, 1, 1), (1, 30, 1, 6), (3, 5, 2, 7), (4, 2, 3, 12)]
    {
        let config = ModelConfig::new(input_size, hidden_size, output_size);
        let params = ParameterSet::initialize(&config).unwrap();
        let window = pattern_window(timesteps, input_size, 0.0);

        let out = SequenceRunner::run(&params, window.view(), CacheMode::NoCache).unwrap();
        assert_eq!(out.output.dim(), (output_size, 1));
        assert_eq!(out.hidden.dim(), (hidden_size, 1));
        assert!(out.cache.is_none());
    }
}

#[test]
fn test_runner_caches_every_step_in_training_mode() {
    let config = ModelConfig::new(2, 4, 1);
    let params = ParameterSet::initialize(&config).unwrap();
    let window = pattern_window(5, 2, 1.0);

    let cached = SequenceRunner::run(&params, window.view(), CacheMode::Cache).unwrap();
    let plain = SequenceRunner::run(&params, window.view(), CacheMode::NoCache).unwrap();

    let cache = cached.cache.unwrap();
    assert_eq!(cache.len(), 5);
    // Row t of the window is the input of step t
    for t in 0..5 {
        let step = cache.step(t).unwrap();
        assert_eq!(step.input.column(0), window.row(t));
    }
    assert_eq!(cache.last().unwrap().hidden, cached.hidden);
    // Caching does not change the result
    assert_eq!(cached.output, plain.output);
}

#[test]
fn test_runner_rejects_empty_or_wrong_width_window() {
    let config = ModelConfig::new(2, 3, 1);
    let params = ParameterSet::initialize(&config).unwrap();

    let empty = Array2::<f64>::zeros((0, 2));
    assert!(SequenceRunner::run(&params, empty.view(), CacheMode::NoCache).is_err());

    let wide = Array2::<f64>::zeros((4, 3));
    assert!(matches!(
        SequenceRunner::run(&params, wide.view(), CacheMode::Cache),
        Err(ModelError::InputValidationError(_))
    ));
}

#[test]
fn test_narrowed_gate_weights_are_rejected() {
    let config = ModelConfig::new(2, 3, 1);
    let mut params = ParameterSet::initialize(&config).unwrap();
    params.w_i = Array2::zeros((3, 2));

    assert!(matches!(
        params.input_size(),
        Err(ModelError::InputValidationError(_))
    ));
    let window = pattern_window(4, 2, 0.0);
    assert!(matches!(
        SequenceRunner::run(&params, window.view(), CacheMode::Cache),
        Err(ModelError::InputValidationError(_))
    ));
    let x_t = Column::zeros((2, 1));
    let state = Column::zeros((3, 1));
    assert!(matches!(
        LSTMCell::forward(&params, &x_t, &state, &state),
        Err(ModelError::InputValidationError(_))
    ));
}
