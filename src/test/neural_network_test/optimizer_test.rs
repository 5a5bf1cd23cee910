use super::*;

fn tiny_config() -> ModelConfig {
    ModelConfig::new(1, 1, 1)
}

#[test]
fn test_clip_gradients_is_elementwise() {
    let mut grads = ParameterSet::zeros(&tiny_config());
    grads.w_i = array![[10.0, -7.0]];
    grads.b_f = array![[3.0]];

    let clipped = clip_gradients(&grads, 5.0);

    assert_eq!(clipped.w_i, array![[5.0, -5.0]]);
    assert_eq!(clipped.b_f, array![[3.0]]);
    // The input is not modified
    assert_eq!(grads.w_i, array![[10.0, -7.0]]);
}

#[test]
fn test_rms_prop_step_arithmetic() {
    let config = tiny_config();
    let mut params = ParameterSet::zeros(&config);
    let mut state = OptimizerState::new(&params);
    let optimizer = Optimizer::new(
        OptimizerConfig::new(0.01).with_policy(UpdatePolicy::RmsProp {
            beta: 0.9,
            epsilon: 1e-8,
        }),
    )
    .unwrap();

    let mut grads = params.zeros_like();
    grads.w_y[[0, 0]] = 10.0;

    optimizer.step(&mut params, &grads, &mut state);

    // Clipped to 5, accum = 0.9 * 0 + 0.1 * 25 = 2.5
    assert_abs_diff_eq!(state.squared_avg.w_y[[0, 0]], 2.5, epsilon = 1e-12);
    let expected = -(0.01 / (1e-8 + 2.5f64.sqrt())) * 5.0;
    assert_relative_eq!(params.w_y[[0, 0]], expected, max_relative = 1e-12);
    // Zero gradients leave their parameters alone
    assert_eq!(params.w_i[[0, 0]], 0.0);
    assert_eq!(state.steps, 1);

    // Second step with the same gradient
    optimizer.step(&mut params, &grads, &mut state);
    let accum = 0.9 * 2.5 + 0.1 * 25.0;
    assert_abs_diff_eq!(state.squared_avg.w_y[[0, 0]], accum, epsilon = 1e-12);
    let second = expected - (0.01 / (1e-8 + f64::sqrt(accum))) * 5.0;
    assert_relative_eq!(params.w_y[[0, 0]], second, max_relative = 1e-12);
    assert_eq!(state.steps, 2);
}

#[test]
fn test_momentum_step_arithmetic() {
    let config = tiny_config();
    let mut params = ParameterSet::zeros(&config);
    let mut state = OptimizerState::new(&params);
    let optimizer = Optimizer::new(
        OptimizerConfig::new(0.1).with_policy(UpdatePolicy::Momentum { momentum: 0.9 }),
    )
    .unwrap();

    let mut grads = params.zeros_like();
    grads.b_c[[0, 0]] = 1.0;

    optimizer.step(&mut params, &grads, &mut state);
    assert_abs_diff_eq!(state.velocity.b_c[[0, 0]], -0.1, epsilon = 1e-12);
    assert_abs_diff_eq!(params.b_c[[0, 0]], -0.1, epsilon = 1e-12);

    optimizer.step(&mut params, &grads, &mut state);
    // velocity = 0.9 * -0.1 - 0.1 * 1 = -0.19
    assert_abs_diff_eq!(state.velocity.b_c[[0, 0]], -0.19, epsilon = 1e-12);
    assert_abs_diff_eq!(params.b_c[[0, 0]], -0.29, epsilon = 1e-12);
    // RMSprop accumulators stay untouched under momentum
    assert_eq!(state.squared_avg, params.zeros_like());
}

#[test]
fn test_zero_momentum_is_plain_sgd() {
    let config = tiny_config();
    let mut params = ParameterSet::zeros(&config);
    params.w_f[[0, 1]] = 1.0;
    let mut state = OptimizerState::new(&params);
    let optimizer = Optimizer::new(
        OptimizerConfig::new(0.5).with_policy(UpdatePolicy::Momentum { momentum: 0.0 }),
    )
    .unwrap();

    let mut grads = params.zeros_like();
    grads.w_f[[0, 1]] = 0.4;

    optimizer.step(&mut params, &grads, &mut state);
    assert_abs_diff_eq!(params.w_f[[0, 1]], 1.0 - 0.5 * 0.4, epsilon = 1e-12);
}

#[test]
fn test_large_tensor_update_matches_formula() {
    // 40 x 41 elements, above the parallel threshold
    let config = ModelConfig::new(1, 40, 1);
    let mut params = ParameterSet::zeros(&config);
    let mut state = OptimizerState::new(&params);
    let optimizer = Optimizer::new(OptimizerConfig::new(0.001)).unwrap();

    let mut grads = params.zeros_like();
    grads.w_i.fill(2.0);
    optimizer.step(&mut params, &grads, &mut state);

    let accum = 0.1 * 4.0;
    let expected = -(0.001 / (1e-8 + f64::sqrt(accum))) * 2.0;
    for &value in params.w_i.iter() {
        assert_relative_eq!(value, expected, max_relative = 1e-12);
    }
    for &value in state.squared_avg.w_i.iter() {
        assert_abs_diff_eq!(value, accum, epsilon = 1e-12);
    }
}

#[test]
fn test_optimizer_rejects_invalid_config() {
    assert!(Optimizer::new(OptimizerConfig::new(0.0)).is_err());
    assert!(Optimizer::new(OptimizerConfig::new(-0.01)).is_err());
    assert!(Optimizer::new(OptimizerConfig::default().with_max_grad_norm(0.0)).is_err());
}
