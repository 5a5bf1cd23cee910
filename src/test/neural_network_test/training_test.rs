use super::*;

fn model(hidden_size: usize) -> LSTMModel {
    LSTMModel::new(
        ModelConfig::new(1, hidden_size, 1).with_seed(3),
        OptimizerConfig::default(),
    )
    .unwrap()
}

#[test]
fn test_truncates_trailing_partial_batch() {
    let mut model = model(4);
    let samples = sine_samples(37, 3);
    // A threshold of 0 can never be undercut, so every epoch runs
    let training = TrainingConfig::new(3, 15).with_convergence_threshold(0.0);

    let outcome = model.fit(&samples, &training).unwrap();

    assert_eq!(outcome.batches_per_epoch, 2);
    assert_eq!(outcome.dropped_samples, 7);
    assert_eq!(outcome.epochs_run, 3);
    assert_eq!(outcome.state, TrainingState::Exhausted);
    // One optimizer step per full batch
    assert_eq!(model.optimizer_state().steps, 6);
    assert_eq!(model.loss_history().len(), 3);
}

#[test]
fn test_dropped_samples_do_not_influence_training() {
    let samples = sine_samples(37, 3);
    let mut altered = samples.clone();
    for sample in altered.iter_mut().skip(30) {
        sample.target.fill(100.0);
    }
    let training = TrainingConfig::new(2, 15);

    let mut first = model(4);
    let mut second = model(4);
    first.fit(&samples, &training).unwrap();
    second.fit(&altered, &training).unwrap();

    assert_eq!(first.parameters(), second.parameters());
}

#[test]
fn test_early_stopping_on_zero_gradient() {
    let config = ModelConfig::new(1, 4, 1);
    let mut params = ParameterSet::zeros(&config);
    params.w_y.fill(1.0);
    let mut model =
        LSTMModel::from_parameters(config, OptimizerConfig::default(), params.clone()).unwrap();

    let samples: Vec<TrainingSample> = (0..30)
        .map(|i| TrainingSample {
            window: Array2::from_elem((3, 1), i as f64 * 0.1),
            target: Array2::zeros((1, 1)),
        })
        .collect();

    let outcome = model.fit(&samples, &TrainingConfig::new(50, 15)).unwrap();

    assert_eq!(outcome.state, TrainingState::Converged);
    assert_eq!(outcome.epochs_run, 1);
    assert_eq!(outcome.final_gradient_norm, 0.0);
    assert_eq!(model.loss_history().as_slice(), &[0.0]);
    assert_eq!(model.parameters(), &params);
}

#[test]
fn test_training_is_deterministic() {
    let samples = sine_samples(40, 5);
    let training = TrainingConfig::new(4, 8);

    let mut first = model(6);
    let mut second = model(6);
    first.fit(&samples, &training).unwrap();
    second.fit(&samples, &training).unwrap();

    assert_eq!(first.loss_history(), second.loss_history());
    assert_eq!(first.parameters(), second.parameters());
}

#[test]
fn test_parallel_batches_are_deterministic() {
    // batch 16 x hidden 64 reaches the parallel threshold
    let samples = sine_samples(32, 3);
    let training = TrainingConfig::new(2, 16);

    let mut first = model(64);
    let mut second = model(64);
    first.fit(&samples, &training).unwrap();
    second.fit(&samples, &training).unwrap();

    assert_eq!(first.loss_history(), second.loss_history());
    assert_eq!(first.parameters(), second.parameters());
}

#[test]
fn test_batch_gradient_is_sum_of_window_gradients() {
    let config = ModelConfig::new(1, 3, 1).with_seed(5);
    let params = ParameterSet::initialize(&config).unwrap();
    let batch = sine_samples(4, 3);

    let (loss, grads) = TrainingLoop::process_batch(&params, &batch).unwrap();

    let mut expected_loss = 0.0;
    let mut expected = params.zeros_like();
    for sample in &batch {
        let out = SequenceRunner::run(&params, sample.window.view(), CacheMode::Cache).unwrap();
        expected_loss += (&out.output - &sample.target).mapv(|d| d * d).sum();
        let dy = squared_error_gradient(&out.output, &sample.target, batch.len());
        expected.accumulate(
            &BackpropEngine::backward(&params, out.cache.as_ref().unwrap(), &dy).unwrap(),
        );
    }

    assert_abs_diff_eq!(loss, expected_loss / 4.0, epsilon = 1e-15);
    for ((_, a), (_, e)) in grads.iter().zip(expected.iter()) {
        for (x, y) in a.iter().zip(e.iter()) {
            assert_abs_diff_eq!(*x, *y, epsilon = 1e-15);
        }
    }
}

#[test]
fn test_insufficient_data() {
    let mut model = model(4);
    let before = model.clone();

    let result = model.fit(&sine_samples(10, 3), &TrainingConfig::new(5, 15));

    assert!(matches!(result, Err(ModelError::InsufficientData(_))));
    assert_eq!(model.parameters(), before.parameters());
    assert_eq!(model.optimizer_state().steps, 0);
}

#[test]
fn test_insufficient_data_after_training_keeps_history() {
    let mut model = model(4);
    model
        .fit(&sine_samples(20, 3), &TrainingConfig::new(3, 5).with_convergence_threshold(0.0))
        .unwrap();
    assert_eq!(model.loss_history().len(), 3);
    let trained = model.clone();

    let result = model.fit(&sine_samples(3, 3), &TrainingConfig::new(3, 5));

    assert!(matches!(result, Err(ModelError::InsufficientData(_))));
    assert_eq!(model.loss_history().len(), 3);
    assert_eq!(model, trained);
}

#[test]
fn test_numerical_instability_rolls_back_epoch() {
    let mut model = model(4);
    let initial = model.clone();

    let mut samples = sine_samples(10, 3);
    // Second batch of five carries a NaN
    samples[7].window[[1, 0]] = f64::NAN;

    let result = model.fit(&samples, &TrainingConfig::new(3, 5));

    assert!(matches!(result, Err(ModelError::NumericalInstability(_))));
    // The first batch's update is undone
    assert_eq!(model.parameters(), initial.parameters());
    assert_eq!(model.optimizer_state(), initial.optimizer_state());
    assert!(model.loss_history().is_empty());
}

#[test]
fn test_instability_keeps_completed_epochs() {
    let samples = sine_samples(10, 3);
    let mut model = model(4);
    model.fit(&samples, &TrainingConfig::new(2, 5)).unwrap();
    let trained = model.clone();

    let mut broken = samples.clone();
    broken[2].target[[0, 0]] = f64::INFINITY;
    let result = model.fit(&broken, &TrainingConfig::new(2, 5));

    assert!(matches!(result, Err(ModelError::NumericalInstability(_))));
    assert_eq!(model.parameters(), trained.parameters());
    assert_eq!(model.optimizer_state(), trained.optimizer_state());
    // No epoch of the failed run completed, so the history still describes the parameters
    assert_eq!(model.loss_history(), trained.loss_history());
}

#[test]
fn test_time_budget_ends_training_at_epoch_boundary() {
    let mut model = model(4);
    let training = TrainingConfig::new(100, 5)
        .with_convergence_threshold(0.0)
        .with_time_budget_secs(0);

    let outcome = model.fit(&sine_samples(20, 3), &training).unwrap();

    assert_eq!(outcome.state, TrainingState::Exhausted);
    assert_eq!(outcome.epochs_run, 1);
    assert_eq!(model.optimizer_state().steps, 4);
}

#[test]
fn test_loss_decreases_on_learnable_series() {
    let mut model = LSTMModel::new(
        ModelConfig::new(1, 8, 1).with_seed(1),
        OptimizerConfig::new(0.01),
    )
    .unwrap();
    let samples = sine_samples(60, 6);

    model
        .fit(&samples, &TrainingConfig::new(30, 10).with_convergence_threshold(0.0))
        .unwrap();

    let losses = model.loss_history().as_slice();
    assert_eq!(losses.len(), 30);
    assert!(losses.iter().all(|l| l.is_finite()));
    assert!(losses[29] < losses[0]);
}

#[test]
fn test_rejects_samples_with_wrong_shape() {
    let mut model = model(4);
    let mut samples = sine_samples(20, 3);
    samples[3].target = Array2::zeros((2, 1));

    let result = model.fit(&samples, &TrainingConfig::new(2, 5));
    assert!(matches!(result, Err(ModelError::InputValidationError(_))));
}

#[test]
fn test_loss_history_points() {
    let mut model = model(4);
    model
        .fit(&sine_samples(20, 3), &TrainingConfig::new(3, 5).with_convergence_threshold(0.0))
        .unwrap();

    let points = model.loss_history().points();
    assert_eq!(points.len(), 3);
    assert_eq!(points[0].epoch, 1);
    assert_eq!(points[2].epoch, 3);
    assert_eq!(Some(points[2].loss), model.loss_history().last());
}

#[test]
fn test_training_loop_rejects_narrowed_gate_weights() {
    let config = ModelConfig::new(1, 4, 1);
    let mut params = ParameterSet::initialize(&config).unwrap();
    params.w_i = Array2::zeros((4, 3));
    let mut state = OptimizerState::new(&params);
    let mut history = LossHistory::new();
    let samples = sine_samples(10, 3);

    assert!(matches!(
        TrainingLoop::process_batch(&params, &samples[..5]),
        Err(ModelError::InputValidationError(_))
    ));
    let training_loop =
        TrainingLoop::new(OptimizerConfig::default(), TrainingConfig::new(2, 5)).unwrap();
    assert!(matches!(
        training_loop.run(&mut params, &mut state, &mut history, &samples),
        Err(ModelError::InputValidationError(_))
    ));
    assert!(history.is_empty());
}
