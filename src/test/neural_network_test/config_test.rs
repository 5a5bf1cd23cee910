use super::*;

fn is_configuration_error<T: std::fmt::Debug>(result: Result<T, ModelError>) -> bool {
    matches!(result, Err(ModelError::ConfigurationError(_)))
}

#[test]
fn test_defaults() {
    let model = ModelConfig::default();
    assert_eq!(
        (model.input_size, model.hidden_size, model.output_size, model.seed),
        (1, 30, 1, 42)
    );
    assert_eq!(model.combined_size(), 31);

    let optimizer = OptimizerConfig::default();
    assert_eq!(optimizer.learning_rate, 0.0014);
    assert_eq!(optimizer.max_grad_norm, 5.0);
    assert_eq!(
        optimizer.policy,
        UpdatePolicy::RmsProp {
            beta: 0.9,
            epsilon: 1e-8
        }
    );

    let training = TrainingConfig::default();
    assert_eq!((training.epochs, training.batch_size), (20, 15));
    assert_eq!(training.convergence_threshold, 1e-4);
    assert_eq!(training.time_budget_secs, None);
    assert!(!training.verbose);
}

#[test]
fn test_model_config_validation() {
    assert!(ModelConfig::default().validate().is_ok());
    assert!(is_configuration_error(ModelConfig::new(0, 4, 1).validate()));
    assert!(is_configuration_error(ModelConfig::new(1, 0, 1).validate()));
    assert!(is_configuration_error(ModelConfig::new(1, 4, 0).validate()));
    assert!(is_configuration_error(ModelConfig::new(usize::MAX, 1, 1).validate()));
    assert_eq!(ModelConfig::new(usize::MAX, 1, 1).combined_size(), usize::MAX);
    assert!(is_configuration_error(LSTMModel::new(
        ModelConfig::new(1, 0, 1),
        OptimizerConfig::default()
    )));
}

#[test]
fn test_optimizer_config_validation() {
    assert!(OptimizerConfig::default().validate().is_ok());
    assert!(is_configuration_error(OptimizerConfig::new(0.0).validate()));
    assert!(is_configuration_error(OptimizerConfig::new(-1.0).validate()));
    assert!(is_configuration_error(OptimizerConfig::new(f64::NAN).validate()));
    assert!(is_configuration_error(
        OptimizerConfig::default()
            .with_max_grad_norm(-5.0)
            .validate()
    ));

    let rms = |beta, epsilon| {
        OptimizerConfig::default()
            .with_policy(UpdatePolicy::RmsProp { beta, epsilon })
            .validate()
    };
    assert!(is_configuration_error(rms(0.0, 1e-8)));
    assert!(is_configuration_error(rms(1.0, 1e-8)));
    assert!(is_configuration_error(rms(0.9, 0.0)));

    let momentum = |momentum| {
        OptimizerConfig::default()
            .with_policy(UpdatePolicy::Momentum { momentum })
            .validate()
    };
    assert!(momentum(0.0).is_ok());
    assert!(momentum(0.95).is_ok());
    assert!(is_configuration_error(momentum(1.0)));
    assert!(is_configuration_error(momentum(-0.1)));
}

#[test]
fn test_training_config_validation() {
    assert!(TrainingConfig::default().validate().is_ok());
    assert!(is_configuration_error(TrainingConfig::new(0, 15).validate()));
    assert!(is_configuration_error(TrainingConfig::new(20, 0).validate()));
    assert!(is_configuration_error(
        TrainingConfig::default()
            .with_convergence_threshold(-1.0)
            .validate()
    ));

    // Rejected before any computation starts
    let mut model = LSTMModel::new(ModelConfig::new(1, 4, 1), OptimizerConfig::default()).unwrap();
    let before = model.clone();
    let result = model.fit(&sine_samples(30, 3), &TrainingConfig::new(5, 0));
    assert!(is_configuration_error(result));
    assert_eq!(model, before);
}

#[test]
fn test_partial_json_uses_defaults() {
    let training: TrainingConfig = serde_json::from_str(r#"{"epochs": 3}"#).unwrap();
    assert_eq!(training.epochs, 3);
    assert_eq!(training.batch_size, 15);

    let optimizer: OptimizerConfig =
        serde_json::from_str(r#"{"policy": {"Momentum": {"momentum": 0.5}}}"#).unwrap();
    assert_eq!(optimizer.learning_rate, 0.0014);
    assert_eq!(optimizer.policy, UpdatePolicy::Momentum { momentum: 0.5 });
}
