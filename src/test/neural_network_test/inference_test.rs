use super::*;

#[test]
fn test_inference_does_not_mutate_model() {
    let mut model =
        LSTMModel::new(ModelConfig::new(1, 5, 1), OptimizerConfig::default()).unwrap();
    let samples = sine_samples(20, 4);
    model.fit(&samples, &TrainingConfig::new(2, 5)).unwrap();
    let snapshot = model.clone();

    let windows: Vec<Array2<f64>> = samples.iter().map(|s| s.window.clone()).collect();
    let first = model.predict(&windows).unwrap();
    let second = model.predict(&windows).unwrap();

    assert_eq!(first, second);
    assert_eq!(model, snapshot);
    assert_eq!(first.len(), windows.len());
}

#[test]
fn test_predictions_match_sequence_runner() {
    let config = ModelConfig::new(2, 3, 2);
    let params = ParameterSet::initialize(&config).unwrap();
    let windows: Vec<Array2<f64>> = (0..70).map(|i| pattern_window(4, 2, i as f64)).collect();

    // 70 windows takes the parallel path
    let predictions = InferenceRunner::predict(&params, &windows).unwrap();

    for (window, prediction) in windows.iter().zip(&predictions) {
        let expected = SequenceRunner::run(&params, window.view(), CacheMode::NoCache).unwrap();
        assert_eq!(prediction, &expected.output);
        assert_eq!(prediction.dim(), (2, 1));
    }
}

#[test]
fn test_predict_scalar() {
    let config = ModelConfig::new(1, 3, 1);
    let params = ParameterSet::initialize(&config).unwrap();
    let windows = vec![pattern_window(3, 1, 0.0), pattern_window(3, 1, 2.0)];

    let scalars = InferenceRunner::predict_scalar(&params, &windows).unwrap();
    let columns = InferenceRunner::predict(&params, &windows).unwrap();
    assert_eq!(scalars, vec![columns[0][[0, 0]], columns[1][[0, 0]]]);

    let multi = ParameterSet::initialize(&ModelConfig::new(1, 3, 2)).unwrap();
    assert!(InferenceRunner::predict_scalar(&multi, &windows).is_err());
}

#[test]
fn test_empty_window_list() {
    let params = ParameterSet::initialize(&ModelConfig::new(1, 3, 1)).unwrap();
    assert!(InferenceRunner::predict(&params, &[]).unwrap().is_empty());
}
