use super::*;

#[test]
fn test_split_is_chronological() {
    let series: Array1<f64> = (0..50).map(|v| v as f64).collect();
    let samples = make_windows(series.view(), 6).unwrap();
    let total = samples.len();

    let (train, test) = chronological_split(samples, 0.8).unwrap();

    assert_eq!(train.len(), (total as f64 * 0.8).floor() as usize);
    assert_eq!(train.len() + test.len(), total);
    // No leakage: every test target comes after every training target
    let last_train = train.last().unwrap().target[[0, 0]];
    assert!(test.iter().all(|s| s.target[[0, 0]] > last_train));
    assert_eq!(test[0].target[[0, 0]], last_train + 1.0);
}

#[test]
fn test_split_uses_floor() {
    let (train, test) = chronological_split((0..7).collect::<Vec<_>>(), 0.8).unwrap();
    // floor(5.6) = 5
    assert_eq!(train, vec![0, 1, 2, 3, 4]);
    assert_eq!(test, vec![5, 6]);
}

#[test]
fn test_split_errors() {
    for ratio in [0.0, 1.0, -0.5, 1.5, f64::NAN] {
        assert!(matches!(
            chronological_split(vec![1, 2, 3, 4], ratio),
            Err(ModelError::ConfigurationError(_))
        ));
    }
    // floor(0.8 * 1) = 0 training samples
    assert!(matches!(
        chronological_split(vec![1], 0.8),
        Err(ModelError::InsufficientData(_))
    ));
    // floor(0.99 * 10) = 9, one left for testing
    assert!(chronological_split((0..10).collect::<Vec<_>>(), 0.99).is_ok());
    let empty: Vec<u8> = Vec::new();
    assert!(chronological_split(empty, 0.5).is_err());
}
