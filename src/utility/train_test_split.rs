use super::*;

/// Splits samples chronologically into a training prefix and a test suffix.
///
/// The first `floor(train_ratio * len)` samples go to training, the rest to
/// testing. Nothing is shuffled, so every test window starts after every
/// training window.
///
/// # Parameters
///
/// - `samples` - Samples in chronological order
/// - `train_ratio` - Share of samples used for training, in `(0, 1)`
///
/// # Returns
///
/// - `Result<(Vec<T>, Vec<T>), ModelError>` - `(train, test)`
///
/// # Errors
///
/// - `ModelError::ConfigurationError` - If `train_ratio` is not in `(0, 1)`
/// - `ModelError::InsufficientData` - If either side would be empty
///
/// # Example
/// ```rust
/// use rustyforecast::utility::chronological_split;
///
/// let (train, test) = chronological_split((0..10).collect(), 0.8).unwrap();
/// assert_eq!(train, vec![0, 1, 2, 3, 4, 5, 6, 7]);
/// assert_eq!(test, vec![8, 9]);
/// ```
pub fn chronological_split<T>(
    mut samples: Vec<T>,
    train_ratio: f64,
) -> Result<(Vec<T>, Vec<T>), ModelError> {
    if !(train_ratio > 0.0 && train_ratio < 1.0) {
        return Err(ModelError::ConfigurationError(format!(
            "train_ratio must be between 0 and 1 (exclusive), got {}",
            train_ratio
        )));
    }

    let n_samples = samples.len();
    let n_train = (n_samples as f64 * train_ratio).floor() as usize;
    if n_train == 0 || n_train == n_samples {
        return Err(ModelError::InsufficientData(format!(
            "{} samples cannot be split into non-empty train and test sets with train_ratio {}",
            n_samples, train_ratio
        )));
    }

    let test = samples.split_off(n_train);
    Ok((samples, test))
}
