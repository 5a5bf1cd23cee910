use super::*;

/// Slides a window of `window_size` over `series` with stride 1.
///
/// Sample `i` holds `series[i..i + window_size]` as a `(window_size, 1)` window
/// and `series[i + window_size]` as its `(1, 1)` target, so a series of length
/// `N` yields `N - window_size` samples.
///
/// # Parameters
///
/// - `series` - Normalized series in chronological order
/// - `window_size` - Number of time steps per window
///
/// # Returns
///
/// - `Result<Vec<TrainingSample>, ModelError>` - Samples in chronological order
///
/// # Errors
///
/// - `ModelError::ConfigurationError` - If `window_size` is 0
/// - `ModelError::InsufficientData` - If the series is not longer than `window_size`
///
/// # Example
/// ```rust
/// use ndarray::array;
/// use rustyforecast::utility::make_windows;
///
/// let samples = make_windows(array![1.0, 2.0, 3.0, 4.0, 5.0].view(), 3).unwrap();
/// assert_eq!(samples.len(), 2);
/// assert_eq!(samples[0].target[[0, 0]], 4.0);
/// ```
pub fn make_windows(
    series: ArrayView1<f64>,
    window_size: usize,
) -> Result<Vec<TrainingSample>, ModelError> {
    check_window(series.len(), window_size)?;

    Ok((0..series.len() - window_size)
        .map(|start| TrainingSample {
            window: window_at(series, start, window_size),
            target: Column::from_elem((1, 1), series[start + window_size]),
        })
        .collect())
}

/// The window covering the last `window_size` values, used to forecast the
/// value that follows the series.
///
/// # Errors
///
/// - `ModelError::ConfigurationError` - If `window_size` is 0
/// - `ModelError::InsufficientData` - If the series is shorter than `window_size`
pub fn last_window(series: ArrayView1<f64>, window_size: usize) -> Result<Array2<f64>, ModelError> {
    if window_size == 0 {
        return Err(ModelError::ConfigurationError(
            "window_size must be greater than 0".to_string(),
        ));
    }
    if series.len() < window_size {
        return Err(ModelError::InsufficientData(format!(
            "series of length {} is shorter than window_size {}",
            series.len(),
            window_size
        )));
    }
    Ok(window_at(series, series.len() - window_size, window_size))
}

/// Keeps only the last `limit` observations of `series`.
pub fn take_last(series: ArrayView1<f64>, limit: usize) -> Array1<f64> {
    let start = series.len().saturating_sub(limit);
    series.slice(ndarray::s![start..]).to_owned()
}

fn window_at(series: ArrayView1<f64>, start: usize, window_size: usize) -> Array2<f64> {
    series
        .slice(ndarray::s![start..start + window_size])
        .to_owned()
        .insert_axis(ndarray::Axis(1))
}

fn check_window(series_len: usize, window_size: usize) -> Result<(), ModelError> {
    if window_size == 0 {
        return Err(ModelError::ConfigurationError(
            "window_size must be greater than 0".to_string(),
        ));
    }
    if series_len <= window_size {
        return Err(ModelError::InsufficientData(format!(
            "series of length {} yields no samples for window_size {}",
            series_len, window_size
        )));
    }
    Ok(())
}
