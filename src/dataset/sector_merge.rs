use std::collections::BTreeMap;

/// Merges several dated series into one by averaging the values that share a date.
///
/// Dates are compared as strings, so they must sort chronologically
/// (ISO-8601 `YYYY-MM-DD` does). The merged series is sorted by date and
/// only the last `limit` points are kept.
///
/// # Parameters
///
/// - `series` - One `(date, value)` list per member, e.g. each company of a sector
/// - `limit` - Maximum number of most recent points to keep
///
/// # Returns
///
/// - `Vec<(String, f64)>` - `(date, mean value)` pairs in chronological order
///
/// # Example
/// ```rust
/// use rustyforecast::dataset::merge_series_by_date;
///
/// let a = vec![("2024-01-01".to_string(), 10.0), ("2024-01-02".to_string(), 12.0)];
/// let b = vec![("2024-01-02".to_string(), 20.0), ("2024-01-03".to_string(), 30.0)];
///
/// let merged = merge_series_by_date(&[a, b], 1000);
/// assert_eq!(merged[1], ("2024-01-02".to_string(), 16.0));
/// assert_eq!(merged.len(), 3);
/// ```
pub fn merge_series_by_date(series: &[Vec<(String, f64)>], limit: usize) -> Vec<(String, f64)> {
    let mut by_date: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for (date, value) in series.iter().flatten() {
        let entry = by_date.entry(date.as_str()).or_insert((0.0, 0));
        entry.0 += value;
        entry.1 += 1;
    }

    let skip = by_date.len().saturating_sub(limit);
    by_date
        .into_iter()
        .skip(skip)
        .map(|(date, (sum, count))| (date.to_string(), sum / count as f64))
        .collect()
}

/// Values of a merged series without their dates.
pub fn merged_values(merged: &[(String, f64)]) -> ndarray::Array1<f64> {
    merged.iter().map(|(_, value)| *value).collect()
}
