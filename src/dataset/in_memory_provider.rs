use super::*;

/// A [`SeriesProvider`] holding fully materialized series keyed by name.
///
/// # Example
/// ```rust
/// use ndarray::array;
/// use rustyforecast::dataset::InMemorySeriesProvider;
/// use rustyforecast::traits::SeriesProvider;
///
/// let provider = InMemorySeriesProvider::new()
///     .with_series("NABIL", array![510.0, 515.0, 512.0])
///     .with_series("AHPC", array![250.0, 251.5]);
///
/// assert_eq!(provider.available_series(), vec!["AHPC", "NABIL"]);
/// assert_eq!(provider.load_series("AHPC").unwrap().len(), 2);
/// assert!(provider.load_series("UPPER").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemorySeriesProvider {
    series: AHashMap<String, Array1<f64>>,
}

impl InMemorySeriesProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a series, returning the previous one if any.
    pub fn insert(&mut self, name: impl Into<String>, values: Array1<f64>) -> Option<Array1<f64>> {
        self.series.insert(name.into(), values)
    }

    /// Builder form of [`InMemorySeriesProvider::insert`].
    pub fn with_series(mut self, name: impl Into<String>, values: Array1<f64>) -> Self {
        self.insert(name, values);
        self
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

impl SeriesProvider for InMemorySeriesProvider {
    fn load_series(&self, name: &str) -> Result<Array1<f64>, ModelError> {
        self.series
            .get(name)
            .cloned()
            .ok_or_else(|| ModelError::NotFound(format!("no series named '{}'", name)))
    }

    fn available_series(&self) -> Vec<String> {
        let mut names: Vec<String> = self.series.keys().cloned().collect();
        names.sort();
        names
    }
}
