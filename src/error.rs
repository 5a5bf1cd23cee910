use std::fs::File;
use std::io::BufReader;
use thiserror::Error;

/// Error types that can occur while configuring, training or evaluating a model
///
/// # Variants
///
/// - `ConfigurationError` - A hyperparameter is invalid; raised before any computation starts
/// - `InsufficientData` - The data cannot fill a single full batch or a single window
/// - `NumericalInstability` - NaN or infinity appeared in a loss or gradient; the epoch was rolled back
/// - `NotFound` - A dataset provider cannot resolve the named series
/// - `InputValidationError` - The input data does not meet the expected format or shape
/// - `NotFitted` - A scaler was used before `fit`/`fit_transform`
/// - `MapeUndefined` - MAPE under the `Error` policy met a zero actual value
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    #[error("Insufficient data: {0}")]
    InsufficientData(String),
    #[error("Numerical instability: {0}")]
    NumericalInstability(String),
    #[error("Series not found: {0}")]
    NotFound(String),
    #[error("Input validation error: {0}")]
    InputValidationError(String),
    #[error(
        "Scaler has not been fitted. Call fit or fit_transform before transforming values."
    )]
    NotFitted,
    #[error("MAPE is undefined: actual value at index {index} is zero")]
    MapeUndefined { index: usize },
}

/// Input/Output error types that can occur during model serialization and file operations
///
/// # Variants
///
/// - `StdIoError` - Wraps standard I/O errors from file system operations
/// - `JsonError` - Wraps JSON serialization/deserialization errors
/// - `ModelStructureMismatch` - The stored bundle does not describe a consistent model
#[derive(Debug, Error)]
pub enum IoError {
    #[error("IO error: {0}")]
    StdIoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Model structure mismatch: {0}")]
    ModelStructureMismatch(String),
}

impl IoError {
    pub fn load_in_buf_reader(path: &str) -> Result<BufReader<File>, IoError> {
        let file = File::open(path)?;
        Ok(BufReader::new(file))
    }
}
