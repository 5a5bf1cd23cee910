use super::*;

/// Validates that a dimension value is greater than 0
///
/// # Parameters
///
/// - `value` - The dimension value to validate
/// - `name` - The name of the dimension for error messages
///
/// # Returns
///
/// * `Ok(())` if validation passes
/// * `Err(ModelError::ConfigurationError)` if validation fails
pub(super) fn validate_dimension_greater_than_zero(
    value: usize,
    name: &str,
) -> Result<(), ModelError> {
    if value == 0 {
        return Err(ModelError::ConfigurationError(format!(
            "{} must be greater than 0",
            name
        )));
    }
    Ok(())
}

/// Validates that the learning rate is positive and finite.
pub(super) fn validate_learning_rate(learning_rate: f64) -> Result<(), ModelError> {
    validate_positive_finite(learning_rate, "learning_rate")
}

/// Validates that a decay rate (beta) lies strictly inside (0, 1).
///
/// # Parameters
///
/// - `value` - The decay rate value to validate
/// - `param_name` - The name of the parameter (for error messages)
pub(super) fn validate_open_unit_interval(value: f64, param_name: &str) -> Result<(), ModelError> {
    if !(value > 0.0 && value < 1.0) {
        return Err(ModelError::ConfigurationError(format!(
            "{} must be in range (0, 1), got {}",
            param_name, value
        )));
    }
    Ok(())
}

/// Validates that a momentum coefficient lies in [0, 1).
pub(super) fn validate_momentum(value: f64) -> Result<(), ModelError> {
    if !((0.0..1.0).contains(&value) && value.is_finite()) {
        return Err(ModelError::ConfigurationError(format!(
            "momentum must be in range [0, 1) and finite, got {}",
            value
        )));
    }
    Ok(())
}

/// Validates that a value is positive and finite.
///
/// # Parameters
///
/// - `value` - The value to validate
/// - `param_name` - The name of the parameter (for error messages)
///
/// # Returns
///
/// - `Ok(())` if the value is positive and finite
/// - `Err(ModelError::ConfigurationError)` if the value is not positive or not finite
pub(super) fn validate_positive_finite(value: f64, param_name: &str) -> Result<(), ModelError> {
    if !(value > 0.0 && value.is_finite()) {
        return Err(ModelError::ConfigurationError(format!(
            "{} must be positive and finite, got {}",
            param_name, value
        )));
    }
    Ok(())
}
