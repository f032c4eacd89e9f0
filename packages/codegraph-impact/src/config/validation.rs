//! Configuration validation

use super::error::{ConfigError, ConfigResult};

/// Trait for validatable configuration objects
pub trait Validatable {
    /// Returns `Ok(())` if valid, `Err(ConfigError)` with details if invalid.
    fn validate(&self) -> ConfigResult<()>;
}

/// Check `value` lies in `min..=max`
pub fn check_range<T>(field: &str, value: T, min: T, max: T, hint: &str) -> ConfigResult<()>
where
    T: PartialOrd + ToString,
{
    if value < min || value > max {
        return Err(ConfigError::range_with_hint(field, value, min, max, hint));
    }
    Ok(())
}

/// Check a list setting is not empty
pub fn check_non_empty<T>(field: &str, values: &[T]) -> ConfigResult<()> {
    if values.is_empty() {
        return Err(ConfigError::Validation(format!("'{}' must not be empty", field)));
    }
    Ok(())
}
