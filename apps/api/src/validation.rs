//! Field length checks applied to request bodies before they reach a service.
//! Lengths are counted in characters, not bytes.

use crate::errors::AppError;

pub fn min_chars(field: &str, value: &str, min: usize) -> Result<(), AppError> {
    if value.chars().count() < min {
        return Err(AppError::Validation(format!(
            "{field} must be at least {min} characters"
        )));
    }
    Ok(())
}

pub fn char_range(field: &str, value: &str, min: usize, max: usize) -> Result<(), AppError> {
    min_chars(field, value, min)?;
    if value.chars().count() > max {
        return Err(AppError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

/// Treats empty or whitespace-only optional strings as absent.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
