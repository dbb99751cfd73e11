//! Input validation functions
//!
//! Checks the final, metric-normalized form values before any metric is
//! computed. Order is age, then height, then weight; only the first
//! failure is reported.

use crate::errors::ValidationError;

/// Admissible age in whole years, inclusive
pub const AGE_RANGE: (i32, i32) = (10, 100);
/// Admissible height in centimeters, inclusive
pub const HEIGHT_CM_RANGE: (f64, f64) = (50.0, 250.0);
/// Admissible weight in kilograms, inclusive
pub const WEIGHT_KG_RANGE: (f64, f64) = (20.0, 300.0);

/// Validate age in years
pub fn validate_age(age_years: i32) -> Result<(), ValidationError> {
    if age_years < AGE_RANGE.0 || age_years > AGE_RANGE.1 {
        return Err(ValidationError::InvalidAge(age_years));
    }
    Ok(())
}

/// Validate height value (in cm)
pub fn validate_height_cm(height_cm: f64) -> Result<(), ValidationError> {
    // NaN fails both comparisons, so check it explicitly
    if !height_cm.is_finite() || height_cm < HEIGHT_CM_RANGE.0 || height_cm > HEIGHT_CM_RANGE.1 {
        return Err(ValidationError::InvalidHeight(height_cm));
    }
    Ok(())
}

/// Validate weight value (in kg)
pub fn validate_weight_kg(weight_kg: f64) -> Result<(), ValidationError> {
    if !weight_kg.is_finite() || weight_kg < WEIGHT_KG_RANGE.0 || weight_kg > WEIGHT_KG_RANGE.1 {
        return Err(ValidationError::InvalidWeight(weight_kg));
    }
    Ok(())
}

/// Validate a complete set of form values, short-circuiting on the first failure
pub fn validate_measurements(
    height_cm: f64,
    weight_kg: f64,
    age_years: i32,
) -> Result<(), ValidationError> {
    validate_age(age_years)?;
    validate_height_cm(height_cm)?;
    validate_weight_kg(weight_kg)?;
    Ok(())
}
