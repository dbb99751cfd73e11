//! Error types for the BMI Go core

use thiserror::Error;

use crate::validation::{AGE_RANGE, HEIGHT_CM_RANGE, WEIGHT_KG_RANGE};

/// Input validation failures
///
/// These are user-correctable: the caller shows `title()` and the
/// `Display` message, and no metrics are computed.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ValidationError {
    #[error("Please enter an age between 10 and 100.")]
    InvalidAge(i32),

    #[error("Height must be between 50cm (approx 1ft 8in) and 250cm (approx 8ft 2in).")]
    InvalidHeight(f64),

    #[error("Weight must be between 20kg (44lbs) and 300kg (660lbs).")]
    InvalidWeight(f64),
}

impl ValidationError {
    /// Stable machine-readable reason code
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::InvalidAge(_) => "INVALID_AGE",
            ValidationError::InvalidHeight(_) => "INVALID_HEIGHT",
            ValidationError::InvalidWeight(_) => "INVALID_WEIGHT",
        }
    }

    /// Short heading for the blocking alert
    pub fn title(&self) -> &'static str {
        match self {
            ValidationError::InvalidAge(_) => "Invalid Age",
            ValidationError::InvalidHeight(_) => "Invalid Height",
            ValidationError::InvalidWeight(_) => "Invalid Weight",
        }
    }

    /// Name of the form field that failed
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::InvalidAge(_) => "age",
            ValidationError::InvalidHeight(_) => "height",
            ValidationError::InvalidWeight(_) => "weight",
        }
    }

    /// Admissible range for the failing field, as (min, max)
    pub fn admissible_range(&self) -> (f64, f64) {
        match self {
            ValidationError::InvalidAge(_) => (AGE_RANGE.0 as f64, AGE_RANGE.1 as f64),
            ValidationError::InvalidHeight(_) => HEIGHT_CM_RANGE,
            ValidationError::InvalidWeight(_) => WEIGHT_KG_RANGE,
        }
    }
}
