//! Unit conversion and normalization module
//!
//! The calculator form accepts height in centimeters or feet + inches and
//! weight in kilograms or pounds. Everything downstream works in canonical
//! metric units (cm, kg), so conversion happens here, once, at the input
//! boundary.
//!
//! Numeric text from the form is parsed leniently: blank or garbage input
//! becomes `0.0` rather than an error. The Input Validator is what rejects
//! the resulting out-of-range value.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Centimeters per foot
pub const CM_PER_FOOT: f64 = 30.48;
/// Centimeters per inch
pub const CM_PER_INCH: f64 = 2.54;
/// Pounds per kilogram
pub const LBS_PER_KG: f64 = 2.20462;

// ============================================================================
// Weight Units
// ============================================================================

/// Weight unit shown on the calculator form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Kg,
    Lbs,
}

impl WeightUnit {
    /// Convert from this unit to kilograms
    pub fn to_kg(&self, value: f64) -> f64 {
        match self {
            WeightUnit::Kg => value,
            WeightUnit::Lbs => lbs_to_kg(value),
        }
    }

    /// Convert from kilograms to this unit
    pub fn from_kg(&self, kg: f64) -> f64 {
        match self {
            WeightUnit::Kg => kg,
            WeightUnit::Lbs => kg_to_lbs(kg),
        }
    }

    /// Get the unit abbreviation
    pub fn abbreviation(&self) -> &'static str {
        match self {
            WeightUnit::Kg => "kg",
            WeightUnit::Lbs => "lbs",
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

impl std::str::FromStr for WeightUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "kg" | "kilogram" | "kilograms" => Ok(WeightUnit::Kg),
            "lbs" | "lb" | "pound" | "pounds" => Ok(WeightUnit::Lbs),
            _ => Err(format!("Unknown weight unit: {}", s)),
        }
    }
}

// ============================================================================
// Height Units
// ============================================================================

/// Height unit shown on the calculator form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HeightUnit {
    #[default]
    Cm,
    #[serde(rename = "ft")]
    FeetInches,
}

impl HeightUnit {
    /// Get the unit abbreviation
    pub fn abbreviation(&self) -> &'static str {
        match self {
            HeightUnit::Cm => "cm",
            HeightUnit::FeetInches => "ft",
        }
    }
}

impl fmt::Display for HeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

impl std::str::FromStr for HeightUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cm" | "centimeter" | "centimeters" => Ok(HeightUnit::Cm),
            "ft" | "feet" | "ft/in" | "feet/inches" => Ok(HeightUnit::FeetInches),
            _ => Err(format!("Unknown height unit: {}", s)),
        }
    }
}

// ============================================================================
// Conversions
// ============================================================================

/// Parse numeric form text the way a lenient form field reads it
///
/// Leading whitespace is skipped and the longest leading decimal number is
/// used, so `"72kg"` reads as 72 and `"72,5"` as 72. Text with no leading
/// number reads as zero. Non-finite results are also mapped to zero so they
/// never reach the metrics pipeline.
pub fn parse_number_lenient(text: &str) -> f64 {
    let text = text.trim_start();
    match text[..leading_number_len(text)].parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Byte length of the leading `[+-]digits[.digits][e[+-]digits]` prefix
fn leading_number_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    let digits_from = |start: usize| {
        bytes[start..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let int_digits = digits_from(end);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digits_from(end + 1);
        if int_digits + frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }

    if int_digits + frac_digits == 0 {
        return 0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = digits_from(exp_end);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    end
}

/// Convert a feet + inches height to centimeters
///
/// Formula: cm = feet × 30.48 + inches × 2.54
pub fn feet_inches_to_cm(feet: f64, inches: f64) -> f64 {
    feet * CM_PER_FOOT + inches * CM_PER_INCH
}

/// Convert pounds to kilograms
pub fn lbs_to_kg(lbs: f64) -> f64 {
    lbs / LBS_PER_KG
}

/// Convert kilograms to pounds
pub fn kg_to_lbs(kg: f64) -> f64 {
    kg * LBS_PER_KG
}

// ============================================================================
// Height Display Helper
// ============================================================================

/// Whole feet plus whole inches, as shown in the imperial height inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeetInchesHeight {
    pub feet: u32,
    pub inches: u32,
}

impl FeetInchesHeight {
    /// Split a metric height into feet and rounded inches
    ///
    /// Feet are floored; the remaining inches are rounded to the nearest
    /// whole inch. A remainder that rounds up to 12 carries into the feet.
    pub fn from_cm(cm: f64) -> Self {
        let total_inches = (cm / CM_PER_INCH).max(0.0);
        let mut feet = (total_inches / 12.0).floor() as u32;
        let mut inches = (total_inches % 12.0).round() as u32;
        if inches >= 12 {
            feet += 1;
            inches -= 12;
        }
        Self { feet, inches }
    }

    /// Convert back to centimeters
    pub fn to_cm(&self) -> f64 {
        feet_inches_to_cm(self.feet as f64, self.inches as f64)
    }
}

impl fmt::Display for FeetInchesHeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}'{}\"", self.feet, self.inches)
    }
}
