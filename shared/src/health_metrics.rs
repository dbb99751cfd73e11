//! Health metrics calculations module
//!
//! Computes BMI, the classification band, Miller ideal weight and the
//! Deurenberg body-fat estimate for a validated profile, then hands off to
//! the nutrition calculator for energy and macro targets.
//!
//! Two classification tables are supported: the WHO standard and the
//! stricter ICMR 2020 cutoffs used when Indian mode is switched on.
//!
//! All functions here are pure and total over the validated input domain.

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::nutrition::{calculate_nutrition, NutritionTargets};
use crate::validation::validate_measurements;

// ============================================================================
// Profile Types
// ============================================================================

/// Biological sex for physiological formulas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BiologicalSex {
    #[default]
    Male,
    Female,
}

impl BiologicalSex {
    /// Gender term of the Deurenberg formula: 1 for male, 0 for female
    pub fn deurenberg_factor(&self) -> f64 {
        match self {
            BiologicalSex::Male => 1.0,
            BiologicalSex::Female => 0.0,
        }
    }
}

/// Classification table in effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BmiStandard {
    /// WHO international cutoffs
    #[default]
    Who,
    /// ICMR 2020 cutoffs for Asian-Indian adults
    Icmr2020,
}

impl BmiStandard {
    /// Pick the table from the Indian-mode toggle
    pub fn from_indian_mode(indian_mode: bool) -> Self {
        if indian_mode {
            BmiStandard::Icmr2020
        } else {
            BmiStandard::Who
        }
    }

    /// Exclusive upper bounds of the first seven bands, ascending
    pub fn upper_bounds(&self) -> [f64; 7] {
        match self {
            BmiStandard::Who => [16.0, 17.0, 18.5, 25.0, 30.0, 35.0, 40.0],
            BmiStandard::Icmr2020 => [16.0, 17.0, 18.5, 23.0, 25.0, 30.0, 35.0],
        }
    }

    /// Upper BMI of the healthy range shown on the results screen
    pub fn healthy_upper_bmi(&self) -> f64 {
        match self {
            BmiStandard::Who => 24.9,
            BmiStandard::Icmr2020 => 22.9,
        }
    }

    /// Badge text for the results screen
    pub fn label(&self) -> &'static str {
        match self {
            BmiStandard::Who => "WHO STANDARDS",
            BmiStandard::Icmr2020 => "ICMR 2020 STANDARDS",
        }
    }
}

/// Validated input to the metrics engine
///
/// Can only be built through [`ProfileInput::new`], so the engine never
/// sees out-of-range values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProfileInput {
    sex: BiologicalSex,
    height_cm: f64,
    weight_kg: f64,
    age_years: i32,
    indian_mode: bool,
    athlete_mode: bool,
}

impl ProfileInput {
    /// Validate and build a profile
    pub fn new(
        sex: BiologicalSex,
        height_cm: f64,
        weight_kg: f64,
        age_years: i32,
        indian_mode: bool,
        athlete_mode: bool,
    ) -> Result<Self, ValidationError> {
        validate_measurements(height_cm, weight_kg, age_years)?;
        Ok(Self {
            sex,
            height_cm,
            weight_kg,
            age_years,
            indian_mode,
            athlete_mode,
        })
    }

    pub fn sex(&self) -> BiologicalSex {
        self.sex
    }

    pub fn height_cm(&self) -> f64 {
        self.height_cm
    }

    pub fn weight_kg(&self) -> f64 {
        self.weight_kg
    }

    pub fn age_years(&self) -> i32 {
        self.age_years
    }

    pub fn indian_mode(&self) -> bool {
        self.indian_mode
    }

    pub fn athlete_mode(&self) -> bool {
        self.athlete_mode
    }

    /// Classification table selected by the Indian-mode toggle
    pub fn standard(&self) -> BmiStandard {
        BmiStandard::from_indian_mode(self.indian_mode)
    }
}

// ============================================================================
// BMI Calculations
// ============================================================================

/// Display tone for a classification, mapped to colours by the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTone {
    Info,
    Success,
    Warning,
    Danger,
}

impl StatusTone {
    /// Tone for a stored status string
    ///
    /// History records keep the status as text, so the timeline matches on
    /// keywords rather than on the enum.
    pub fn from_status(status: &str) -> Self {
        let status = status.to_lowercase();
        if status.contains("underweight") {
            StatusTone::Warning
        } else if status.contains("normal") {
            StatusTone::Success
        } else if status.contains("overweight") {
            StatusTone::Warning
        } else if status.contains("obese") {
            StatusTone::Danger
        } else {
            StatusTone::Success
        }
    }
}

/// BMI category classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BmiCategory {
    VerySeverelyUnderweight,
    SeverelyUnderweight,
    Underweight,
    Normal,
    Overweight,
    ObeseClassI,
    ObeseClassII,
    ObeseClassIII,
}

impl BmiCategory {
    /// All bands, lowest BMI first
    pub const ALL: [BmiCategory; 8] = [
        BmiCategory::VerySeverelyUnderweight,
        BmiCategory::SeverelyUnderweight,
        BmiCategory::Underweight,
        BmiCategory::Normal,
        BmiCategory::Overweight,
        BmiCategory::ObeseClassI,
        BmiCategory::ObeseClassII,
        BmiCategory::ObeseClassIII,
    ];

    /// Position of this band in [`BmiCategory::ALL`]
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Get the BMI range `[lower, upper)` for this band under a standard
    pub fn range(&self, standard: BmiStandard) -> (f64, f64) {
        let bounds = standard.upper_bounds();
        let i = self.index();
        let lower = if i == 0 { 0.0 } else { bounds[i - 1] };
        let upper = bounds.get(i).copied().unwrap_or(f64::INFINITY);
        (lower, upper)
    }

    /// Human-readable label, also the status text saved with history records
    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::VerySeverelyUnderweight => "Very Severely Underweight",
            BmiCategory::SeverelyUnderweight => "Severely Underweight",
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::ObeseClassI => "Obese Class I",
            BmiCategory::ObeseClassII => "Obese Class II",
            BmiCategory::ObeseClassIII => "Obese Class III",
        }
    }

    pub fn tone(&self) -> StatusTone {
        match self {
            BmiCategory::VerySeverelyUnderweight
            | BmiCategory::SeverelyUnderweight
            | BmiCategory::Underweight => StatusTone::Info,
            BmiCategory::Normal => StatusTone::Success,
            BmiCategory::Overweight => StatusTone::Warning,
            BmiCategory::ObeseClassI | BmiCategory::ObeseClassII | BmiCategory::ObeseClassIII => {
                StatusTone::Danger
            }
        }
    }
}

/// Calculate BMI from weight and height
///
/// Formula: BMI = weight(kg) / height(m)²
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

/// Classify BMI into a band
///
/// Lower bounds are inclusive, upper bounds exclusive.
pub fn classify_bmi(bmi: f64, standard: BmiStandard) -> BmiCategory {
    standard
        .upper_bounds()
        .iter()
        .position(|upper| bmi < *upper)
        .map(|i| BmiCategory::ALL[i])
        .unwrap_or(BmiCategory::ObeseClassIII)
}

/// Weight range (kg) that yields a healthy BMI at this height
pub fn healthy_weight_range_kg(height_cm: f64, standard: BmiStandard) -> (f64, f64) {
    let height_m = height_cm / 100.0;
    let height_m_sq = height_m * height_m;
    (18.5 * height_m_sq, standard.healthy_upper_bmi() * height_m_sq)
}

/// Position (0–100 %) of a BMI on the 15–35 clinical scale bar
pub fn scale_marker_percent(bmi: f64) -> f64 {
    const SCALE_MIN: f64 = 15.0;
    const SCALE_MAX: f64 = 35.0;
    (((bmi - SCALE_MIN) / (SCALE_MAX - SCALE_MIN)) * 100.0).clamp(0.0, 100.0)
}

/// Format a BMI with one decimal, as displayed everywhere in the app
pub fn format_bmi(bmi: f64) -> String {
    format!("{:.1}", bmi)
}

// ============================================================================
// Ideal Weight and Body Fat
// ============================================================================

/// Ideal body weight using the Miller (1983) formula
///
/// Inches over five feet are clamped at zero, so anyone at or below
/// 152.4 cm gets the base weight.
pub fn calculate_ideal_weight_miller(height_cm: f64, sex: BiologicalSex) -> f64 {
    let inches_over_5ft = ((height_cm - 152.4) / 2.54).max(0.0);
    match sex {
        BiologicalSex::Male => 56.2 + 1.41 * inches_over_5ft,
        BiologicalSex::Female => 53.1 + 1.36 * inches_over_5ft,
    }
}

/// Signed distance from the ideal weight (positive = above ideal)
pub fn ideal_weight_difference_kg(weight_kg: f64, ideal_weight_kg: f64) -> f64 {
    weight_kg - ideal_weight_kg
}

/// Estimate body fat percentage from BMI (Deurenberg)
///
/// Formula: BF% = 1.2 × BMI + 0.23 × age − 10.8 × sex − 5.4
/// where sex = 1 for male, 0 for female
pub fn estimate_body_fat_deurenberg(bmi: f64, age_years: i32, sex: BiologicalSex) -> f64 {
    1.2 * bmi + 0.23 * age_years as f64 - 10.8 * sex.deurenberg_factor() - 5.4
}

// ============================================================================
// Full Result
// ============================================================================

/// Everything the results screen shows for one calculation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsResult {
    pub bmi: f64,
    pub status: BmiCategory,
    pub standard: BmiStandard,
    pub ideal_weight_kg: f64,
    pub body_fat_percent: f64,
    #[serde(flatten)]
    pub nutrition: NutritionTargets,
}

impl MetricsResult {
    /// Status text, as persisted with history records
    pub fn status_label(&self) -> &'static str {
        self.status.label()
    }
}

/// Run the metrics engine and nutrition calculator for a validated profile
pub fn calculate_metrics(profile: &ProfileInput) -> MetricsResult {
    let bmi = calculate_bmi(profile.weight_kg(), profile.height_cm());
    let standard = profile.standard();

    MetricsResult {
        bmi,
        status: classify_bmi(bmi, standard),
        standard,
        ideal_weight_kg: calculate_ideal_weight_miller(profile.height_cm(), profile.sex()),
        body_fat_percent: estimate_body_fat_deurenberg(bmi, profile.age_years(), profile.sex()),
        nutrition: calculate_nutrition(profile),
    }
}
