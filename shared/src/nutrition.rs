//! Daily energy and macro-nutrient targets
//!
//! BMR comes from Mifflin-St Jeor, TDEE applies a light-activity
//! multiplier (raised for athletes), and the macro split follows ICMR
//! protein guidance with a carb-heavier split in Indian mode.

use serde::{Deserialize, Serialize};

use crate::health_metrics::{BiologicalSex, ProfileInput};

/// ICMR recommended protein, grams per kg body weight
pub const ICMR_PROTEIN_PER_KG: f64 = 0.83;
/// Athlete protein, grams per kg body weight
pub const ATHLETE_PROTEIN_MULTIPLIER: f64 = 1.8;
/// Minimum activity multiplier applied in athlete mode
pub const ATHLETE_MIN_ACTIVITY: f64 = 1.55;
/// Lightly active multiplier used for everyone else
pub const DEFAULT_ACTIVITY: f64 = 1.375;

const KCAL_PER_G_PROTEIN: f64 = 4.0;
const KCAL_PER_G_CARB: f64 = 4.0;
const KCAL_PER_G_FAT: f64 = 9.0;

/// Share of non-protein calories given to (carbs, fats)
pub fn carb_fat_split(indian_mode: bool) -> (f64, f64) {
    if indian_mode {
        (0.65, 0.35)
    } else {
        (0.5, 0.5)
    }
}

/// Daily energy and macro targets
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NutritionTargets {
    /// Basal Metabolic Rate (kcal/day, unrounded)
    pub bmr: f64,
    /// Activity multiplier applied to the BMR
    pub activity_multiplier: f64,
    /// Total Daily Energy Expenditure (kcal/day)
    pub tdee_kcal: i64,
    pub protein_g: i64,
    pub carbs_g: i64,
    pub fats_g: i64,
}

/// Calculate Basal Metabolic Rate using Mifflin-St Jeor equation
///
/// Men: BMR = 10 × weight(kg) + 6.25 × height(cm) - 5 × age(y) + 5
/// Women: BMR = 10 × weight(kg) + 6.25 × height(cm) - 5 × age(y) - 161
pub fn calculate_bmr_mifflin(
    weight_kg: f64,
    height_cm: f64,
    age_years: i32,
    sex: BiologicalSex,
) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * age_years as f64;
    match sex {
        BiologicalSex::Male => base + 5.0,
        BiologicalSex::Female => base - 161.0,
    }
}

/// Activity multiplier for the profile
pub fn activity_multiplier(athlete_mode: bool) -> f64 {
    if athlete_mode {
        DEFAULT_ACTIVITY.max(ATHLETE_MIN_ACTIVITY)
    } else {
        DEFAULT_ACTIVITY
    }
}

/// Calculate energy and macro targets for a validated profile
///
/// Calories left after protein are clamped at zero before the carb/fat
/// split, so targets are never negative.
pub fn calculate_nutrition(profile: &ProfileInput) -> NutritionTargets {
    let bmr = calculate_bmr_mifflin(
        profile.weight_kg(),
        profile.height_cm(),
        profile.age_years(),
        profile.sex(),
    );
    let multiplier = activity_multiplier(profile.athlete_mode());
    let tdee_kcal = (bmr * multiplier).round() as i64;

    let protein_per_kg = if profile.athlete_mode() {
        ATHLETE_PROTEIN_MULTIPLIER
    } else {
        ICMR_PROTEIN_PER_KG
    };
    let protein_g = (profile.weight_kg() * protein_per_kg).round() as i64;

    let remaining = (tdee_kcal as f64 - protein_g as f64 * KCAL_PER_G_PROTEIN).max(0.0);
    let (carb_share, fat_share) = carb_fat_split(profile.indian_mode());

    NutritionTargets {
        bmr,
        activity_multiplier: multiplier,
        tdee_kcal,
        protein_g,
        carbs_g: (remaining * carb_share / KCAL_PER_G_CARB).round() as i64,
        fats_g: (remaining * fat_share / KCAL_PER_G_FAT).round() as i64,
    }
}
