//! Calculator form request and results view types
//!
//! These are the shapes exchanged with the UI host: the raw form values as
//! typed by the user, and the formatted results screen.

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::health_metrics::{
    format_bmi, healthy_weight_range_kg, ideal_weight_difference_kg, scale_marker_percent,
    BiologicalSex, MetricsResult, ProfileInput, StatusTone,
};
use crate::units::{feet_inches_to_cm, parse_number_lenient, FeetInchesHeight, WeightUnit};

/// Height as entered on the form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "unit", rename_all = "snake_case")]
pub enum HeightEntry {
    /// Slider / stepper value in centimeters
    Cm { value: f64 },
    /// Free-text feet and inches boxes
    Ft { feet: String, inches: String },
}

impl HeightEntry {
    /// Normalize to centimeters; unparsable text counts as zero
    pub fn to_cm(&self) -> f64 {
        match self {
            HeightEntry::Cm { value } => *value,
            HeightEntry::Ft { feet, inches } => {
                feet_inches_to_cm(parse_number_lenient(feet), parse_number_lenient(inches))
            }
        }
    }
}

/// Weight as entered on the form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    pub value: String,
    #[serde(default)]
    pub unit: WeightUnit,
}

impl WeightEntry {
    /// Normalize to kilograms; unparsable text counts as zero
    pub fn to_kg(&self) -> f64 {
        self.unit.to_kg(parse_number_lenient(&self.value))
    }
}

/// Raw calculator form submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculateRequest {
    #[serde(default)]
    pub sex: BiologicalSex,
    pub age: i32,
    pub height: HeightEntry,
    pub weight: WeightEntry,
    #[serde(default)]
    pub indian_mode: bool,
    #[serde(default)]
    pub athlete_mode: bool,
}

impl CalculateRequest {
    /// Convert units and validate, yielding a profile ready for the metrics engine
    pub fn into_profile(&self) -> Result<ProfileInput, ValidationError> {
        ProfileInput::new(
            self.sex,
            self.height.to_cm(),
            self.weight.to_kg(),
            self.age,
            self.indian_mode,
            self.athlete_mode,
        )
    }
}

/// Form defaults restored from the most recent saved calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormPrefill {
    /// Height rounded to whole centimeters for the slider
    pub height_cm: i64,
    /// Same height for the imperial inputs
    pub height_ft_in: FeetInchesHeight,
    /// Weight text for the weight box
    pub weight: String,
    pub athlete_mode: bool,
}

/// Formatted results screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultView {
    pub bmi: String,
    pub status: String,
    pub tone: StatusTone,
    pub standard_badge: Option<String>,
    pub athlete_banner: bool,
    pub ideal_weight_kg: String,
    /// Absolute difference from ideal weight, one decimal
    pub ideal_weight_diff_kg: String,
    pub above_ideal: bool,
    pub healthy_weight_min_kg: String,
    pub healthy_weight_max_kg: String,
    pub body_fat_percent: String,
    pub scale_marker_percent: f64,
    pub tdee_kcal: i64,
    pub protein_g: i64,
    pub carbs_g: i64,
    pub fats_g: i64,
}

impl ResultView {
    /// Build the results screen for a profile and its computed metrics
    pub fn new(profile: &ProfileInput, result: &MetricsResult) -> Self {
        let diff = ideal_weight_difference_kg(profile.weight_kg(), result.ideal_weight_kg);
        let (healthy_min, healthy_max) =
            healthy_weight_range_kg(profile.height_cm(), result.standard);

        Self {
            bmi: format_bmi(result.bmi),
            status: result.status_label().to_string(),
            tone: result.status.tone(),
            standard_badge: profile
                .indian_mode()
                .then(|| result.standard.label().to_string()),
            athlete_banner: profile.athlete_mode(),
            ideal_weight_kg: format!("{:.1}", result.ideal_weight_kg),
            ideal_weight_diff_kg: format!("{:.1}", diff.abs()),
            above_ideal: diff > 0.0,
            healthy_weight_min_kg: format!("{:.1}", healthy_min),
            healthy_weight_max_kg: format!("{:.1}", healthy_max),
            body_fat_percent: format!("{:.1}", result.body_fat_percent),
            scale_marker_percent: scale_marker_percent(result.bmi),
            tdee_kcal: result.nutrition.tdee_kcal,
            protein_g: result.nutrition.protein_g,
            carbs_g: result.nutrition.carbs_g,
            fats_g: result.nutrition.fats_g,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health_metrics::calculate_metrics;

    fn metric_request(height_cm: f64, weight: &str, age: i32) -> CalculateRequest {
        CalculateRequest {
            sex: BiologicalSex::Male,
            age,
            height: HeightEntry::Cm { value: height_cm },
            weight: WeightEntry {
                value: weight.to_string(),
                unit: WeightUnit::Kg,
            },
            indian_mode: false,
            athlete_mode: false,
        }
    }

    #[test]
    fn test_metric_request_into_profile() {
        let profile = metric_request(175.0, "72", 26).into_profile().unwrap();
        assert_eq!(profile.height_cm(), 175.0);
        assert_eq!(profile.weight_kg(), 72.0);
    }

    #[test]
    fn test_imperial_request_into_profile() {
        let request = CalculateRequest {
            height: HeightEntry::Ft {
                feet: "5".to_string(),
                inches: "9".to_string(),
            },
            weight: WeightEntry {
                value: "165".to_string(),
                unit: WeightUnit::Lbs,
            },
            ..metric_request(0.0, "", 30)
        };
        let profile = request.into_profile().unwrap();
        assert!((profile.height_cm() - 175.26).abs() < 1e-9);
        assert!((profile.weight_kg() - 74.84).abs() < 0.01);
    }

    #[test]
    fn test_garbage_weight_rejected_by_validator() {
        let err = metric_request(175.0, "abc", 30).into_profile().unwrap_err();
        assert_eq!(err, ValidationError::InvalidWeight(0.0));
    }

    #[test]
    fn test_decimal_comma_weight_keeps_whole_part() {
        let profile = metric_request(175.0, "72,5", 30).into_profile().unwrap();
        assert_eq!(profile.weight_kg(), 72.0);
    }

    #[test]
    fn test_blank_feet_rejected_as_height() {
        let request = CalculateRequest {
            height: HeightEntry::Ft {
                feet: String::new(),
                inches: String::new(),
            },
            ..metric_request(0.0, "70", 30)
        };
        assert_eq!(
            request.into_profile().unwrap_err(),
            ValidationError::InvalidHeight(0.0)
        );
    }

    #[test]
    fn test_scenario_d_invalid_age() {
        let err = metric_request(175.0, "70", 5).into_profile().unwrap_err();
        assert_eq!(err.code(), "INVALID_AGE");
    }

    #[test]
    fn test_request_deserializes_from_form_json() {
        let json = r#"{
            "sex": "female",
            "age": 30,
            "height": {"unit": "ft", "feet": "5", "inches": "4"},
            "weight": {"value": "130", "unit": "lbs"},
            "indian_mode": true
        }"#;
        let request: CalculateRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.sex, BiologicalSex::Female);
        assert!(request.indian_mode);
        assert!(!request.athlete_mode);
        assert!(request.into_profile().is_ok());
    }

    #[test]
    fn test_result_view() {
        let mut request = metric_request(175.0, "70", 26);
        request.indian_mode = true;
        let profile = request.into_profile().unwrap();
        let view = ResultView::new(&profile, &calculate_metrics(&profile));

        assert_eq!(view.bmi, "22.9");
        assert_eq!(view.status, "Normal");
        assert_eq!(view.tone, StatusTone::Success);
        assert_eq!(view.standard_badge.as_deref(), Some("ICMR 2020 STANDARDS"));
        assert!(!view.athlete_banner);
        // Miller male 175cm = 68.7kg, so 70kg is 1.3kg above
        assert_eq!(view.ideal_weight_kg, "68.7");
        assert_eq!(view.ideal_weight_diff_kg, "1.3");
        assert!(view.above_ideal);
    }
}
