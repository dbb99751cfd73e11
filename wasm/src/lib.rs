//! BMI Go WASM Module
//!
//! This crate provides WebAssembly bindings so the calculator can run
//! entirely in the browser. Structured values cross the boundary as JSON
//! strings.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use bmigo_shared::{
    classify_bmi, recent_trends, BmiStandard, CalculateRequest, HistoryRecord, MetricsResult,
    ResultView, ValidationError, DEFAULT_TREND_WINDOW,
};

#[derive(Serialize)]
struct ErrorBody<'a> {
    code: &'a str,
    title: &'a str,
    message: String,
}

#[derive(Serialize)]
struct CalculationBody {
    result: MetricsResult,
    view: ResultView,
}

#[derive(Serialize)]
struct TrendsBody {
    avg_bmi: f64,
    weight_change: f64,
    avg_bmi_display: String,
    weight_change_display: String,
}

fn error_json(code: &str, title: &str, message: String) -> String {
    serde_json::to_string(&ErrorBody {
        code,
        title,
        message,
    })
    .unwrap_or_default()
}

fn validation_error_json(err: ValidationError) -> String {
    error_json(err.code(), err.title(), err.to_string())
}

/// Calculate BMI from weight (kg) and height (cm)
#[wasm_bindgen]
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> f64 {
    if height_cm <= 0.0 {
        return 0.0;
    }
    bmigo_shared::calculate_bmi(weight_kg, height_cm)
}

/// Band label for a BMI under WHO or (Indian mode) ICMR 2020 cut-offs
#[wasm_bindgen]
pub fn classify_bmi_label(bmi: f64, indian_mode: bool) -> String {
    classify_bmi(bmi, BmiStandard::from_indian_mode(indian_mode))
        .label()
        .to_string()
}

/// Run a full calculation from a form JSON document
///
/// Returns `{result, view}` on success, or `{code, title, message}` when
/// the form is malformed or fails validation.
#[wasm_bindgen]
pub fn calculate_metrics_json(request_json: &str) -> String {
    let request: CalculateRequest = match serde_json::from_str(request_json) {
        Ok(request) => request,
        Err(e) => return error_json("INVALID_REQUEST", "Invalid Request", e.to_string()),
    };

    let profile = match request.into_profile() {
        Ok(profile) => profile,
        Err(err) => return validation_error_json(err),
    };

    let result = bmigo_shared::calculate_metrics(&profile);
    let body = CalculationBody {
        view: ResultView::new(&profile, &result),
        result,
    };
    serde_json::to_string(&body).unwrap_or_default()
}

/// Recent trends for a newest-first history JSON array
///
/// Unreadable history is treated as empty.
#[wasm_bindgen]
pub fn recent_trends_json(history_json: &str) -> String {
    let records: Vec<HistoryRecord> = serde_json::from_str(history_json).unwrap_or_default();
    let trends = recent_trends(&records, DEFAULT_TREND_WINDOW);
    serde_json::to_string(&TrendsBody {
        avg_bmi: trends.avg_bmi,
        weight_change: trends.weight_change,
        avg_bmi_display: trends.avg_bmi_display(),
        weight_change_display: trends.weight_change_display(),
    })
    .unwrap_or_default()
}

/// Convert feet and inches to centimeters
#[wasm_bindgen]
pub fn feet_inches_to_cm(feet: f64, inches: f64) -> f64 {
    bmigo_shared::feet_inches_to_cm(feet, inches)
}

/// Convert pounds to kilograms
#[wasm_bindgen]
pub fn lbs_to_kg(lbs: f64) -> f64 {
    bmigo_shared::lbs_to_kg(lbs)
}
