//! Calculator service
//!
//! Runs the calculation pipeline for one form submission:
//! - Unit conversion and validation (first failure aborts)
//! - Metrics and nutrition targets
//! - Saving the result to history

use serde::Serialize;
use tracing::{debug, warn};

use bmigo_shared::{
    calculate_metrics, CalculateRequest, HistoryRecord, MetricsResult, NewHistoryRecord,
    ResultView,
};

use crate::error::ServiceResult;
use crate::repositories::HistoryRepository;

/// Shown when the result could not be written to history
pub const SAVE_FAILED_WARNING: &str = "Result calculated but could not be saved to history.";

/// A completed calculation and what happened when saving it
#[derive(Debug, Clone, Serialize)]
pub struct CalculationOutcome {
    pub result: MetricsResult,
    pub view: ResultView,
    /// Stored record, absent when saving failed
    pub record: Option<HistoryRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save_warning: Option<String>,
}

/// Calculator service for business logic
pub struct CalculatorService;

impl CalculatorService {
    /// Validate the form and compute metrics without touching history
    pub fn calculate(request: &CalculateRequest) -> ServiceResult<MetricsResult> {
        let profile = request.into_profile()?;
        Ok(calculate_metrics(&profile))
    }

    /// Validate, compute and save to history
    ///
    /// Validation errors are returned. A failed save is not: the result is
    /// still handed back with `save_warning` set.
    pub async fn calculate_and_save(
        repo: &dyn HistoryRepository,
        request: &CalculateRequest,
    ) -> ServiceResult<CalculationOutcome> {
        let profile = request.into_profile()?;
        let result = calculate_metrics(&profile);
        let view = ResultView::new(&profile, &result);

        debug!(
            bmi = result.bmi,
            status = result.status_label(),
            standard = ?result.standard,
            "Metrics calculated"
        );

        let (record, save_warning) = match repo
            .save(NewHistoryRecord::from_metrics(&profile, &result))
            .await
        {
            Ok(record) => (Some(record), None),
            Err(e) => {
                warn!(error = %e, "Failed to save calculation to history");
                (None, Some(SAVE_FAILED_WARNING.to_string()))
            }
        };

        Ok(CalculationOutcome {
            result,
            view,
            record,
            save_warning,
        })
    }
}
