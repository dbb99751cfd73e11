//! History export
//!
//! Supports multiple formats:
//! - JSON: the stored records as-is
//! - CSV: one row per calculation for spreadsheets

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use bmigo_shared::{format_bmi, HistoryRecord};

use crate::error::{ServiceError, ServiceResult};
use crate::repositories::HistoryRepository;

/// Export file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

/// Full history export document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryExport {
    pub export_version: String,
    pub exported_at: DateTime<Utc>,
    pub records: Vec<HistoryRecord>,
}

#[derive(Debug, Serialize)]
struct HistoryCsvRow<'a> {
    date: String,
    bmi: String,
    weight_kg: f64,
    height_cm: f64,
    mode: &'static str,
    status: &'a str,
}

/// Export service for saved calculations
pub struct ExportService;

impl ExportService {
    /// Load the whole history and render it
    pub async fn export(repo: &dyn HistoryRepository, format: ExportFormat) -> ServiceResult<String> {
        let records = repo.list().await?;
        info!(count = records.len(), ?format, "Exporting history");
        match format {
            ExportFormat::Json => Self::to_json(&records),
            ExportFormat::Csv => Self::to_csv(&records),
        }
    }

    /// Render records as a pretty-printed JSON export document
    pub fn to_json(records: &[HistoryRecord]) -> ServiceResult<String> {
        let export = HistoryExport {
            export_version: "1.0".to_string(),
            exported_at: Utc::now(),
            records: records.to_vec(),
        };
        serde_json::to_string_pretty(&export)
            .map_err(|e| ServiceError::Export(format!("JSON serialization error: {}", e)))
    }

    /// Render records as CSV, newest first
    pub fn to_csv(records: &[HistoryRecord]) -> ServiceResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in records {
            wtr.serialize(HistoryCsvRow {
                date: record.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                bmi: format_bmi(record.bmi),
                weight_kg: record.weight,
                height_cm: record.height,
                mode: record.mode.as_str(),
                status: &record.status,
            })
            .map_err(|e| ServiceError::Export(format!("CSV serialization error: {}", e)))?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| ServiceError::Export(format!("CSV flush error: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| ServiceError::Export(format!("CSV encoding error: {}", e)))
    }
}
