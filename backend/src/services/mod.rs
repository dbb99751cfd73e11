//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! the shared core and the history gateway.

pub mod calculator;
pub mod export;
pub mod history;

pub use calculator::{CalculationOutcome, CalculatorService};
pub use export::{ExportFormat, ExportService, HistoryExport};
pub use history::{HistoryOverview, HistoryService};
