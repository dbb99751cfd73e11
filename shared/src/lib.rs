//! BMI Go Shared Library
//!
//! Health metric calculations, unit handling, validation and history
//! aggregation shared by the backend and the WASM bindings.

pub mod errors;
pub mod health_metrics;
pub mod history;
pub mod nutrition;
pub mod types;
pub mod units;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use health_metrics::*;
pub use history::*;
pub use nutrition::*;
pub use types::*;
pub use units::*;
