//! BMI Go Backend Library
//!
//! Local services behind the calculator and history screens: configuration,
//! logging, the SQLite history gateway and the service layer that ties
//! them to the shared core.

pub mod config;
pub mod db;
pub mod error;
pub mod repositories;
pub mod services;
pub mod state;
pub mod telemetry;
