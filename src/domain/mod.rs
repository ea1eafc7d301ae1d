//! Domain layer for the costforge estimation engine.
//!
//! This module contains the catalog, plan and convergence models, the
//! `EstimateService` port, and the domain error types.

pub mod errors;
pub mod models;
pub mod ports;

// Re-export error types for convenient access
pub use errors::{EstimateError, EstimateResult};
