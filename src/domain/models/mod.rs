//! Domain models for catalogs, allocation plans and convergence runs.

pub mod catalog;
pub mod config;
pub mod convergence;
pub mod plan;

pub use catalog::{Catalog, CatalogLine};
pub use config::{Config, ConvergenceConfig, LoggingConfig, SimulationConfig};
pub use convergence::{
    ConvergenceOutcome, ConvergencePhase, ConvergenceSettings, ConvergenceState,
};
pub use plan::{AllocationPlan, PlannedLine};
