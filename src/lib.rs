//! Costforge - Budget Allocation & Convergence Engine
//!
//! Costforge drives a pricing-estimate service toward a caller-supplied
//! target monthly amount. It distributes the target across a catalog of
//! priced lines (equal share per service group), submits the resulting plan,
//! measures the service's own computed total, and corrects the submission in
//! a closed loop until the achieved total lands within tolerance of the
//! target or the attempt budget runs out.
//!
//! # Architecture
//!
//! The crate follows a ports-and-adapters layout:
//!
//! - **Domain Layer** (`domain`): catalog, plan and convergence models, the
//!   `EstimateService` port, and domain error types
//! - **Service Layer** (`services`): the allocator and the convergence loop
//! - **Adapters** (`adapters`): in-process implementations of the
//!   `EstimateService` port
//! - **Infrastructure Layer** (`infrastructure`): configuration loading
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use costforge::{Catalog, ConvergenceLoop, ConvergenceSettings};
//! use costforge::adapters::SimulatedEstimateService;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let catalog = Catalog::load_from_path("assets/catalog-sample.yaml")?;
//!     let service = Arc::new(SimulatedEstimateService::default());
//!     let session = service.create_session("monthly budget").await?;
//!
//!     let engine = ConvergenceLoop::new(service, ConvergenceSettings::default());
//!     let outcome = engine.converge(&session, 25_000.0, &catalog).await?;
//!
//!     println!("achieved {:.2} in {} attempts", outcome.achieved_amount, outcome.attempts);
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{EstimateError, EstimateResult};
pub use domain::models::{
    AllocationPlan, Catalog, CatalogLine, Config, ConvergenceConfig, ConvergenceOutcome,
    ConvergencePhase, ConvergenceSettings, ConvergenceState, LoggingConfig, PlannedLine,
    SimulationConfig,
};
pub use domain::ports::{EstimateService, LineRejection, SubmissionReceipt};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{Allocator, ConvergenceLoop};
